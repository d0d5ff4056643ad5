/// Container tag flavour of the primary tag.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TagFormat {
    Id3v2,
    Vorbis,
    Mp4,
    Ape,
    #[default]
    Other,
}

/// Stream properties used to compare two files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioProperties {
    /// Lower-case codec name (`flac`, `mp3`, `aac`, ...).
    pub codec: Option<String>,
    /// Audio bitrate in kbps.
    pub bitrate: Option<u32>,
}

/// Immutable snapshot of the tags read from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artist_sort: Option<String>,
    pub artist_credit: Option<String>,
    pub albumartist: Option<String>,
    pub albumartist_sort: Option<String>,
    pub albumartist_credit: Option<String>,
    pub album: Option<String>,

    pub composer: Option<String>,
    pub composer_sort: Option<String>,

    pub track: Option<u32>,
    pub tracktotal: Option<u32>,
    pub disc: Option<u32>,
    pub disctotal: Option<u32>,

    pub year: Option<u32>,
    pub original_year: Option<u32>,

    pub genre: Option<String>,
    /// Compilation flag.
    pub comp: Option<bool>,
    /// MusicBrainz release group primary/secondary types.
    pub releasegroup_types: Vec<String>,

    pub work: Option<String>,
    pub work_id: Option<String>,
    /// Titles from top-level work down to this one, joined by " -> ".
    pub work_hierarchy: Option<String>,
    /// Ids in the same order as `work_hierarchy`, joined by "/".
    pub work_hierarchy_ids: Option<String>,
    pub recording_id: Option<String>,

    /// Raw performer entries, `Name (role)`.
    pub performers: Vec<String>,
    pub conductor: Option<String>,

    pub comment: Option<String>,

    pub format: TagFormat,
    pub properties: AudioProperties,
}
