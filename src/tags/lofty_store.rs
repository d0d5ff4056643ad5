use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::FileType;
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag, TagType};

use super::model::{AudioProperties, RawTags, TagFormat};
use super::TagStore;
use crate::error::TagError;

const ARTIST_CREDIT: &str = "ARTIST_CREDIT";
const ALBUMARTIST_CREDIT: &str = "ALBUMARTIST_CREDIT";
const RELEASE_TYPE: &str = "RELEASETYPE";
const MB_ALBUM_TYPE: &str = "MUSICBRAINZ_ALBUMTYPE";
const WORK_HIERARCHY: &str = "MUSICBRAINZ_WORK_HIERARCHY";
const WORK_HIERARCHY_IDS: &str = "MUSICBRAINZ_WORK_HIERARCHY_IDS";

/// `TagStore` backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagStore;

impl TagStore for LoftyTagStore {
    fn read(&self, path: &Path) -> Result<RawTags, TagError> {
        let tagged = lofty::read_from_path(path).map_err(|e| TagError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let props = tagged.properties();
        let mut tags = RawTags {
            properties: AudioProperties {
                codec: codec_name(tagged.file_type(), props.bit_depth()).map(str::to_string),
                bitrate: props.audio_bitrate(),
            },
            ..RawTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            fill_from_tag(&mut tags, tag);
        }
        Ok(tags)
    }

    fn write(&self, path: &Path, tags: &RawTags) -> Result<(), TagError> {
        let mut tagged = lofty::read_from_path(path).map_err(|e| TagError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if tagged.primary_tag().is_none() {
            let tag_type = tagged.primary_tag_type();
            tagged.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged
            .primary_tag_mut()
            .ok_or_else(|| TagError::NoTag(path.to_path_buf()))?;

        set_text(tag, ItemKey::TrackTitle, tags.title.as_deref());
        set_text(tag, ItemKey::AlbumTitle, tags.album.as_deref());
        set_text(tag, ItemKey::Comment, tags.comment.as_deref());
        set_text(tag, ItemKey::Work, tags.work.as_deref());
        set_text(tag, ItemKey::MusicBrainzWorkId, tags.work_id.as_deref());
        set_text(tag, custom(WORK_HIERARCHY), tags.work_hierarchy.as_deref());
        set_text(tag, custom(WORK_HIERARCHY_IDS), tags.work_hierarchy_ids.as_deref());
        match tags.track {
            Some(n) => tag.set_track(n),
            None => tag.remove_track(),
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

fn custom(name: &str) -> ItemKey {
    ItemKey::Unknown(name.to_string())
}

fn text(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.get_string(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn set_text(tag: &mut Tag, key: ItemKey, value: Option<&str>) {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            tag.insert_text(key, v.to_string());
        }
        None => {
            tag.remove_key(&key);
        }
    }
}

fn fill_from_tag(tags: &mut RawTags, tag: &Tag) {
    tags.format = tag_format(tag.tag_type());

    tags.title = text(tag, &ItemKey::TrackTitle);
    tags.artist = text(tag, &ItemKey::TrackArtist);
    tags.artist_sort = text(tag, &ItemKey::TrackArtistSortOrder);
    tags.artist_credit = text(tag, &custom(ARTIST_CREDIT));
    tags.albumartist = text(tag, &ItemKey::AlbumArtist);
    tags.albumartist_sort = text(tag, &ItemKey::AlbumArtistSortOrder);
    tags.albumartist_credit = text(tag, &custom(ALBUMARTIST_CREDIT));
    tags.album = text(tag, &ItemKey::AlbumTitle);

    tags.composer = text(tag, &ItemKey::Composer);
    tags.composer_sort = text(tag, &ItemKey::ComposerSortOrder);

    tags.track = tag.track();
    tags.tracktotal = tag.track_total();
    tags.disc = tag.disk();
    tags.disctotal = tag.disk_total();

    tags.year = text(tag, &ItemKey::RecordingDate)
        .or_else(|| text(tag, &ItemKey::Year))
        .as_deref()
        .and_then(parse_year);
    tags.original_year = text(tag, &ItemKey::OriginalReleaseDate)
        .as_deref()
        .and_then(parse_year);

    tags.genre = text(tag, &ItemKey::Genre);
    tags.comp = text(tag, &ItemKey::FlagCompilation).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    tags.releasegroup_types = text(tag, &custom(RELEASE_TYPE))
        .or_else(|| text(tag, &custom(MB_ALBUM_TYPE)))
        .map(|v| split_types(&v))
        .unwrap_or_default();

    tags.work = text(tag, &ItemKey::Work);
    tags.work_id = text(tag, &ItemKey::MusicBrainzWorkId);
    tags.work_hierarchy = text(tag, &custom(WORK_HIERARCHY));
    tags.work_hierarchy_ids = text(tag, &custom(WORK_HIERARCHY_IDS));
    tags.recording_id = text(tag, &ItemKey::MusicBrainzRecordingId);

    tags.conductor = text(tag, &ItemKey::Conductor);
    tags.performers = if tags.format == TagFormat::Id3v2 {
        text(tag, &ItemKey::MusicianCredits)
            .map(|v| credits_to_entries(&v))
            .unwrap_or_default()
    } else {
        tag.get_strings(&ItemKey::Performer)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    };

    tags.comment = text(tag, &ItemKey::Comment);
}

fn tag_format(tag_type: TagType) -> TagFormat {
    match tag_type {
        TagType::Id3v2 => TagFormat::Id3v2,
        TagType::VorbisComments => TagFormat::Vorbis,
        TagType::Mp4Ilst => TagFormat::Mp4,
        TagType::Ape => TagFormat::Ape,
        _ => TagFormat::Other,
    }
}

/// Codec name as ranked by the quality comparison.
pub(super) fn codec_name(file_type: FileType, bit_depth: Option<u8>) -> Option<&'static str> {
    let name = match file_type {
        FileType::Flac => "flac",
        FileType::Mpeg => "mp3",
        FileType::Vorbis => "ogg",
        FileType::Opus => "opus",
        FileType::Wav => "wav",
        FileType::Aiff => "aiff",
        FileType::Aac => "aac",
        FileType::Ape => "ape",
        FileType::WavPack => "wavpack",
        FileType::Speex => "speex",
        // ALAC is the only MP4 codec reporting a bit depth.
        FileType::Mp4 if bit_depth.is_some() => "alac",
        FileType::Mp4 => "aac",
        _ => return None,
    };
    Some(name)
}

/// Leading four-digit year of a date string (`1965`, `1965-08-06`).
pub(super) fn parse_year(value: &str) -> Option<u32> {
    let digits: String = value.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

/// ID3 musician credits are stored as `role\0name` pairs.
pub(super) fn credits_to_entries(value: &str) -> Vec<String> {
    let parts: Vec<&str> = value.split('\0').map(str::trim).collect();
    parts
        .chunks(2)
        .filter_map(|pair| match pair {
            [role, name] if !name.is_empty() => Some(if role.is_empty() {
                name.to_string()
            } else {
                format!("{name} ({role})")
            }),
            _ => None,
        })
        .collect()
}

fn split_types(value: &str) -> Vec<String> {
    value
        .split([',', ';', '/'])
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
