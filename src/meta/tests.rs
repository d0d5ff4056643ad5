use super::derived::*;
use super::performer::*;
use super::*;
use crate::musicbrainz::fake::FakeCatalog;
use crate::tags::memory::MemoryTagStore;

fn meta(tags: RawTags) -> Meta {
    Meta::new("/music/in/file.flac", tags, MetaPolicy::default())
}

fn beatles() -> RawTags {
    RawTags {
        artist: Some("The Beatles".into()),
        album: Some("Help!".into()),
        title: Some("Yesterday".into()),
        track: Some(13),
        tracktotal: Some(14),
        disc: Some(1),
        disctotal: Some(1),
        year: Some(1987),
        original_year: Some(1965),
        ..RawTags::default()
    }
}

fn beethoven() -> RawTags {
    RawTags {
        title: Some("Symphony No. 5 in C minor, Op. 67: I. Allegro con brio".into()),
        work: Some("Symphony No. 5 in C minor, Op. 67: I. Allegro con brio".into()),
        composer: Some("Ludwig van Beethoven".into()),
        composer_sort: Some("Beethoven, Ludwig van".into()),
        albumartist: Some("Ludwig van Beethoven; Wiener Philharmoniker, Carlos Kleiber".into()),
        track: Some(5),
        tracktotal: Some(8),
        ..RawTags::default()
    }
}

#[test]
fn disctrack_padding() {
    assert_eq!(disctrack(Some(2), Some(9), None, None).as_deref(), Some("02"));
    assert_eq!(disctrack(Some(4), None, Some(2), Some(3)).as_deref(), Some("2-04"));
    assert_eq!(disctrack(Some(4), None, Some(2), Some(100)).as_deref(), Some("002-04"));
    assert_eq!(disctrack(Some(4), None, Some(2), Some(12)).as_deref(), Some("02-04"));
    assert_eq!(disctrack(Some(7), Some(120), None, None).as_deref(), Some("007"));
    assert_eq!(disctrack(Some(4), None, Some(1), Some(1)).as_deref(), Some("04"));
    assert_eq!(disctrack(Some(4), None, Some(3), None).as_deref(), Some("3-04"));
    assert_eq!(disctrack(None, Some(10), Some(1), Some(2)), None);
}

#[test]
fn end_to_end_beatles() {
    let d = meta(beatles()).derived();
    assert_eq!(d.combined_year, Some(1965));
    assert_eq!(d.combined_disctrack.as_deref(), Some("13"));
    assert_eq!(d.initial_artist.as_deref(), Some("b"));
    assert_eq!(d.combined_artist.as_deref(), Some("The Beatles"));
    assert_eq!(d.combined_artist_sort, "Beatles, The");
}

#[test]
fn artist_fallback_chain() {
    let mut tags = RawTags {
        artist_credit: Some("Credit".into()),
        ..RawTags::default()
    };
    assert_eq!(combined_artist(&tags).as_deref(), Some("Credit"));

    tags.albumartist_credit = Some("Album Credit".into());
    assert_eq!(combined_artist(&tags).as_deref(), Some("Album Credit"));

    tags.artist = Some("Artist".into());
    tags.albumartist = Some("  ".into());
    assert_eq!(combined_artist(&tags).as_deref(), Some("Artist"));

    tags.albumartist = Some("Album Artist".into());
    assert_eq!(combined_artist(&tags).as_deref(), Some("Album Artist"));
}

#[test]
fn artist_sort_chain_and_unknown() {
    assert_eq!(combined_artist_sort(&RawTags::default(), false), "Unknown");

    let tags = RawTags {
        artist: Some("Queen".into()),
        artist_sort: Some("Queen, The Band".into()),
        albumartist_sort: Some("Mercury, Freddie".into()),
        ..RawTags::default()
    };
    assert_eq!(combined_artist_sort(&tags, false), "Mercury, Freddie");
    assert_eq!(combined_artist_sort(&tags, true), "Mercury_Freddie");
}

#[test]
fn shell_friendly_touches_sort_only() {
    let tags = RawTags {
        artist: Some("Crosby, Stills & Nash".into()),
        artist_sort: Some("Crosby, Stills & Nash".into()),
        ..RawTags::default()
    };
    let m = Meta::new(
        "/a.flac",
        tags,
        MetaPolicy {
            shell_friendly: true,
            ..MetaPolicy::default()
        },
    );
    let d = m.derived();
    assert_eq!(d.combined_artist.as_deref(), Some("Crosby, Stills & Nash"));
    assert_eq!(d.combined_artist_sort, "Crosby_Stills & Nash");
}

#[test]
fn album_disc_suffix_is_stripped() {
    let mut tags = RawTags {
        album: Some("The Wall (Disc 2)".into()),
        ..RawTags::default()
    };
    assert_eq!(combined_album(&tags).as_deref(), Some("The Wall"));

    tags.album = Some("Mellon Collie (disk 1)".into());
    assert_eq!(combined_album(&tags).as_deref(), Some("Mellon Collie"));

    tags.album = Some("(Disc 1)".into());
    assert_eq!(combined_album(&tags), None);

    tags.album = Some("Live (at Wembley)".into());
    assert_eq!(combined_album(&tags).as_deref(), Some("Live (at Wembley)"));
}

#[test]
fn initials_are_lower_cased() {
    assert_eq!(initial("Zappa").as_deref(), Some("z"));
    assert_eq!(initial("Ärzte").as_deref(), Some("ä"));
    assert_eq!(initial(""), None);
}

#[test]
fn composer_prefers_sort_and_drops_secondary() {
    let d = meta(beethoven()).derived();
    assert_eq!(d.combined_composer.as_deref(), Some("Beethoven, Ludwig van"));
    assert_eq!(d.initial_composer.as_deref(), Some("b"));

    let tags = RawTags {
        composer: Some("Lennon / McCartney".into()),
        ..RawTags::default()
    };
    assert_eq!(combined_composer(&tags).as_deref(), Some("Lennon"));

    let tags = RawTags {
        artist: Some("Bach".into()),
        ..RawTags::default()
    };
    assert_eq!(combined_composer(&tags).as_deref(), Some("Bach"));
}

#[test]
fn classical_album_title_and_track() {
    let d = meta(beethoven()).derived();
    assert_eq!(d.classical_album.as_deref(), Some("Symphony No. 5 in C minor, Op. 67"));
    assert_eq!(d.classical_title.as_deref(), Some("I. Allegro con brio"));
    assert_eq!(d.classical_track.as_deref(), Some("01"));

    let tags = RawTags {
        title: Some("Work: Act 1: Scene 2".into()),
        track: Some(3),
        ..RawTags::default()
    };
    assert_eq!(classical_title(&tags).as_deref(), Some("Act 1: Scene 2"));
    assert_eq!(classical_track(&tags).as_deref(), Some("03"));
    assert_eq!(classical_album(&tags), None);
}

#[test]
fn roman_numerals() {
    assert_eq!(roman_to_int("IV"), Some(4));
    assert_eq!(roman_to_int("IX"), Some(9));
    assert_eq!(roman_to_int("XIV"), Some(14));
    assert_eq!(roman_to_int("MCMXC"), Some(1990));
    assert_eq!(roman_to_int("ABC"), None);
}

#[test]
fn performer_entries_are_normalized() {
    assert_eq!(
        Performer::parse("Martha Argerich (piano)"),
        Performer::new("piano", "Martha Argerich")
    );
    assert_eq!(Performer::parse("Anonymous"), Performer::new("", "Anonymous"));

    let tags = RawTags {
        conductor: Some("Herbert von Karajan".into()),
        performers: vec![
            "Herbert von Karajan (conductor)".into(),
            "Berliner Philharmoniker (orchestra)".into(),
            "Berliner Philharmoniker (orchestra)".into(),
        ],
        ..RawTags::default()
    };
    let raw = performer_raw(&tags);
    assert_eq!(
        raw,
        vec![
            Performer::new("conductor", "Herbert von Karajan"),
            Performer::new("orchestra", "Berliner Philharmoniker"),
        ]
    );
    assert_eq!(
        performer(&raw).as_deref(),
        Some("Herbert von Karajan, Berliner Philharmoniker")
    );
    assert_eq!(performer_short(&raw).as_deref(), Some("Karajan, BerPhi"));
}

#[test]
fn performer_short_roles() {
    let soloists = vec![
        Performer::new("piano", "Martha Argerich"),
        Performer::new("producer", "Some Producer"),
        Performer::new("choir", "Rundfunkchor St. Petersburg Kammer Chor"),
    ];
    assert_eq!(performer_short(&soloists).as_deref(), Some("Argerich, RunStPet"));

    let silent = vec![Performer::new("balance engineer", "Somebody")];
    assert_eq!(performer_short(&silent), None);

    assert_eq!(abbreviate("Orch. de Paris"), "OrcdePar");
}

#[test]
fn classical_performer_falls_back_to_albumartist() {
    let d = meta(beethoven()).derived();
    assert_eq!(
        d.classical_performer.as_deref(),
        Some("Wiener Philharmoniker, Carlos Kleiber")
    );

    let none = classical_performer(&[], None);
    assert_eq!(none, None);
    assert_eq!(classical_performer(&[], Some("Solo")).as_deref(), Some("Solo"));
}

#[test]
fn soundtrack_and_classification() {
    let policy = MetaPolicy {
        genre_classical: vec!["Classical".into()],
        soundtrack_types: vec!["soundtrack".into()],
        ..MetaPolicy::default()
    };

    let st = Meta::new(
        "/a.mp3",
        RawTags {
            releasegroup_types: vec!["album".into(), "Soundtrack".into()],
            comp: Some(true),
            ..RawTags::default()
        },
        policy.clone(),
    );
    assert!(st.derived().combined_soundtrack);
    assert_eq!(st.classification(), Classification::Soundtrack);

    let comp = Meta::new(
        "/a.mp3",
        RawTags {
            comp: Some(true),
            genre: Some("classical".into()),
            ..RawTags::default()
        },
        policy.clone(),
    );
    assert_eq!(comp.classification(), Classification::Compilation);

    let classical = Meta::new(
        "/a.mp3",
        RawTags {
            genre: Some("CLASSICAL".into()),
            ..RawTags::default()
        },
        policy.clone(),
    );
    assert_eq!(classical.classification(), Classification::Classical);

    assert_eq!(meta(beatles()).classification(), Classification::Default);
}

#[test]
fn work_top_prefers_hierarchy() {
    let mut tags = beethoven();
    assert_eq!(work_top(&tags).as_deref(), Some("Symphony No. 5 in C minor, Op. 67"));

    tags.work_hierarchy = Some("Symphony No. 5 -> I. Allegro con brio".into());
    assert_eq!(work_top(&tags).as_deref(), Some("Symphony No. 5"));

    assert_eq!(work_top(&RawTags::default()), None);
}

#[test]
fn year_prefers_original() {
    let mut tags = RawTags {
        year: Some(2001),
        ..RawTags::default()
    };
    assert_eq!(combined_year(&tags), Some(2001));
    tags.original_year = Some(1971);
    assert_eq!(combined_year(&tags), Some(1971));
    assert_eq!(combined_year(&RawTags::default()), None);
}

#[test]
fn fields_only_contain_defined_values() {
    let fields = meta(beatles()).fields();
    assert_eq!(fields.get("combined_year").map(String::as_str), Some("1965"));
    assert_eq!(fields.get("initial_artist").map(String::as_str), Some("b"));
    assert!(!fields.contains_key("composer"));
    assert!(!fields.contains_key("comp"));
    assert!(!fields.contains_key("releasegroup_types"));
    assert_eq!(meta(beatles()).field("title").as_deref(), Some("Yesterday"));
}

#[test]
fn load_reports_broken_files() {
    let store = MemoryTagStore::new();
    let err = Meta::load(&store, Path::new("/missing.flac"), MetaPolicy::default()).unwrap_err();
    assert!(matches!(err, TagError::Read { .. }));
}

#[test]
fn enrich_writes_hierarchy_and_is_idempotent() {
    let catalog = FakeCatalog::new()
        .with_recording("rec", "mov")
        .with_work("mov", "Symphony No. 5: I. Allegro con brio", Some("sym"))
        .with_work("sym", "Symphony No. 5", None);

    let mut m = meta(RawTags {
        recording_id: Some("rec".into()),
        ..RawTags::default()
    });
    let h = m.enrich_metadata(&catalog).unwrap();
    assert_eq!(h.len(), 2);

    let first = m.tags().clone();
    assert_eq!(first.work.as_deref(), Some("Symphony No. 5: I. Allegro con brio"));
    assert_eq!(first.work_id.as_deref(), Some("mov"));
    assert_eq!(
        first.work_hierarchy.as_deref(),
        Some("Symphony No. 5 -> Symphony No. 5: I. Allegro con brio")
    );
    assert_eq!(first.work_hierarchy_ids.as_deref(), Some("sym/mov"));
    assert_eq!(m.derived().work_top.as_deref(), Some("Symphony No. 5"));

    m.enrich_metadata(&catalog).unwrap();
    assert_eq!(m.tags(), &first);
}

#[test]
fn enrich_without_ids_changes_nothing() {
    let catalog = FakeCatalog::new();
    let mut m = meta(beatles());
    assert!(m.enrich_metadata(&catalog).is_none());
    assert_eq!(m.tags(), &beatles());
    assert_eq!(catalog.calls.get(), 0);
}

#[test]
fn remap_classical_keeps_originals_in_comment() {
    let mut m = meta(beethoven());
    assert!(m.remap_classical());

    let tags = m.tags();
    assert_eq!(tags.album.as_deref(), Some("Symphony No. 5 in C minor, Op. 67"));
    assert_eq!(tags.title.as_deref(), Some("I. Allegro con brio"));
    assert_eq!(tags.track, Some(1));
    let comment = tags.comment.clone().unwrap();
    assert!(comment.starts_with("Original metadata:"));
    assert!(comment.contains("track: 5"));

    assert!(!m.remap_classical());
    assert_eq!(m.tags().comment.as_deref(), Some(comment.as_str()));
}

#[test]
fn remap_twice_leaves_the_title_alone() {
    let mut m = meta(RawTags {
        title: Some("Symphony No. 5: I. Allegro: con brio".into()),
        work: Some("Symphony No. 5".into()),
        track: Some(1),
        ..RawTags::default()
    });
    assert!(m.remap_classical());
    assert_eq!(m.tags().title.as_deref(), Some("I. Allegro: con brio"));
    let once = m.tags().clone();

    let mut again = meta(once.clone());
    assert!(!again.remap_classical());
    assert_eq!(again.tags(), &once);
    assert_eq!(again.tags().title.as_deref(), Some("I. Allegro: con brio"));
}

#[test]
fn remap_without_work_is_a_no_op() {
    let mut m = meta(beatles());
    assert!(!m.remap_classical());
    assert_eq!(m.tags(), &beatles());
}

#[test]
fn save_persists_through_the_store() {
    let store = MemoryTagStore::new();
    let mut m = meta(beethoven());
    m.remap_classical();
    m.save(&store).unwrap();
    assert_eq!(
        store.get(Path::new("/music/in/file.flac")).unwrap().track,
        Some(1)
    );
}
