//! Derived fields: pure functions of the raw tags.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tags::RawTags;

static DISC_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\((?:disc|disk)\s*\d+\)\s*$").unwrap());
static MOVEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([IVXLCDM]+)\.").unwrap());

const UNKNOWN_ARTIST: &str = "Unknown";
const ARTICLES: [&str; 3] = ["The ", "A ", "An "];

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First character, lower-cased.
pub fn initial(value: &str) -> Option<String> {
    value
        .trim()
        .chars()
        .next()
        .map(|c| c.to_lowercase().collect())
}

/// Album title without a trailing `(Disc N)` / `(Disk N)`.
pub fn combined_album(tags: &RawTags) -> Option<String> {
    let album = non_empty(tags.album.as_deref())?;
    let stripped = DISC_SUFFIX.replace(album, "");
    let stripped = stripped.trim();
    (!stripped.is_empty()).then(|| stripped.to_string())
}

pub fn combined_artist(tags: &RawTags) -> Option<String> {
    [
        &tags.albumartist,
        &tags.artist,
        &tags.albumartist_credit,
        &tags.artist_credit,
    ]
    .into_iter()
    .find_map(|v| non_empty(v.as_deref()))
    .map(str::to_string)
}

/// "The Beatles" -> "Beatles, The".
pub fn sortable(name: &str) -> String {
    for article in ARTICLES {
        if let Some(rest) = name.strip_prefix(article) {
            if !rest.trim().is_empty() {
                return format!("{}, {}", rest.trim(), article.trim());
            }
        }
    }
    name.to_string()
}

pub fn combined_artist_sort(tags: &RawTags, shell_friendly: bool) -> String {
    let sort = non_empty(tags.albumartist_sort.as_deref())
        .or_else(|| non_empty(tags.artist_sort.as_deref()))
        .map(str::to_string)
        .or_else(|| combined_artist(tags).map(|a| sortable(&a)))
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    if shell_friendly {
        sort.replace(", ", "_")
    } else {
        sort
    }
}

/// Composer (sort name preferred) without a secondary composer after `/`.
pub fn combined_composer(tags: &RawTags) -> Option<String> {
    let composer = non_empty(tags.composer_sort.as_deref())
        .or_else(|| non_empty(tags.composer.as_deref()))
        .map(str::to_string)
        .or_else(|| combined_artist(tags))?;
    let primary = composer.split('/').next().unwrap_or_default().trim();
    (!primary.is_empty()).then(|| primary.to_string())
}

/// `D-T` or `T` with widths chosen from the totals.
pub fn disctrack(
    track: Option<u32>,
    tracktotal: Option<u32>,
    disc: Option<u32>,
    disctotal: Option<u32>,
) -> Option<String> {
    let track = track?;
    let track = match tracktotal {
        Some(total) if total > 99 => format!("{track:03}"),
        _ => format!("{track:02}"),
    };

    let Some(disc) = disc else {
        return Some(track);
    };
    match disctotal {
        Some(total) if total <= 1 => Some(track),
        Some(total) if total > 99 => Some(format!("{disc:03}-{track}")),
        Some(total) if total > 9 => Some(format!("{disc:02}-{track}")),
        _ => Some(format!("{disc}-{track}")),
    }
}

pub fn combined_disctrack(tags: &RawTags) -> Option<String> {
    disctrack(tags.track, tags.tracktotal, tags.disc, tags.disctotal)
}

pub fn classical_album(tags: &RawTags) -> Option<String> {
    let work = non_empty(tags.work.as_deref())?;
    let head = work.split(':').next().unwrap_or_default().trim();
    (!head.is_empty()).then(|| head.to_string())
}

/// Title with the leading `WORK:` segment removed once.
pub fn classical_title(tags: &RawTags) -> Option<String> {
    let title = non_empty(tags.title.as_deref())?;
    match title.split_once(':') {
        Some((_, rest)) if !rest.trim().is_empty() => Some(rest.trim().to_string()),
        _ => Some(title.to_string()),
    }
}

pub fn roman_to_int(numeral: &str) -> Option<u32> {
    let value = |c: char| match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    };

    let digits: Vec<u32> = numeral.chars().map(value).collect::<Option<_>>()?;
    let mut total = 0;
    for (i, d) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(next) if next > d => total -= *d as i64,
            _ => total += *d as i64,
        }
    }
    u32::try_from(total).ok().filter(|n| *n > 0)
}

/// Movement number from a roman-numeral title prefix, else the disc-track.
pub fn classical_track(tags: &RawTags) -> Option<String> {
    let movement = classical_title(tags).and_then(|title| {
        MOVEMENT
            .captures(&title)
            .and_then(|c| roman_to_int(&c[1]))
    });
    match movement {
        Some(n) => Some(format!("{n:02}")),
        None => combined_disctrack(tags),
    }
}

pub fn combined_year(tags: &RawTags) -> Option<u32> {
    tags.original_year.or(tags.year)
}

pub fn combined_soundtrack(tags: &RawTags, soundtrack_types: &[String]) -> bool {
    tags.releasegroup_types
        .iter()
        .any(|t| soundtrack_types.iter().any(|s| s.eq_ignore_ascii_case(t)))
}

pub fn work_top(tags: &RawTags) -> Option<String> {
    non_empty(tags.work_hierarchy.as_deref())
        .and_then(|h| non_empty(h.split(" -> ").next()))
        .map(str::to_string)
        .or_else(|| classical_album(tags))
}
