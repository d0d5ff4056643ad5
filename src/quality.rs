//! Quality comparison between a source file and the file already sitting at
//! its target path.

use std::fmt;

use crate::error::QualityError;
use crate::tags::AudioProperties;

/// Codec ranks; higher is better.
const CODEC_RANKS: [(&str, u8); 6] = [
    ("flac", 10),
    ("alac", 9),
    ("aac", 8),
    ("mp3", 5),
    ("ogg", 2),
    ("wma", 1),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Winner {
    Source,
    Target,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Source => write!(f, "source"),
            Winner::Target => write!(f, "target"),
        }
    }
}

/// Outcome of a comparison with a human-readable justification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub winner: Winner,
    pub reason: String,
}

pub fn codec_rank(codec: &str) -> Result<u8, QualityError> {
    let codec = codec.to_ascii_lowercase();
    CODEC_RANKS
        .iter()
        .find(|(name, _)| *name == codec)
        .map(|(_, rank)| *rank)
        .ok_or(QualityError::UnknownCodec(codec))
}

/// Pick the better of two files: codec rank first, then bitrate.
///
/// Equal codecs compare bitrates and a tie keeps the target. A codec
/// without a rank is an error rather than a guess.
pub fn arbitrate(source: &AudioProperties, target: &AudioProperties) -> Result<Verdict, QualityError> {
    let source_codec = source
        .codec
        .as_deref()
        .ok_or_else(|| QualityError::UnknownCodec("<none>".to_string()))?;
    let target_codec = target
        .codec
        .as_deref()
        .ok_or_else(|| QualityError::UnknownCodec("<none>".to_string()))?;

    if source_codec.eq_ignore_ascii_case(target_codec) {
        let sb = source.bitrate.unwrap_or(0);
        let tb = target.bitrate.unwrap_or(0);
        let winner = if sb > tb { Winner::Source } else { Winner::Target };
        return Ok(Verdict {
            winner,
            reason: format!("bitrate: source {sb} kbps, target {tb} kbps"),
        });
    }

    let sr = codec_rank(source_codec)?;
    let tr = codec_rank(target_codec)?;
    let winner = if sr > tr { Winner::Source } else { Winner::Target };
    Ok(Verdict {
        winner,
        reason: format!("format: source {source_codec}, target {target_codec}"),
    })
}
