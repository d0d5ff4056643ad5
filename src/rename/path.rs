//! Target path construction.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::PathSettings;
use crate::error::TemplateError;
use crate::meta::{Classification, Meta};
use crate::template::Template;

/// Characters that are illegal or troublesome on common file systems.
const ILLEGAL: [char; 12] = [':', '*', '?', '"', '<', '>', '|', '\\', '~', '&', '{', '}'];
/// Extra characters dropped in shell-friendly mode.
const SHELL_SPECIAL: [char; 10] = ['\'', '(', ')', '[', ']', '!', '$', '`', ';', ','];

/// The four path templates, parsed once per job.
#[derive(Debug, Clone)]
pub struct Templates {
    default: Template,
    compilation: Template,
    soundtrack: Template,
    classical: Template,
}

impl Templates {
    pub fn from_settings(settings: &PathSettings) -> Result<Self, TemplateError> {
        Ok(Self {
            default: Template::parse(&settings.default)?,
            compilation: Template::parse(&settings.compilation)?,
            soundtrack: Template::parse(&settings.soundtrack)?,
            classical: Template::parse(&settings.classical)?,
        })
    }

    pub fn select(&self, classification: Classification) -> &Template {
        match classification {
            Classification::Soundtrack => &self.soundtrack,
            Classification::Compilation => &self.compilation,
            Classification::Classical => &self.classical,
            Classification::Default => &self.default,
        }
    }
}

/// Render and sanitize the relative target path of `meta`, without extension.
pub fn relative_target(
    meta: &Meta,
    templates: &Templates,
    settings: &PathSettings,
) -> Result<String, TemplateError> {
    let rendered = templates
        .select(meta.classification())
        .render(&meta.fields())?;
    Ok(sanitize(&rendered, settings.ascii, settings.shell_friendly))
}

/// Clean a rendered template: drop illegal characters, optionally
/// transliterate, collapse repeated separators, drop empty components.
pub fn sanitize(rendered: &str, ascii: bool, shell_friendly: bool) -> String {
    let text = if ascii {
        any_ascii::any_ascii(rendered)
    } else {
        rendered.to_string()
    };

    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        if ILLEGAL.contains(&c) || c.is_control() {
            continue;
        }
        if shell_friendly {
            if SHELL_SPECIAL.contains(&c) {
                continue;
            }
            if c.is_whitespace() {
                cleaned.push('_');
                continue;
            }
        }
        cleaned.push(c);
    }

    let mut collapsed = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if (c == '/' || c == '_') && collapsed.ends_with(c) {
            continue;
        }
        collapsed.push(c);
    }

    collapsed
        .split('/')
        .map(|part| part.trim().trim_start_matches('.').trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `base` with `.ext` appended; dots already in the name are kept.
pub fn with_extension(base: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(base.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Lower-cased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// First existing file at `base` with the source extension or any of `extensions`.
pub fn find_existing(base: &Path, source_ext: &str, extensions: &[String]) -> Option<PathBuf> {
    std::iter::once(source_ext)
        .chain(extensions.iter().map(String::as_str).filter(|e| *e != source_ext))
        .map(|ext| with_extension(base, ext))
        .find(|candidate| candidate.is_file())
}

/// Whether two paths name the same file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
