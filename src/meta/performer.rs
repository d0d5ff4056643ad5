//! Classical performer credits.

use crate::tags::RawTags;

const LEADING_ROLES: [&str; 2] = ["conductor", "orchestra"];
const SILENT_ROLES: [&str; 3] = ["producer", "executive producer", "balance engineer"];
const ENSEMBLE_ROLES: [&str; 4] = ["orchestra", "choir", "choir vocals", "ensemble"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performer {
    pub role: String,
    pub name: String,
}

impl Performer {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Parse `Name (role)`; entries without a role get an empty one.
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        if let Some(open) = entry.rfind(" (") {
            if let Some(role) = entry[open + 2..].strip_suffix(')') {
                return Self::new(role.trim(), entry[..open].trim());
            }
        }
        Self::new("", entry)
    }

    fn role_is(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.role.eq_ignore_ascii_case(r))
    }

    /// Contribution to the short performer string.
    fn short(&self) -> String {
        if self.role_is(&SILENT_ROLES) {
            String::new()
        } else if self.role_is(&ENSEMBLE_ROLES) {
            abbreviate(&self.name)
        } else {
            self.name
                .split_whitespace()
                .last()
                .unwrap_or_default()
                .to_string()
        }
    }
}

/// "Wiener Philharmoniker" -> "WiePhi".
pub fn abbreviate(name: &str) -> String {
    name.split_whitespace()
        .take(3)
        .map(|word| word.chars().filter(|c| *c != '.').take(3).collect::<String>())
        .collect()
}

/// Conductor first, then the tagged performers, consecutive repeats removed.
pub fn performer_raw(tags: &RawTags) -> Vec<Performer> {
    let mut out: Vec<Performer> = Vec::new();
    if let Some(conductor) = tags.conductor.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        out.push(Performer::new("conductor", conductor));
    }
    out.extend(
        tags.performers
            .iter()
            .filter(|e| !e.trim().is_empty())
            .map(|e| Performer::parse(e)),
    );
    out.dedup();
    out
}

pub fn performer(performers: &[Performer]) -> Option<String> {
    let names: Vec<&str> = performers.iter().map(|p| p.name.as_str()).collect();
    (!names.is_empty()).then(|| names.join(", "))
}

pub fn performer_short(performers: &[Performer]) -> Option<String> {
    let leading = performers.iter().any(|p| p.role_is(&LEADING_ROLES));
    let parts: Vec<String> = performers
        .iter()
        .filter(|p| !leading || p.role_is(&LEADING_ROLES))
        .map(Performer::short)
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Short performers, else the last `; `-separated album artist.
pub fn classical_performer(performers: &[Performer], albumartist: Option<&str>) -> Option<String> {
    performer_short(performers).or_else(|| {
        let albumartist = albumartist?.trim();
        let last = albumartist
            .rsplit_once("; ")
            .map(|(_, last)| last)
            .unwrap_or(albumartist)
            .trim();
        (!last.is_empty()).then(|| last.to_string())
    })
}
