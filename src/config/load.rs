use std::{env, path::Path, path::PathBuf};

use super::schema::Settings;
use crate::template::Template;

/// A command-line value keyed by its dotted settings path.
pub type Override = (&'static str, ::config::Value);

impl Settings {
    /// Load settings from the resolved config file and environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_with(resolve_config_path().as_deref(), &[])
    }

    /// Load settings from `config_path` (optional), the environment and
    /// `overrides`, which win over everything else.
    pub fn load_with(
        config_path: Option<&Path>,
        overrides: &[Override],
    ) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TUNESORT")
                .separator("__")
                .try_parsing(true),
        );

        for (key, value) in overrides {
            builder = builder.set_override(*key, value.clone())?;
        }

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.library.normalized_extensions().is_empty() {
            return Err("library.extensions must name at least one extension".to_string());
        }
        for (name, source) in [
            ("path.default", &self.path.default),
            ("path.compilation", &self.path.compilation),
            ("path.soundtrack", &self.path.soundtrack),
            ("path.classical", &self.path.classical),
        ] {
            Template::parse(source).map_err(|e| format!("{name}: {e}"))?;
        }
        if self.metadata.enrich && self.musicbrainz.user_agent.trim().is_empty() {
            return Err("musicbrainz.user_agent is required for metadata.enrich".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TUNESORT_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TUNESORT_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tunesort/config.toml`
/// or `~/.config/tunesort/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("tunesort").join("config.toml"))
}
