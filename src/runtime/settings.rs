use crate::cli::Args;
use crate::config::{self, Settings};

/// Effective settings: file, environment, then command-line overrides.
///
/// A missing config file means defaults; a broken or invalid one is an error.
pub fn load_settings(args: &Args) -> Result<Settings, String> {
    let path = args.config.clone().or_else(config::resolve_config_path);
    let settings = Settings::load_with(path.as_deref(), &args.overrides())
        .map_err(|e| format!("failed to load config: {e}"))?;
    settings
        .validate()
        .map_err(|msg| format!("invalid config: {msg}"))?;
    Ok(settings)
}
