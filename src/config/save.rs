use super::{ConfigError, Settings, StatePaths};
use crate::shared::fs_atomic::atomic_write_file;
use std::path::PathBuf;

pub fn save_settings(paths: &StatePaths, settings: &Settings) -> Result<PathBuf, ConfigError> {
    settings.validate()?;
    let path = paths.settings_file();
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(&path, body.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

/// Writes default settings when no settings file exists yet. Returns whether
/// a file was created.
pub fn init_settings(paths: &StatePaths) -> Result<bool, ConfigError> {
    if paths.settings_file().exists() {
        return Ok(false);
    }
    save_settings(paths, &Settings::default())?;
    Ok(true)
}
