use super::{ConfigError, Settings, StatePaths};

/// Loads settings from the state root. A missing file means defaults; the
/// API base environment override is applied before validation.
pub fn load_settings(paths: &StatePaths) -> Result<Settings, ConfigError> {
    let path = paths.settings_file();
    let settings = if path.exists() {
        Settings::from_path(&path)?
    } else {
        Settings::default()
    };
    let settings = settings.with_env_overrides();
    settings.validate()?;
    Ok(settings)
}
