use anyhow::Result;
use std::path::PathBuf;

/// Settings file location, in priority order:
/// 1. Environment variable `GANTTGRAB_SETTINGS` (full file path)
/// 2. User config directory (`~/.config/ganttgrab/settings.toml` on Unix,
///    `%APPDATA%\ganttgrab\settings.toml` on Windows)
pub fn default_settings_path() -> Result<PathBuf> {
    if let Ok(env_path) = std::env::var("GANTTGRAB_SETTINGS") {
        return Ok(PathBuf::from(env_path));
    }

    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine user config directory"))?;
    Ok(base_dir.join("ganttgrab").join("settings.toml"))
}
