use std::path::PathBuf;

use pianoroll_core::{GestureConfig, PianoRollError, Result, ViewConfig};

#[derive(serde::Serialize, serde::Deserialize, Default, Clone, Copy)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
}

impl AppConfig {
    fn validate(&self) -> Result<()> {
        self.view.validate()?;
        self.gesture.validate()
    }
}

pub(crate) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pianoroll")
        .join("config.toml")
}

fn read_config() -> Result<AppConfig> {
    let s = std::fs::read_to_string(config_path())?;
    let config: AppConfig = toml::from_str(&s).map_err(|e| PianoRollError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load the saved config, falling back to defaults when missing or invalid
pub(crate) fn load_config() -> AppConfig {
    match read_config() {
        Ok(config) => config,
        Err(PianoRollError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            tracing::warn!("Ignoring config at {}: {}", config_path().display(), e);
            AppConfig::default()
        }
    }
}

pub(crate) fn save_config(config: &AppConfig) {
    let path = config_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(s) = toml::to_string_pretty(config) else { return };
    if let Err(e) = std::fs::write(&path, s) {
        tracing::warn!("Failed to save config to {}: {}", path.display(), e);
    }
}
