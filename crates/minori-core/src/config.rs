use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::MinoriError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub helper: HelperConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Directory watched for anime playback. Files outside it are ignored.
    pub anime_dir: PathBuf,
    /// Fraction of the file (0–1) that must be watched before progress is
    /// reported.
    pub mark_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Helper executable. Resolved through PATH when not absolute.
    pub program: PathBuf,
}

impl Config {
    /// Load config: the user file under the mpv config dir if present,
    /// built-in defaults otherwise.
    pub fn load() -> Result<Self, MinoriError> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let user_str = std::fs::read_to_string(&path)
                .map_err(|e| MinoriError::Config(e.to_string()))?;
            toml::from_str(&user_str).map_err(|e| MinoriError::Config(e.to_string()))?
        } else {
            Self::default()
        };

        config.tracking.anime_dir = expand_home(&config.tracking.anime_dir);
        config.validate()?;
        Ok(config)
    }

    /// Reject values no call site can work with.
    pub fn validate(&self) -> Result<(), MinoriError> {
        let t = self.tracking.mark_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(MinoriError::Config(format!(
                "tracking.mark_threshold must be within 0..=1, got {t}"
            )));
        }
        Ok(())
    }

    /// Path to the user config file (`<config>/mpv/minori.toml`).
    pub fn config_path() -> PathBuf {
        Self::mpv_config_dir().join("minori.toml")
    }

    /// Directory holding plugin state: the token file and the log.
    pub fn state_dir() -> PathBuf {
        Self::mpv_config_dir().join("minori")
    }

    /// Ensure the state directory exists and return it.
    pub fn ensure_state_dir() -> Result<PathBuf, MinoriError> {
        let dir = Self::state_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn mpv_config_dir() -> PathBuf {
        BaseDirs::new()
            .map(|d| d.config_dir().join("mpv"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Expand a leading `~/` against the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(stripped),
        None => path.to_path_buf(),
    }
}
