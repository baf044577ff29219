//! Loading and saving settings on disk

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::trace_operation;
use crate::tracing::span_names;

use super::settings::CoreSettings;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

const APP_DIR_NAME: &str = "termtile";

/// Reads and writes [`CoreSettings`] as `settings.toml`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the per-user config directory (`~/.config/termtile` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has no config
    /// directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Uses an explicit directory.
    #[must_use]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Directory holding the settings file
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Loads settings. A missing or blank file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds an invalid value.
    pub fn load(&self) -> ConfigResult<CoreSettings> {
        let path = self.settings_path();
        let span = trace_operation!(span_names::CONFIG_LOAD, path = %path.display());
        let _guard = span.enter();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(CoreSettings::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(CoreSettings::default());
        }

        match CoreSettings::from_toml(&text) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "Settings loaded");
                Ok(settings)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "Rejected settings file");
                Err(error)
            }
        }
    }

    /// Validates and writes settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is invalid or the file cannot be written.
    pub fn save(&self, settings: &CoreSettings) -> ConfigResult<()> {
        let path = self.settings_path();
        let span = trace_operation!(span_names::CONFIG_SAVE, path = %path.display());
        let _guard = span.enter();

        settings.validate()?;
        let text = settings.to_toml()?;

        std::fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Write {
            path: self.config_dir.clone(),
            source,
        })?;
        std::fs::write(&path, text).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Settings saved");
        Ok(())
    }
}
