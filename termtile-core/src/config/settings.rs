//! Core settings

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::session::{DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SCROLLBACK_LIMIT};
use crate::tabs::DEFAULT_CONFIRM_CLOSE_THRESHOLD;

/// Name given to tabs opened for sessions without a display name.
pub const DEFAULT_TAB_NAME: &str = "Terminal";

/// Settings that shape layout and session behavior.
///
/// Every field has a default, so a partial or empty `settings.toml` is
/// valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSettings {
    /// Closing a tab with more sessions than this asks for confirmation.
    pub confirm_close_threshold: usize,
    /// Lines kept per session before the oldest are dropped.
    pub scrollback_limit: usize,
    /// Initial terminal width in columns.
    pub default_cols: u16,
    /// Initial terminal height in rows.
    pub default_rows: u16,
    /// Tab name used when a session has no display name.
    pub new_tab_name: String,
    /// Shell for local sessions; `None` uses the login shell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_shell: Option<String>,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            confirm_close_threshold: DEFAULT_CONFIRM_CLOSE_THRESHOLD,
            scrollback_limit: DEFAULT_SCROLLBACK_LIMIT,
            default_cols: DEFAULT_COLS,
            default_rows: DEFAULT_ROWS,
            new_tab_name: DEFAULT_TAB_NAME.to_string(),
            local_shell: None,
        }
    }
}

impl CoreSettings {
    /// Sets the confirmation threshold
    #[must_use]
    pub fn with_confirm_close_threshold(mut self, threshold: usize) -> Self {
        self.confirm_close_threshold = threshold;
        self
    }

    /// Sets the scrollback limit
    #[must_use]
    pub fn with_scrollback_limit(mut self, limit: usize) -> Self {
        self.scrollback_limit = limit;
        self
    }

    /// Sets the initial terminal size
    #[must_use]
    pub fn with_terminal_size(mut self, cols: u16, rows: u16) -> Self {
        self.default_cols = cols;
        self.default_rows = rows;
        self
    }

    /// Sets the shell used for local sessions
    #[must_use]
    pub fn with_local_shell(mut self, shell: impl Into<String>) -> Self {
        self.local_shell = Some(shell.into());
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scrollback_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "scrollback_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.default_cols == 0 || self.default_rows == 0 {
            return Err(ConfigError::Invalid {
                field: if self.default_cols == 0 {
                    "default_cols"
                } else {
                    "default_rows"
                },
                reason: "terminal size must be non-zero".to_string(),
            });
        }
        if self.new_tab_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "new_tab_name",
                reason: "must not be blank".to_string(),
            });
        }
        if self
            .local_shell
            .as_deref()
            .is_some_and(|shell| shell.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                field: "local_shell",
                reason: "must not be blank when set".to_string(),
            });
        }
        Ok(())
    }

    /// Parses settings from TOML and validates them.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is invalid.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
