//! Configuration management for termtile
//!
//! [`CoreSettings`] holds the knobs the layout and session layers read, and
//! [`ConfigManager`] loads and saves them as TOML.

mod manager;
pub mod settings;

pub use manager::{ConfigManager, SETTINGS_FILE_NAME};
pub use settings::{CoreSettings, DEFAULT_TAB_NAME};
