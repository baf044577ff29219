//! Error types for termtile-core
//!
//! Structural operations on pane trees and tab sets never fail; unknown
//! ids are no-ops. Errors only come from the transport, from settings on
//! disk, and from workspace calls that address a session directly.

use std::path::PathBuf;

use thiserror::Error;

use crate::split::{SessionId, TabId};

/// Errors reported by a session transport
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Opening the session failed
    #[error("Failed to connect to {target}: {reason}")]
    ConnectFailed {
        /// What was being connected to
        target: String,
        /// Why it failed
        reason: String,
    },

    /// Closing the session failed
    #[error("Failed to disconnect {session_id}: {reason}")]
    DisconnectFailed {
        /// Session being closed
        session_id: SessionId,
        /// Why it failed
        reason: String,
    },

    /// The transport has no session with this id
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),

    /// Writing to or resizing the session failed
    #[error("I/O error on {session_id}: {reason}")]
    Io {
        /// Affected session
        session_id: SessionId,
        /// Why it failed
        reason: String,
    },

    /// The transport was shut down
    #[error("Transport is closed")]
    Closed,
}

/// Errors loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No per-user configuration directory could be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// Reading the settings file failed
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Writing the settings file failed
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File that was written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the settings schema
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting has an unusable value
    #[error("Invalid setting {field}: {reason}")]
    Invalid {
        /// Name of the setting
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors returned by workspace calls that address a session or tab directly
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The session is not open in this workspace
    #[error("Session not open: {0}")]
    UnknownSession(SessionId),

    /// The tab does not exist
    #[error("Tab not found: {0}")]
    UnknownTab(TabId),

    /// The transport rejected the call
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result type for settings operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for workspace operations
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;
