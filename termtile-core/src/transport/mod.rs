//! Session transport boundary
//!
//! The transport opens and closes sessions and moves bytes; it is the only
//! part of the system that performs I/O. Output and lifecycle changes come
//! back as [`SessionEvent`](crate::session::SessionEvent)s on the channel
//! handed to the workspace.
//!
//! [`RecordingTransport`] is an in-memory implementation used by tests and
//! demos.

mod recording;

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::split::{ConnectionRef, SessionId};

pub use recording::{RecordingTransport, TransportCall};

/// Opens, drives and closes sessions.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Opens a session against `connection`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened.
    async fn connect(&self, connection: &ConnectionRef) -> TransportResult<SessionId>;

    /// Closes a session. Best-effort: callers log failures and continue.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport could not close the session cleanly.
    async fn disconnect(&self, session_id: SessionId) -> TransportResult<()>;

    /// Writes input bytes to a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the write fails.
    async fn send_input(&self, session_id: SessionId, data: &[u8]) -> TransportResult<()>;

    /// Changes a session's terminal size.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the resize fails.
    async fn resize(&self, session_id: SessionId, cols: u16, rows: u16) -> TransportResult<()>;
}
