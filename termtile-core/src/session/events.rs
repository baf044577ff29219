//! Session events and lifecycle status
//!
//! The transport pushes events into an unbounded channel; the workspace
//! drains it and hands each event to the registry, which routes it by
//! session id.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::split::SessionId;

/// An event emitted by a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Output bytes from the session.
    Data {
        /// Source session.
        session_id: SessionId,
        /// Raw output.
        bytes: Vec<u8>,
    },
    /// The remote process exited.
    Exit {
        /// Source session.
        session_id: SessionId,
        /// Exit status, if the transport reported one.
        code: Option<i32>,
    },
    /// The channel was closed.
    Closed {
        /// Source session.
        session_id: SessionId,
    },
    /// The connection was lost.
    Dead {
        /// Source session.
        session_id: SessionId,
        /// Why the connection died.
        reason: String,
    },
}

impl SessionEvent {
    /// Creates a data event.
    #[must_use]
    pub fn data(session_id: SessionId, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Data {
            session_id,
            bytes: bytes.into(),
        }
    }

    /// Returns the session this event belongs to.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        match self {
            Self::Data { session_id, .. }
            | Self::Exit { session_id, .. }
            | Self::Closed { session_id }
            | Self::Dead { session_id, .. } => *session_id,
        }
    }

    /// Returns true for events after which no more data arrives.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Data { .. })
    }

    /// Short name of the event kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Data { .. } => "data",
            Self::Exit { .. } => "exit",
            Self::Closed { .. } => "closed",
            Self::Dead { .. } => "dead",
        }
    }
}

/// Last lifecycle state seen for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    /// The session is running.
    #[default]
    Active,
    /// The remote process exited.
    Exited {
        /// Exit status, if known.
        code: Option<i32>,
    },
    /// The channel was closed.
    Closed,
    /// The connection was lost.
    Dead {
        /// Why the connection died.
        reason: String,
    },
}

impl SessionStatus {
    /// Returns true while the session can still produce output.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Status implied by an event, or `None` for data events.
    #[must_use]
    pub fn from_event(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::Data { .. } => None,
            SessionEvent::Exit { code, .. } => Some(Self::Exited { code: *code }),
            SessionEvent::Closed { .. } => Some(Self::Closed),
            SessionEvent::Dead { reason, .. } => Some(Self::Dead {
                reason: reason.clone(),
            }),
        }
    }
}

/// Sending half of the session event channel.
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// Receiving half of the session event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Creates a session event channel.
#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
