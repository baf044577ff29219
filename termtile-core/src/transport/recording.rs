//! In-memory transport that records every call

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::SessionTransport;
use crate::error::{TransportError, TransportResult};
use crate::session::{EventReceiver, EventSender, SessionEvent, event_channel};
use crate::split::{ConnectionRef, SessionId};

/// A call made on a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// `connect`
    Connect(ConnectionRef),
    /// `disconnect`
    Disconnect(SessionId),
    /// `send_input`
    SendInput(SessionId, Vec<u8>),
    /// `resize`
    Resize(SessionId, u16, u16),
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<TransportCall>,
    open: HashSet<SessionId>,
}

/// In-memory transport.
///
/// Sessions exist only as ids. Input is echoed back as a data event when
/// echo is on, and a successful disconnect emits a `Closed` event. Connect
/// and disconnect failures can be switched on to exercise error paths.
#[derive(Debug)]
pub struct RecordingTransport {
    state: Mutex<RecordingState>,
    events: EventSender,
    fail_connects: AtomicBool,
    fail_disconnects: AtomicBool,
    echo: AtomicBool,
}

impl RecordingTransport {
    /// Creates a transport and the receiver for its events.
    #[must_use]
    pub fn channel() -> (Self, EventReceiver) {
        let (events, receiver) = event_channel();
        let transport = Self {
            state: Mutex::new(RecordingState::default()),
            events,
            fail_connects: AtomicBool::new(false),
            fail_disconnects: AtomicBool::new(false),
            echo: AtomicBool::new(false),
        };
        (transport, receiver)
    }

    /// Makes subsequent connects fail.
    pub fn set_fail_connects(&self, fail: bool) {
        self.fail_connects.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent disconnects fail (the session is still dropped).
    pub fn set_fail_disconnects(&self, fail: bool) {
        self.fail_disconnects.store(fail, Ordering::SeqCst);
    }

    /// Echoes input back as data events.
    pub fn set_echo(&self, echo: bool) {
        self.echo.store(echo, Ordering::SeqCst);
    }

    /// Pushes an event as if it came from a session.
    ///
    /// Returns false if the receiver is gone.
    pub fn emit(&self, event: SessionEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// All calls made so far, in order.
    pub async fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().await.calls.clone()
    }

    /// Session ids passed to `disconnect`, in order.
    pub async fn disconnects(&self) -> Vec<SessionId> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Disconnect(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Number of `connect` calls made so far.
    pub async fn connect_count(&self) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| matches!(call, TransportCall::Connect(_)))
            .count()
    }

    /// Sessions that are connected and not yet disconnected.
    pub async fn open_sessions(&self) -> HashSet<SessionId> {
        self.state.lock().await.open.clone()
    }
}

#[async_trait]
impl SessionTransport for RecordingTransport {
    async fn connect(&self, connection: &ConnectionRef) -> TransportResult<SessionId> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::Connect(connection.clone()));
        if self.fail_connects.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectFailed {
                target: connection.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        let session_id = SessionId::new();
        state.open.insert(session_id);
        Ok(session_id)
    }

    async fn disconnect(&self, session_id: SessionId) -> TransportResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::Disconnect(session_id));
        if !state.open.remove(&session_id) {
            return Err(TransportError::UnknownSession(session_id));
        }
        if self.fail_disconnects.load(Ordering::SeqCst) {
            return Err(TransportError::DisconnectFailed {
                session_id,
                reason: "remote did not respond".to_string(),
            });
        }
        let _ = self.events.send(SessionEvent::Closed { session_id });
        Ok(())
    }

    async fn send_input(&self, session_id: SessionId, data: &[u8]) -> TransportResult<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(TransportCall::SendInput(session_id, data.to_vec()));
        if !state.open.contains(&session_id) {
            return Err(TransportError::UnknownSession(session_id));
        }
        if self.echo.load(Ordering::SeqCst) {
            let _ = self.events.send(SessionEvent::data(session_id, data));
        }
        Ok(())
    }

    async fn resize(&self, session_id: SessionId, cols: u16, rows: u16) -> TransportResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::Resize(session_id, cols, rows));
        if state.open.contains(&session_id) {
            Ok(())
        } else {
            Err(TransportError::UnknownSession(session_id))
        }
    }
}
