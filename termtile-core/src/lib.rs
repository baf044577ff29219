//! termtile Core Library
//!
//! Layout and session bookkeeping for a tiling terminal: a binary pane tree
//! per tab, an ordered tab set, a registry of live session resources and a
//! drag-gesture state machine, tied together by a single [`Workspace`] that
//! turns user intents into state changes and transport calls.
//!
//! # Crate Structure
//!
//! - [`split`] - Pane tree type, pure transformations and geometry
//! - [`tabs`] - Ordered tabs with detach and merge
//! - [`session`] - Session events and the resource registry
//! - [`drag_drop`] - Pointer gesture state machine and edge classification
//! - [`intent`] - Typed user intents and their outcomes
//! - [`workspace`] - The single owner with mutation authority
//! - [`transport`] - Session transport trait and an in-memory implementation
//! - [`config`] - Settings and their persistence
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod drag_drop;
pub mod error;
pub mod intent;
pub mod notification;
pub mod session;
pub mod split;
pub mod tabs;
pub mod tracing;
pub mod transport;
pub mod workspace;

pub use config::{ConfigManager, CoreSettings};
pub use drag_drop::{
    DragGesture, DragReorganizer, DragState, DropAction, DropTarget, calculate_edge,
    calculate_edge_in,
};
pub use error::{
    ConfigError, ConfigResult, TransportError, TransportResult, WorkspaceError, WorkspaceResult,
};
pub use intent::{Confirmation, Intent, IntentOutcome};
pub use notification::{Notification, NotificationLevel};
pub use session::{
    AttachOutcome, EventReceiver, EventSender, IoSubscription, ResourceHandle, SessionEntry,
    SessionEvent, SessionRegistry, SessionResource, SessionStatus, TerminalBuffer, ViewId,
    event_channel,
};
pub use split::{
    ConnectionId, ConnectionRef, Edge, InvariantViolation, LeafPane, NavDirection, PaneId,
    PaneNode, Point, Rect, SessionId, SessionRef, SplitAxis, SplitPane, TabId,
};
pub use tabs::{ApplyOutcome, ClosePlan, Tab, TabSet, TabSetSnapshot};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult,
    get_tracing_config, init_tracing, is_tracing_initialized, span_names,
};
pub use transport::{RecordingTransport, SessionTransport, TransportCall};
pub use workspace::{ConnectResolution, PendingConnect, Placement, Workspace};
