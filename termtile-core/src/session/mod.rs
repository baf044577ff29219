//! Session registry module
//!
//! This module keeps live session state alive across view remounts:
//!
//! - `registry` - `SessionRegistry`, view attachment and event routing
//! - `resource` - the `SessionResource` trait and `TerminalBuffer`
//! - `events` - `SessionEvent`, `SessionStatus` and the event channel

mod events;
mod registry;
mod resource;

pub use events::{EventReceiver, EventSender, SessionEvent, SessionStatus, event_channel};
pub use registry::{
    AttachOutcome, IoSubscription, ResourceHandle, SessionEntry, SessionRegistry, ViewId,
};
pub use resource::{
    DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SCROLLBACK_LIMIT, SessionResource, TerminalBuffer,
};
