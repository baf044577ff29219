//! Tab set module
//!
//! - `tab` - a named container for one pane tree (`Tab`)
//! - `set` - ordered tabs, the active tab and cross-tab operations (`TabSet`)

mod set;
mod tab;

pub use set::{
    ApplyOutcome, ClosePlan, DEFAULT_CONFIRM_CLOSE_THRESHOLD, TabSet, TabSetSnapshot,
};
pub use tab::Tab;
