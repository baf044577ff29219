//! The workspace: single owner of layout and session state
//!
//! [`Workspace`] holds the [`TabSet`], the [`SessionRegistry`], the
//! transport and its event stream. Every user intent goes through
//! [`Workspace::dispatch`]; nothing else mutates the layout.
//!
//! Session creation is split in two phases so the layout never waits on
//! the network: [`Workspace::begin_connect`] captures what to open and
//! where, the returned [`PendingConnect`] performs the connect without
//! borrowing the workspace, and [`Workspace::finish_connect`] places the
//! session. If the target pane vanished in between, the new session is
//! disconnected immediately.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::Instrument;

use crate::config::CoreSettings;
use crate::drag_drop::DropAction;
use crate::error::{TransportResult, WorkspaceError, WorkspaceResult};
use crate::intent::{Confirmation, Intent, IntentOutcome};
use crate::notification::Notification;
use crate::session::{EventReceiver, SessionEvent, SessionRegistry, TerminalBuffer};
use crate::split::{ConnectionRef, NavDirection, PaneId, PaneNode, SessionId, SessionRef, SplitAxis, TabId};
use crate::tabs::{ApplyOutcome, TabSet, TabSetSnapshot};
use crate::trace_operation;
use crate::tracing::span_names;
use crate::transport::SessionTransport;

/// Disconnects issued at once during teardown.
const TEARDOWN_CONCURRENCY: usize = 8;

/// Where a newly connected session goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A new tab, which becomes active.
    NewTab,
    /// The second half of a split of an existing pane.
    SplitPane {
        /// Pane to split.
        pane_id: PaneId,
        /// Direction of the split.
        axis: SplitAxis,
    },
}

/// A connect that has been requested but not yet performed.
///
/// Holds its own handle to the transport so the workspace stays free for
/// other intents while [`resolve`](Self::resolve) runs.
pub struct PendingConnect {
    transport: Arc<dyn SessionTransport>,
    connection: ConnectionRef,
    placement: Placement,
    display_name: String,
}

impl PendingConnect {
    /// Overrides the session title.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Where the session will be placed.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Performs the connect.
    pub async fn resolve(self) -> ConnectResolution {
        let span = trace_operation!(
            span_names::SESSION_CONNECT,
            connection = %self.connection
        );
        span.in_scope(|| tracing::debug!(connection = %self.connection, "Connecting"));
        let result = self
            .transport
            .connect(&self.connection)
            .instrument(span)
            .await;
        ConnectResolution {
            connection: self.connection,
            placement: self.placement,
            display_name: self.display_name,
            result,
        }
    }
}

impl std::fmt::Debug for PendingConnect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingConnect")
            .field("connection", &self.connection)
            .field("placement", &self.placement)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// A connect that has completed, successfully or not.
#[derive(Debug)]
pub struct ConnectResolution {
    /// What was connected to.
    pub connection: ConnectionRef,
    /// Where the session goes.
    pub placement: Placement,
    /// Session title.
    pub display_name: String,
    /// The new session, or why it could not be opened.
    pub result: TransportResult<SessionId>,
}

/// Layout, sessions and transport behind one mutation owner.
pub struct Workspace {
    tabs: TabSet,
    registry: SessionRegistry<TerminalBuffer>,
    transport: Arc<dyn SessionTransport>,
    events: EventReceiver,
    settings: CoreSettings,
    notifications: VecDeque<Notification>,
}

impl Workspace {
    /// Creates an empty workspace.
    ///
    /// `events` must be the receiving end of the channel `transport` sends
    /// its session events to.
    #[must_use]
    pub fn new(
        transport: Arc<dyn SessionTransport>,
        events: EventReceiver,
        settings: CoreSettings,
    ) -> Self {
        let scrollback = settings.scrollback_limit;
        let (cols, rows) = (settings.default_cols, settings.default_rows);
        Self {
            tabs: TabSet::new().with_confirm_threshold(settings.confirm_close_threshold),
            registry: SessionRegistry::with_factory(move |session_id| {
                TerminalBuffer::with_limits(session_id, scrollback, cols, rows)
            }),
            transport,
            events,
            settings,
            notifications: VecDeque::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The tab set.
    #[must_use]
    pub const fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    /// Serializable copy of the layout for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> TabSetSnapshot {
        self.tabs.snapshot()
    }

    /// The session registry.
    #[must_use]
    pub const fn registry(&self) -> &SessionRegistry<TerminalBuffer> {
        &self.registry
    }

    /// The session registry, for attaching and detaching views.
    pub fn registry_mut(&mut self) -> &mut SessionRegistry<TerminalBuffer> {
        &mut self.registry
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    /// Queued notifications, oldest first.
    #[must_use]
    pub const fn notifications(&self) -> &VecDeque<Notification> {
        &self.notifications
    }

    /// Removes and returns every queued notification.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Sessions currently registered.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.registry.session_ids()
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
    }

    // ========================================================================
    // Session creation
    // ========================================================================

    /// Captures a connect request without touching the layout.
    ///
    /// A local shell without an explicit shell uses the configured one. The
    /// session title defaults to the configured new-tab name.
    #[must_use]
    pub fn begin_connect(&self, connection: ConnectionRef, placement: Placement) -> PendingConnect {
        let connection = match connection {
            ConnectionRef::LocalShell { shell: None } => ConnectionRef::LocalShell {
                shell: self.settings.local_shell.clone(),
            },
            other => other,
        };
        PendingConnect {
            transport: Arc::clone(&self.transport),
            connection,
            placement,
            display_name: self.settings.new_tab_name.clone(),
        }
    }

    /// Places a resolved session in the layout.
    ///
    /// A failed connect queues an error notification and leaves the layout
    /// untouched. A session whose target pane no longer exists is
    /// disconnected straight away.
    pub async fn finish_connect(&mut self, resolution: ConnectResolution) -> IntentOutcome {
        let ConnectResolution {
            connection,
            placement,
            display_name,
            result,
        } = resolution;

        let session_id = match result {
            Ok(session_id) => session_id,
            Err(error) => {
                tracing::warn!(connection = %connection, error = %error, "Failed to open session");
                self.notify(Notification::error(format!(
                    "Could not open {display_name}: {error}"
                )));
                return IntentOutcome::Failed;
            }
        };
        let session = SessionRef::new(session_id, connection, display_name);

        match placement {
            Placement::NewTab => {
                let tab_id = self.tabs.open_tab(session);
                self.registry.get_or_create(session_id);
                tracing::info!(session_id = %session_id, tab_id = %tab_id, "Session opened in new tab");
                IntentOutcome::Applied
            }
            Placement::SplitPane { pane_id, axis } => {
                let Some(tab_id) = self.leaf_tab(pane_id) else {
                    tracing::info!(
                        session_id = %session_id,
                        pane_id = %pane_id,
                        "Target pane closed before connect finished, dropping session"
                    );
                    self.teardown(vec![session_id]).await;
                    return IntentOutcome::Cancelled;
                };
                self.tabs
                    .apply_to_tab(tab_id, |tree| Some(tree.split(pane_id, axis, session)));
                self.registry.get_or_create(session_id);
                tracing::info!(
                    session_id = %session_id,
                    tab_id = %tab_id,
                    pane_id = %pane_id,
                    "Session opened in split"
                );
                IntentOutcome::Applied
            }
        }
    }

    /// Connects and places a session in one call.
    pub async fn open_session(
        &mut self,
        connection: ConnectionRef,
        placement: Placement,
    ) -> IntentOutcome {
        let resolution = self.begin_connect(connection, placement).resolve().await;
        self.finish_connect(resolution).await
    }

    async fn open_named(
        &mut self,
        connection: ConnectionRef,
        placement: Placement,
        display_name: Option<String>,
    ) -> IntentOutcome {
        let mut pending = self.begin_connect(connection, placement);
        if let Some(name) = display_name {
            pending = pending.with_display_name(name);
        }
        let resolution = pending.resolve().await;
        self.finish_connect(resolution).await
    }

    // ========================================================================
    // Intents
    // ========================================================================

    /// Applies an intent.
    ///
    /// Closing a pane subtree or a tab with more sessions than the
    /// configured threshold returns [`IntentOutcome::NeedsConfirmation`]
    /// until re-sent with [`Confirmation::Confirmed`].
    pub async fn dispatch(&mut self, intent: Intent, confirmation: Confirmation) -> IntentOutcome {
        tracing::debug!(intent = intent.kind(), "Dispatching intent");
        match intent {
            Intent::Split {
                pane_id,
                axis,
                connection,
                display_name,
            } => {
                if self.leaf_tab(pane_id).is_none() {
                    return IntentOutcome::NoOp;
                }
                self.open_named(connection, Placement::SplitPane { pane_id, axis }, display_name)
                    .await
            }
            Intent::NewTab {
                connection,
                display_name,
            } => {
                self.open_named(connection, Placement::NewTab, display_name)
                    .await
            }
            Intent::Close { pane_id } => self.close_pane(pane_id, confirmation).await,
            Intent::CloseTab { tab_id } => self.close_tab(tab_id, confirmation).await,
            Intent::Focus { pane_id } => self.focus_pane(pane_id),
            Intent::FocusAdjacent { direction } => self.focus_adjacent(direction),
            Intent::RatioChange { split_id, ratio } => self.change_ratio(split_id, ratio),
            Intent::Detach { tab_id, pane_id } => {
                IntentOutcome::from_changed(self.tabs.detach_pane(tab_id, pane_id).is_some())
            }
            Intent::Reorganize {
                source,
                target,
                edge,
            } => {
                let Some(tab_id) = self.tabs.tab_of_pane(source) else {
                    return IntentOutcome::NoOp;
                };
                if self.tabs.tab_of_pane(target) != Some(tab_id) {
                    return IntentOutcome::NoOp;
                }
                self.transform(tab_id, |tree| tree.reorganize(source, target, edge))
            }
            Intent::MergeTab { source, target } => {
                IntentOutcome::from_changed(self.tabs.merge_tab(source, target))
            }
            Intent::RenameTab { tab_id, name } => {
                IntentOutcome::from_changed(self.tabs.rename_tab(tab_id, name))
            }
            Intent::SwitchTab { tab_id } => {
                IntentOutcome::from_changed(self.tabs.switch_tab(tab_id))
            }
            Intent::ReorderTabs { order } => {
                IntentOutcome::from_changed(self.tabs.reorder_tabs(&order))
            }
            Intent::MoveTab { tab_id, index } => {
                IntentOutcome::from_changed(self.tabs.move_tab(tab_id, index))
            }
        }
    }

    /// Applies the action proposed by a finished drag gesture.
    pub async fn dispatch_drop(&mut self, action: DropAction) -> IntentOutcome {
        let intent = match action {
            DropAction::Reorganize {
                source,
                target,
                edge,
            } => Intent::Reorganize {
                source,
                target,
                edge,
            },
            DropAction::DetachPane(pane_id) => {
                let Some(tab_id) = self.tabs.tab_of_pane(pane_id) else {
                    return IntentOutcome::NoOp;
                };
                Intent::Detach { tab_id, pane_id }
            }
            DropAction::MergeTab { source, target } => Intent::MergeTab { source, target },
            DropAction::MoveTab { tab_id, index } => Intent::MoveTab { tab_id, index },
        };
        self.dispatch(intent, Confirmation::Unconfirmed).await
    }

    async fn close_pane(&mut self, pane_id: PaneId, confirmation: Confirmation) -> IntentOutcome {
        let Some(tab_id) = self.tabs.tab_of_pane(pane_id) else {
            return IntentOutcome::NoOp;
        };
        let sessions: Vec<SessionId> = self
            .tabs
            .tab(tab_id)
            .map(|tab| {
                tab.pane_tree
                    .leaves_under(pane_id)
                    .into_iter()
                    .map(|leaf| leaf.session.id)
                    .collect()
            })
            .unwrap_or_default();
        if self.tabs.requires_confirmation(sessions.len()) && !confirmation.is_confirmed() {
            return IntentOutcome::NeedsConfirmation { sessions };
        }

        self.tabs
            .apply_to_tab(tab_id, |tree| tree.close(pane_id).map(ensure_focus));
        tracing::debug!(tab_id = %tab_id, pane_id = %pane_id, "Pane closed");
        self.teardown(sessions).await;
        IntentOutcome::Applied
    }

    async fn close_tab(&mut self, tab_id: TabId, confirmation: Confirmation) -> IntentOutcome {
        let Some(plan) = self.tabs.close_plan(tab_id) else {
            return IntentOutcome::NoOp;
        };
        if plan.requires_confirmation && !confirmation.is_confirmed() {
            return IntentOutcome::NeedsConfirmation {
                sessions: plan.sessions,
            };
        }

        let span = trace_operation!(span_names::TAB_CLOSE, tab_id = %tab_id);
        span.in_scope(|| {
            self.tabs.close_tab(tab_id);
            tracing::info!(tab_id = %tab_id, sessions = plan.sessions.len(), "Closing tab");
        });
        self.teardown(plan.sessions).await;
        IntentOutcome::Applied
    }

    fn focus_pane(&mut self, pane_id: PaneId) -> IntentOutcome {
        let Some(tab_id) = self.leaf_tab(pane_id) else {
            return IntentOutcome::NoOp;
        };
        self.tabs.switch_tab(tab_id);
        self.tabs
            .apply_to_tab(tab_id, |tree| Some(tree.set_focus(pane_id)));
        IntentOutcome::Applied
    }

    fn focus_adjacent(&mut self, direction: NavDirection) -> IntentOutcome {
        let Some(tab) = self.tabs.active_tab() else {
            return IntentOutcome::NoOp;
        };
        let tree = &tab.pane_tree;
        let current = tree.focused().unwrap_or_else(|| tree.first_leaf()).id;
        let (tab_id, next) = match tree.adjacent(current, direction) {
            Some(next) if next != current => (tab.id, next),
            _ => return IntentOutcome::NoOp,
        };
        self.tabs
            .apply_to_tab(tab_id, |tree| Some(tree.set_focus(next)));
        IntentOutcome::Applied
    }

    fn change_ratio(&mut self, split_id: PaneId, ratio: f64) -> IntentOutcome {
        if ratio.is_nan() {
            return IntentOutcome::NoOp;
        }
        let Some(tab_id) = self.tabs.tab_of_pane(split_id) else {
            return IntentOutcome::NoOp;
        };
        self.transform(tab_id, |tree| tree.update_ratio(split_id, ratio))
    }

    /// Runs a shape-preserving transformation and reports whether it
    /// changed anything.
    fn transform<F>(&mut self, tab_id: TabId, f: F) -> IntentOutcome
    where
        F: FnOnce(PaneNode) -> PaneNode,
    {
        let mut changed = false;
        let outcome = self.tabs.apply_to_tab(tab_id, |tree| {
            let before = tree.clone();
            let after = f(tree);
            changed = after != before;
            Some(after)
        });
        IntentOutcome::from_changed(outcome == ApplyOutcome::Updated && changed)
    }

    fn leaf_tab(&self, pane_id: PaneId) -> Option<TabId> {
        self.tabs.tabs().iter().find_map(|tab| {
            tab.pane_tree
                .find_leaf(pane_id)
                .map(|_| tab.id)
        })
    }

    // ========================================================================
    // Session I/O
    // ========================================================================

    /// Sends input to a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not open here or the transport
    /// rejects the write.
    pub async fn send_input(&self, session_id: SessionId, data: &[u8]) -> WorkspaceResult<()> {
        if !self.registry.has(session_id) {
            return Err(WorkspaceError::UnknownSession(session_id));
        }
        self.transport.send_input(session_id, data).await?;
        Ok(())
    }

    /// Resizes a session's terminal and its local grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not open here or the transport
    /// rejects the resize.
    pub async fn resize(&mut self, session_id: SessionId, cols: u16, rows: u16) -> WorkspaceResult<()> {
        if !self.registry.has(session_id) {
            return Err(WorkspaceError::UnknownSession(session_id));
        }
        self.transport.resize(session_id, cols, rows).await?;
        self.registry.resize(session_id, cols, rows);
        Ok(())
    }

    /// Routes every event already waiting on the channel.
    ///
    /// Returns the number of events handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next event, routes it and returns it.
    ///
    /// Returns `None` once the transport has dropped its sender.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events.recv().await?;
        self.handle_event(&event);
        Some(event)
    }

    fn handle_event(&mut self, event: &SessionEvent) {
        self.registry.dispatch(event);
        match event {
            SessionEvent::Dead { session_id, reason } => {
                tracing::warn!(session_id = %session_id, reason = %reason, "Session connection lost");
                let name = self.session_name(*session_id);
                self.notify(
                    Notification::error(format!("{name}: connection lost ({reason})"))
                        .for_session(*session_id),
                );
            }
            SessionEvent::Exit { session_id, code } => {
                tracing::info!(session_id = %session_id, code = ?code, "Session exited");
            }
            SessionEvent::Closed { session_id } => {
                tracing::debug!(session_id = %session_id, "Session closed");
            }
            SessionEvent::Data { .. } => {}
        }
    }

    fn session_name(&self, session_id: SessionId) -> String {
        self.tabs
            .find_session(session_id)
            .and_then(|(tab_id, pane_id)| {
                self.tabs
                    .tab(tab_id)
                    .and_then(|tab| tab.pane_tree.find_leaf(pane_id))
                    .map(|leaf| leaf.session.display_name.clone())
            })
            .unwrap_or_else(|| session_id.to_string())
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Disconnects sessions and drops their resources.
    ///
    /// Failures are logged and queued as warnings; every session is removed
    /// from the registry regardless.
    async fn teardown(&mut self, sessions: Vec<SessionId>) {
        if sessions.is_empty() {
            return;
        }
        let transport = Arc::clone(&self.transport);
        let results: Vec<(SessionId, TransportResult<()>)> = stream::iter(sessions)
            .map(|session_id| {
                let transport = Arc::clone(&transport);
                async move { (session_id, transport.disconnect(session_id).await) }
            })
            .buffer_unordered(TEARDOWN_CONCURRENCY)
            .collect()
            .await;

        for (session_id, result) in results {
            let span = trace_operation!(span_names::SESSION_DISCONNECT, session_id = %session_id);
            let _guard = span.enter();
            match result {
                Ok(()) => tracing::debug!(session_id = %session_id, "Session disconnected"),
                Err(error) => {
                    tracing::warn!(session_id = %session_id, error = %error, "Disconnect failed");
                    self.notify(
                        Notification::warning(format!("Failed to close session: {error}"))
                            .for_session(session_id),
                    );
                }
            }
            self.registry.remove(session_id);
        }
    }

    /// Disconnects every session, disposes the registry and clears the tabs.
    pub async fn shutdown(&mut self) {
        let span = trace_operation!(span_names::WORKSPACE_SHUTDOWN);
        let mut sessions = self.registry.session_ids();
        for session_id in self.tabs.session_ids() {
            if !sessions.contains(&session_id) {
                sessions.push(session_id);
            }
        }
        span.in_scope(|| tracing::info!(sessions = sessions.len(), "Shutting down workspace"));

        self.teardown(sessions).await;
        self.registry.dispose_all();
        self.tabs = TabSet::new().with_confirm_threshold(self.settings.confirm_close_threshold);
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("tabs", &self.tabs.len())
            .field("registry", &self.registry)
            .field("notifications", &self.notifications.len())
            .finish_non_exhaustive()
    }
}

/// Focuses the first leaf if closing removed the focused one.
fn ensure_focus(tree: PaneNode) -> PaneNode {
    if tree.focused().is_some() {
        tree
    } else {
        let first = tree.first_leaf().id;
        tree.set_focus(first)
    }
}
