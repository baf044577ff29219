//! Session registry
//!
//! This module provides the `SessionRegistry` which keeps the resources of
//! live sessions alive independently of the views that display them. A
//! view may be torn down and recreated any number of times; the registry
//! entry survives until the session is explicitly closed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use super::events::{SessionEvent, SessionStatus};
use super::resource::{SessionResource, TerminalBuffer};
use crate::split::SessionId;

/// Shared handle to a session resource.
pub type ResourceHandle<R> = Rc<RefCell<R>>;

/// Identifier of a view displaying a session.
///
/// The registry records it only to know where the resource is attached,
/// never to own the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub Uuid);

impl ViewId {
    /// Creates a new random view ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View({})", self.0)
    }
}

type EventHandler = Box<dyn FnMut(&SessionEvent)>;
type DisposeHook = Box<dyn FnOnce()>;

/// An event subscription registered by a view.
pub struct IoSubscription {
    handler: EventHandler,
    on_dispose: Option<DisposeHook>,
}

impl IoSubscription {
    /// Creates a subscription calling `handler` for every routed event.
    pub fn new(handler: impl FnMut(&SessionEvent) + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            on_dispose: None,
        }
    }

    /// Runs `hook` when the subscription is disposed.
    #[must_use]
    pub fn with_dispose(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_dispose = Some(Box::new(hook));
        self
    }

    fn deliver(&mut self, event: &SessionEvent) {
        (self.handler)(event);
    }

    fn dispose(self) {
        if let Some(hook) = self.on_dispose {
            hook();
        }
    }
}

impl fmt::Debug for IoSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoSubscription")
            .field("has_dispose_hook", &self.on_dispose.is_some())
            .finish_non_exhaustive()
    }
}

/// Result of attaching a view to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// First attachment: the resource was opened into the view.
    Opened,
    /// The resource was moved from its previous view, if any, into this one.
    Reparented {
        /// View the resource was attached to before.
        previous: Option<ViewId>,
    },
}

/// Registry entry for one session.
#[derive(Debug)]
pub struct SessionEntry<R> {
    session_id: SessionId,
    resource: ResourceHandle<R>,
    attached_view: Option<ViewId>,
    is_opened: bool,
    status: SessionStatus,
    subscriptions: Vec<IoSubscription>,
}

impl<R> SessionEntry<R> {
    fn new(session_id: SessionId, resource: R) -> Self {
        Self {
            session_id,
            resource: Rc::new(RefCell::new(resource)),
            attached_view: None,
            is_opened: false,
            status: SessionStatus::Active,
            subscriptions: Vec::new(),
        }
    }

    /// Session id.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Handle to the resource.
    #[must_use]
    pub fn resource(&self) -> ResourceHandle<R> {
        Rc::clone(&self.resource)
    }

    /// View the resource is currently attached to.
    #[must_use]
    pub const fn attached_view(&self) -> Option<ViewId> {
        self.attached_view
    }

    /// Whether the resource has ever been opened into a view.
    #[must_use]
    pub const fn is_opened(&self) -> bool {
        self.is_opened
    }

    /// Last lifecycle status.
    #[must_use]
    pub const fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn dispose_subscriptions(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }
}

type ResourceFactory<R> = Box<dyn Fn(SessionId) -> R>;

/// Keyed store of live session resources.
///
/// The registry is an explicit instance owned by the workspace; there is
/// no process-wide singleton.
pub struct SessionRegistry<R: SessionResource = TerminalBuffer> {
    entries: HashMap<SessionId, SessionEntry<R>>,
    factory: ResourceFactory<R>,
}

impl<R: SessionResource + 'static> SessionRegistry<R> {
    /// Creates a registry allocating resources with [`SessionResource::create`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(R::create)
    }

    /// Creates a registry allocating resources with `factory`.
    pub fn with_factory(factory: impl Fn(SessionId) -> R + 'static) -> Self {
        Self {
            entries: HashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Returns the resource for a session, creating it if needed.
    ///
    /// Safe to call on every view mount.
    pub fn get_or_create(&mut self, session_id: SessionId) -> ResourceHandle<R> {
        let factory = &self.factory;
        self.entries
            .entry(session_id)
            .or_insert_with(|| {
                tracing::debug!(session_id = %session_id, "Registering session resource");
                SessionEntry::new(session_id, factory(session_id))
            })
            .resource()
    }

    /// Returns the resource for a session.
    #[must_use]
    pub fn get(&self, session_id: SessionId) -> Option<ResourceHandle<R>> {
        self.entries.get(&session_id).map(SessionEntry::resource)
    }

    /// Returns the entry for a session.
    #[must_use]
    pub fn entry(&self, session_id: SessionId) -> Option<&SessionEntry<R>> {
        self.entries.get(&session_id)
    }

    /// Returns true if the session is registered.
    #[must_use]
    pub fn has(&self, session_id: SessionId) -> bool {
        self.entries.contains_key(&session_id)
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no session is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of all registered sessions.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.entries.keys().copied().collect()
    }

    /// Attaches a view to a registered session, replacing its subscriptions.
    ///
    /// The previous subscription set is disposed before the new one is
    /// registered, so each event reaches exactly one set. Returns `None`
    /// for a session that is not registered; the subscriptions are
    /// disposed unused.
    pub fn attach_view(
        &mut self,
        session_id: SessionId,
        view_id: ViewId,
        subscriptions: Vec<IoSubscription>,
    ) -> Option<AttachOutcome> {
        let Some(entry) = self.entries.get_mut(&session_id) else {
            tracing::debug!(
                session_id = %session_id,
                view_id = %view_id,
                "Ignoring view attach for unknown session"
            );
            subscriptions.into_iter().for_each(IoSubscription::dispose);
            return None;
        };
        let outcome = if entry.is_opened {
            AttachOutcome::Reparented {
                previous: entry.attached_view,
            }
        } else {
            entry.is_opened = true;
            AttachOutcome::Opened
        };
        entry.dispose_subscriptions();
        entry.subscriptions = subscriptions;
        entry.attached_view = Some(view_id);
        tracing::debug!(
            session_id = %session_id,
            view_id = %view_id,
            ?outcome,
            "View attached"
        );
        Some(outcome)
    }

    /// Clears the attachment if `view_id` is the attached view.
    ///
    /// Subscriptions stay live so output keeps flowing into the resource
    /// while no view is mounted. Returns true if the attachment was cleared.
    pub fn detach_view(&mut self, session_id: SessionId, view_id: ViewId) -> bool {
        match self.entries.get_mut(&session_id) {
            Some(entry) if entry.attached_view == Some(view_id) => {
                entry.attached_view = None;
                true
            }
            _ => false,
        }
    }

    /// Routes an event to its session.
    ///
    /// Data is fed to the resource and lifecycle events update the status
    /// before each subscription is called once. Returns the number of
    /// subscriptions notified; events for unknown sessions are dropped.
    pub fn dispatch(&mut self, event: &SessionEvent) -> usize {
        let session_id = event.session_id();
        let Some(entry) = self.entries.get_mut(&session_id) else {
            tracing::debug!(
                session_id = %session_id,
                kind = event.kind(),
                "Dropping event for unknown session"
            );
            return 0;
        };
        match event {
            SessionEvent::Data { bytes, .. } => entry.resource.borrow_mut().feed(bytes),
            _ => {
                if let Some(status) = SessionStatus::from_event(event) {
                    entry.status = status;
                }
            }
        }
        for subscription in &mut entry.subscriptions {
            subscription.deliver(event);
        }
        entry.subscriptions.len()
    }

    /// Applies a new grid size to a session's resource.
    ///
    /// Returns false if the session is not registered.
    pub fn resize(&mut self, session_id: SessionId, cols: u16, rows: u16) -> bool {
        match self.entries.get(&session_id) {
            Some(entry) => {
                entry.resource.borrow_mut().resize(cols, rows);
                true
            }
            None => false,
        }
    }

    /// Disposes a session's subscriptions and resource and deletes the entry.
    ///
    /// Only for explicit close; never for a view remount. Returns true if
    /// the session was registered.
    pub fn remove(&mut self, session_id: SessionId) -> bool {
        let Some(mut entry) = self.entries.remove(&session_id) else {
            return false;
        };
        entry.dispose_subscriptions();
        entry.resource.borrow_mut().dispose();
        tracing::debug!(session_id = %session_id, "Session resource disposed");
        true
    }

    /// Removes every session.
    pub fn dispose_all(&mut self) {
        for session_id in self.session_ids() {
            self.remove(session_id);
        }
    }
}

impl<R: SessionResource + 'static> Default for SessionRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SessionResource> fmt::Debug for SessionRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.entries.len())
            .finish_non_exhaustive()
    }
}
