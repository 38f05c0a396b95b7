use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::core::db::DashboardState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Project,
    Task,
}

/// Change announced by the store after a mutation has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    UserUpdated { id: String },
    UserAdded { id: String },
    UserSwitched { id: String },
    ProjectAdded { id: String },
    ProjectSwitched { id: String },
    ProjectRemoved { id: String },
    ProjectUpdated { id: String },
    TaskAdded { id: String },
    TaskToggled { id: String },
    TaskRemoved { id: String },
}

impl StoreEvent {
    pub fn entity(&self) -> EntityKind {
        match self {
            StoreEvent::UserUpdated { .. }
            | StoreEvent::UserAdded { .. }
            | StoreEvent::UserSwitched { .. } => EntityKind::User,
            StoreEvent::ProjectAdded { .. }
            | StoreEvent::ProjectSwitched { .. }
            | StoreEvent::ProjectRemoved { .. }
            | StoreEvent::ProjectUpdated { .. } => EntityKind::Project,
            StoreEvent::TaskAdded { .. }
            | StoreEvent::TaskToggled { .. }
            | StoreEvent::TaskRemoved { .. } => EntityKind::Task,
        }
    }

    /// Id of the entity the event is about.
    pub fn id(&self) -> &str {
        match self {
            StoreEvent::UserUpdated { id }
            | StoreEvent::UserAdded { id }
            | StoreEvent::UserSwitched { id }
            | StoreEvent::ProjectAdded { id }
            | StoreEvent::ProjectSwitched { id }
            | StoreEvent::ProjectRemoved { id }
            | StoreEvent::ProjectUpdated { id }
            | StoreEvent::TaskAdded { id }
            | StoreEvent::TaskToggled { id }
            | StoreEvent::TaskRemoved { id } => id,
        }
    }

    /// `<entity>:<verb>` tag, e.g. `task:toggle`.
    pub fn tag(&self) -> &'static str {
        match self {
            StoreEvent::UserUpdated { .. } => "user:update",
            StoreEvent::UserAdded { .. } => "user:add",
            StoreEvent::UserSwitched { .. } => "user:switch",
            StoreEvent::ProjectAdded { .. } => "project:add",
            StoreEvent::ProjectSwitched { .. } => "project:switch",
            StoreEvent::ProjectRemoved { .. } => "project:remove",
            StoreEvent::ProjectUpdated { .. } => "project:update",
            StoreEvent::TaskAdded { .. } => "task:add",
            StoreEvent::TaskToggled { .. } => "task:toggle",
            StoreEvent::TaskRemoved { .. } => "task:remove",
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.id())
    }
}

type Listener = Rc<RefCell<dyn FnMut(&StoreEvent, &DashboardState)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Synchronous observer registry.
///
/// Listeners run in subscription order, on the caller's stack, before the
/// triggering store call returns. Nothing is queued: an event published with
/// no listeners is gone.
#[derive(Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&StoreEvent, &DashboardState) + 'static,
    {
        let listener: Listener = Rc::new(RefCell::new(listener));
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub(crate) fn publish(&self, event: &StoreEvent, state: &DashboardState) {
        // Snapshot first so listeners may (un)subscribe while being called.
        // New listeners wait for the next event; removed ones are skipped at once.
        let listeners: Vec<(u64, Listener)> = self.registry.borrow().listeners.clone();
        for (id, listener) in listeners {
            if !self.contains(id) {
                continue;
            }
            if let Ok(mut listener) = listener.try_borrow_mut() {
                (&mut *listener)(event, state);
            }
        }
    }

    fn contains(&self, id: u64) -> bool {
        self.registry
            .borrow()
            .listeners
            .iter()
            .any(|(listener, _)| *listener == id)
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Disposal handle for a listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let registry = registry.borrow();
        registry.listeners.iter().any(|(id, _)| *id == self.id)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
