mod model;
mod project;
mod state;
mod task;
mod user;
mod util;

use tracing::{debug, warn};

pub use model::{
    DEFAULT_PROJECT_NAME, DEFAULT_USER_NAME, NEW_PROJECT_NAME, NEW_USER_NAME, Progress, SEED_TASKS,
    new_id,
};
pub use project::{NewProject, Project, ProjectRepository};
pub use state::DashboardState;
pub use task::{Task, TaskRepository};
pub use user::{NewUser, User, UserRepository, UserUpdate, parse_birth_date};

use crate::core::{
    config::StorageKeys,
    events::{EventBus, StoreEvent, Subscription},
    storage::KeyValueStorage,
};

/// The dashboard's single source of truth.
///
/// Every mutation updates memory, rewrites the affected collections in
/// `storage`, then notifies subscribers. Mutations aimed at an unknown id
/// change nothing, write nothing and notify no one.
#[derive(Debug)]
pub struct DashboardDb<S: KeyValueStorage> {
    storage: S,
    keys: StorageKeys,
    state: DashboardState,
    events: EventBus,
}

impl<S: KeyValueStorage> DashboardDb<S> {
    /// Load (or seed) the dashboard from `storage` under the default keys.
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, StorageKeys::default())
    }

    pub fn with_keys(mut storage: S, keys: StorageKeys) -> Self {
        let state = DashboardState::load(&mut storage, &keys);
        Self {
            storage,
            keys,
            state,
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Register `listener` for every change made through this store.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&StoreEvent, &DashboardState) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.len()
    }

    fn notify(&self, event: StoreEvent) {
        debug!(event = %event, listeners = self.events.len(), "store changed");
        self.events.publish(&event, &self.state);
    }
}

impl<S: KeyValueStorage> UserRepository for DashboardDb<S> {
    fn list_users(&self) -> Vec<User> {
        self.state.users.clone()
    }

    fn get_user(&self) -> Option<User> {
        self.state.active_user().cloned()
    }

    fn active_user_id(&self) -> String {
        self.state.active_user_id.clone()
    }

    fn set_user(&mut self, update: UserUpdate) -> bool {
        let active = &self.state.active_user_id;
        let Some(user) = self.state.users.iter_mut().find(|u| &u.id == active) else {
            return false;
        };
        update.apply_to(user);
        let id = user.id.clone();
        self.state.persist_users(&mut self.storage, &self.keys);
        self.notify(StoreEvent::UserUpdated { id });
        true
    }

    fn add_user(&mut self, user: NewUser) -> User {
        let user = User::from_new(user);
        self.state.users.push(user.clone());
        self.state.active_user_id = user.id.clone();
        self.state.persist_users(&mut self.storage, &self.keys);
        self.notify(StoreEvent::UserAdded {
            id: user.id.clone(),
        });
        user
    }

    fn set_active_user(&mut self, id: &str) -> bool {
        if self.state.user(id).is_none() {
            return false;
        }
        self.state.active_user_id = id.to_owned();
        self.state.persist_active_user(&mut self.storage, &self.keys);
        self.notify(StoreEvent::UserSwitched { id: id.to_owned() });
        true
    }
}

impl<S: KeyValueStorage> ProjectRepository for DashboardDb<S> {
    fn list_projects(&self) -> Vec<Project> {
        self.state.projects.clone()
    }

    fn get_active_project(&self) -> Option<Project> {
        self.state.active_project().cloned()
    }

    fn active_project_id(&self) -> String {
        self.state.active_project_id.clone()
    }

    fn add_project(&mut self, project: NewProject) -> Project {
        let project = Project::from_new(project);
        self.state.projects.push(project.clone());
        self.state.active_project_id = project.id.clone();
        self.state.persist_projects(&mut self.storage, &self.keys);
        self.notify(StoreEvent::ProjectAdded {
            id: project.id.clone(),
        });
        project
    }

    fn set_active_project(&mut self, id: &str) -> bool {
        if self.state.project(id).is_none() {
            return false;
        }
        self.state.active_project_id = id.to_owned();
        self.state.persist_active_project(&mut self.storage, &self.keys);
        self.notify(StoreEvent::ProjectSwitched { id: id.to_owned() });
        true
    }

    fn remove_project(&mut self, id: &str) -> bool {
        let Some(index) = self.state.projects.iter().position(|p| p.id == id) else {
            return false;
        };
        self.state.projects.remove(index);

        if let Some(first) = self.state.projects.first() {
            if self.state.active_project_id == id {
                self.state.active_project_id = first.id.clone();
            }
        } else {
            let fresh = Project::seed();
            self.state.active_project_id = fresh.id.clone();
            self.state.projects.push(fresh);
        }
        self.state.persist_projects(&mut self.storage, &self.keys);

        self.state.tasks.retain(|t| t.project_id != id);
        self.state.persist_tasks(&mut self.storage, &self.keys);

        self.notify(StoreEvent::ProjectRemoved { id: id.to_owned() });
        true
    }

    fn update_project_name(&mut self, id: &str, name: &str) -> bool {
        let Some(project) = self.state.projects.iter_mut().find(|p| p.id == id) else {
            warn!(id, "no project to rename");
            return false;
        };
        project.name = name.to_owned();
        self.state.persist_projects(&mut self.storage, &self.keys);
        self.notify(StoreEvent::ProjectUpdated { id: id.to_owned() });
        true
    }
}

impl<S: KeyValueStorage> TaskRepository for DashboardDb<S> {
    fn get_tasks(&self) -> Vec<Task> {
        self.get_tasks_by_project(None)
    }

    fn get_tasks_by_project(&self, project_id: Option<&str>) -> Vec<Task> {
        let project_id = project_id.unwrap_or(self.state.active_project_id.as_str());
        self.state.tasks_of(project_id).cloned().collect()
    }

    fn add_task(&mut self, title: &str) -> Task {
        let task = Task::new(title, &self.state.active_project_id);
        self.state.tasks.push(task.clone());
        self.state.persist_tasks(&mut self.storage, &self.keys);
        self.notify(StoreEvent::TaskAdded {
            id: task.id.clone(),
        });
        task
    }

    fn toggle_task(&mut self, id: &str, done: bool) -> bool {
        let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.done = done;
        self.state.persist_tasks(&mut self.storage, &self.keys);
        self.notify(StoreEvent::TaskToggled { id: id.to_owned() });
        true
    }

    fn remove_task(&mut self, id: &str) -> bool {
        let Some(index) = self.state.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        self.state.tasks.remove(index);
        self.state.persist_tasks(&mut self.storage, &self.keys);
        self.notify(StoreEvent::TaskRemoved { id: id.to_owned() });
        true
    }

    fn get_progress(&self) -> Progress {
        self.state.progress()
    }
}
