use tracing::{debug, info};

use crate::core::{
    config::StorageKeys,
    db::{
        model::{Progress, SEED_TASKS},
        project::Project,
        task::Task,
        user::{NewUser, User},
        util::{read_json, read_json_list, read_raw, remove_key, write_json, write_raw},
    },
    storage::KeyValueStorage,
};

/// In-memory copy of everything the dashboard persists.
///
/// Once loaded, `users` and `projects` are never empty and both active ids
/// name an existing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub(super) users: Vec<User>,
    pub(super) active_user_id: String,
    pub(super) projects: Vec<Project>,
    pub(super) active_project_id: String,
    pub(super) tasks: Vec<Task>,
}

impl DashboardState {
    /// Load from `storage`, seeding and persisting defaults for anything
    /// absent or malformed. Never fails.
    pub(super) fn load<S>(storage: &mut S, keys: &StorageKeys) -> Self
    where
        S: KeyValueStorage + ?Sized,
    {
        let (users, active_user_id) = load_users(storage, keys);
        let (projects, active_project_id) = load_projects(storage, keys);
        let mut state = Self {
            users,
            active_user_id,
            projects,
            active_project_id,
            tasks: Vec::new(),
        };
        state.tasks = state.load_tasks(storage, keys);
        debug!(
            users = state.users.len(),
            projects = state.projects.len(),
            tasks = state.tasks.len(),
            "dashboard state loaded"
        );
        state
    }

    fn load_tasks<S>(&self, storage: &mut S, keys: &StorageKeys) -> Vec<Task>
    where
        S: KeyValueStorage + ?Sized,
    {
        let mut tasks: Vec<Task> = read_json_list(storage, &keys.tasks);
        if tasks.is_empty() {
            tasks = SEED_TASKS
                .iter()
                .map(|(title, done)| Task::new(*title, &self.active_project_id).with_done(*done))
                .collect();
            info!(project = %self.active_project_id, "seeding default tasks");
            write_json(storage, &keys.tasks, &tasks);
            return tasks;
        }

        // Tasks written before projects existed carry no project; they join the active one.
        let mut adopted = 0;
        for task in tasks.iter_mut().filter(|t| t.project_id.is_empty()) {
            task.project_id = self.active_project_id.clone();
            adopted += 1;
        }
        if adopted > 0 {
            info!(adopted, project = %self.active_project_id, "attached unscoped tasks to active project");
            write_json(storage, &keys.tasks, &tasks);
        }
        tasks
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn active_user_id(&self) -> &str {
        &self.active_user_id
    }

    pub fn active_user(&self) -> Option<&User> {
        self.user(&self.active_user_id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn active_project_id(&self) -> &str {
        &self.active_project_id
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.project(&self.active_project_id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Every task of every project.
    pub fn all_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks_of<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.project_id == project_id)
    }

    pub fn progress_of(&self, project_id: &str) -> Progress {
        let (total, done) = self
            .tasks_of(project_id)
            .fold((0, 0), |(total, done), t| (total + 1, done + usize::from(t.done)));
        Progress::new(total, done)
    }

    pub fn progress(&self) -> Progress {
        self.progress_of(&self.active_project_id)
    }

    pub(super) fn persist_users<S>(&self, storage: &mut S, keys: &StorageKeys)
    where
        S: KeyValueStorage + ?Sized,
    {
        write_json(storage, &keys.users, &self.users);
        self.persist_active_user(storage, keys);
    }

    pub(super) fn persist_active_user<S>(&self, storage: &mut S, keys: &StorageKeys)
    where
        S: KeyValueStorage + ?Sized,
    {
        write_raw(storage, &keys.active_user, &self.active_user_id);
    }

    pub(super) fn persist_projects<S>(&self, storage: &mut S, keys: &StorageKeys)
    where
        S: KeyValueStorage + ?Sized,
    {
        write_json(storage, &keys.projects, &self.projects);
        self.persist_active_project(storage, keys);
    }

    pub(super) fn persist_active_project<S>(&self, storage: &mut S, keys: &StorageKeys)
    where
        S: KeyValueStorage + ?Sized,
    {
        write_raw(storage, &keys.active_project, &self.active_project_id);
    }

    pub(super) fn persist_tasks<S>(&self, storage: &mut S, keys: &StorageKeys)
    where
        S: KeyValueStorage + ?Sized,
    {
        write_json(storage, &keys.tasks, &self.tasks);
    }
}

fn load_users<S>(storage: &mut S, keys: &StorageKeys) -> (Vec<User>, String)
where
    S: KeyValueStorage + ?Sized,
{
    let users: Vec<User> = read_json_list(storage, &keys.users);
    if users.is_empty() {
        let legacy: Option<NewUser> = read_json(storage, &keys.legacy_user);
        let user = match legacy {
            Some(legacy) => {
                info!("migrating legacy single-user record");
                remove_key(storage, &keys.legacy_user);
                User::from_legacy(legacy)
            }
            None => User::seed(),
        };
        let active = user.id.clone();
        let users = vec![user];
        write_json(storage, &keys.users, &users);
        write_raw(storage, &keys.active_user, &active);
        return (users, active);
    }

    let active = read_raw(storage, &keys.active_user)
        .filter(|id| users.iter().any(|u| &u.id == id))
        .unwrap_or_else(|| users[0].id.clone());
    (users, active)
}

fn load_projects<S>(storage: &mut S, keys: &StorageKeys) -> (Vec<Project>, String)
where
    S: KeyValueStorage + ?Sized,
{
    let projects: Vec<Project> = read_json_list(storage, &keys.projects);
    if projects.is_empty() {
        let project = Project::seed();
        let active = project.id.clone();
        let projects = vec![project];
        write_json(storage, &keys.projects, &projects);
        write_raw(storage, &keys.active_project, &active);
        return (projects, active);
    }

    let active = read_raw(storage, &keys.active_project)
        .filter(|id| projects.iter().any(|p| &p.id == id))
        .unwrap_or_else(|| projects[0].id.clone());
    (projects, active)
}
