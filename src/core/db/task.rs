use serde::{Deserialize, Serialize};

use crate::core::db::{
    model::{Progress, new_id},
    util::null_as_default,
};

/// A checkable item. `project_id` is fixed for the task's whole life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_id: String,
}

impl Task {
    pub fn new(title: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            done: false,
            project_id: project_id.into(),
        }
    }

    pub(super) fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }
}

pub trait TaskRepository {
    /// Tasks of the active project.
    fn get_tasks(&self) -> Vec<Task>;
    /// Tasks of `project_id`, or of the active project when `None`.
    fn get_tasks_by_project(&self, project_id: Option<&str>) -> Vec<Task>;
    /// Append an open task to the active project. Callers are expected to
    /// pass a non-empty title.
    fn add_task(&mut self, title: &str) -> Task;
    fn toggle_task(&mut self, id: &str, done: bool) -> bool;
    fn remove_task(&mut self, id: &str) -> bool;
    /// Completion of the active project.
    fn get_progress(&self) -> Progress;
}
