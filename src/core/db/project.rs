use serde::{Deserialize, Serialize};

use crate::core::db::{
    model::{DEFAULT_PROJECT_NAME, NEW_PROJECT_NAME, new_id},
    util::null_as_default,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Project {
    pub fn from_new(new: NewProject) -> Self {
        Self {
            id: new_id(),
            name: new.name.unwrap_or_else(|| NEW_PROJECT_NAME.to_owned()),
        }
    }

    /// The project created on first run and whenever the last one is removed.
    pub fn seed() -> Self {
        Self::from_new(NewProject::named(DEFAULT_PROJECT_NAME))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: Option<String>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

pub trait ProjectRepository {
    fn list_projects(&self) -> Vec<Project>;
    fn get_active_project(&self) -> Option<Project>;
    fn active_project_id(&self) -> String;
    /// Append a project and make it active.
    fn add_project(&mut self, project: NewProject) -> Project;
    fn set_active_project(&mut self, id: &str) -> bool;
    /// Remove a project together with all of its tasks.
    ///
    /// If it was active the first remaining project takes over; if none
    /// remain a fresh default project is created and activated.
    fn remove_project(&mut self, id: &str) -> bool;
    /// Rename in place. An unknown `id` is logged and ignored.
    fn update_project_name(&mut self, id: &str, name: &str) -> bool;
}
