use std::fmt;

use uuid::Uuid;

pub const DEFAULT_USER_NAME: &str = "Estudiante";
pub const NEW_USER_NAME: &str = "New profile";
pub const DEFAULT_PROJECT_NAME: &str = "Main project";
pub const NEW_PROJECT_NAME: &str = "New Project";

/// Tasks seeded into the active project on first run, as `(title, done)`.
pub const SEED_TASKS: [(&str, bool); 3] = [
    ("Review the project brief", false),
    ("Implement the profile card", true),
    ("Wire the task row to the store", false),
];

const ID_LEN: usize = 12;

/// Fresh short random identifier for a user, project or task.
pub fn new_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

/// Completion summary for one project's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub total: usize,
    pub done: usize,
    /// Rounded percentage, 0 when there are no tasks.
    pub pct: u8,
}

impl Progress {
    pub fn new(total: usize, done: usize) -> Self {
        let pct = if total == 0 {
            0
        } else {
            (done as f64 / total as f64 * 100.0).round() as u8
        };
        Self { total, done, pct }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% complete ({}/{})", self.pct, self.done, self.total)
    }
}
