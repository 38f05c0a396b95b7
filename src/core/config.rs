/// Namespace prefix for every storage key.
pub const DEFAULT_KEY_PREFIX: &str = "wc_";

/// Storage keys for every persisted collection and pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub users: String,
    pub active_user: String,
    pub tasks: String,
    pub projects: String,
    pub active_project: String,
    /// Single-user record from before profiles existed; read once for migration.
    pub legacy_user: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            users: format!("{prefix}users"),
            active_user: format!("{prefix}active_user"),
            tasks: format!("{prefix}tasks"),
            projects: format!("{prefix}projects"),
            active_project: format!("{prefix}active_project"),
            legacy_user: format!("{prefix}user"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}
