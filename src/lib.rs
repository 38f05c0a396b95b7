pub mod core;

pub use crate::core::config::StorageKeys;
pub use crate::core::db::{
    DashboardDb, DashboardState, NewProject, NewUser, Progress, Project, ProjectRepository, Task,
    TaskRepository, User, UserRepository, UserUpdate,
};
pub use crate::core::events::{EntityKind, EventBus, StoreEvent, Subscription};
pub use crate::core::storage::{FileStorage, KeyValueStorage, MemoryStorage};
