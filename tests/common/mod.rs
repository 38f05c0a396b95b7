mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from taskdeck for tests
pub use taskdeck::{
    DashboardDb, DashboardState, EntityKind, FileStorage, KeyValueStorage, MemoryStorage,
    NewProject, NewUser, Progress, Project, ProjectRepository, StorageKeys, StoreEvent,
    Subscription, Task, TaskRepository, User, UserRepository, UserUpdate,
};
