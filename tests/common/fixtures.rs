use std::{cell::RefCell, rc::Rc};

use image::{ImageBuffer, Rgb};
use taskdeck::{
    DashboardDb, KeyValueStorage, MemoryStorage, StorageKeys, StoreEvent, Subscription,
};
use tempfile::NamedTempFile;

/// A dashboard initialised from empty in-memory storage.
pub fn fresh_db() -> DashboardDb<MemoryStorage> {
    DashboardDb::new(MemoryStorage::new())
}

/// Simulate a restart: hand the storage of `db` to a new dashboard.
pub fn reopen(db: DashboardDb<MemoryStorage>) -> DashboardDb<MemoryStorage> {
    DashboardDb::new(db.into_storage())
}

/// Storage pre-filled under the default keys, e.g. `[("users", "[]")]`.
pub fn storage_with(entries: &[(&str, &str)]) -> MemoryStorage {
    let keys = StorageKeys::default();
    entries
        .iter()
        .map(|(name, value)| {
            let key = match *name {
                "users" => keys.users.clone(),
                "active_user" => keys.active_user.clone(),
                "tasks" => keys.tasks.clone(),
                "projects" => keys.projects.clone(),
                "active_project" => keys.active_project.clone(),
                "legacy_user" => keys.legacy_user.clone(),
                other => panic!("unknown storage key {other}"),
            };
            (key, value.to_string())
        })
        .collect()
}

/// Raw stored value for `key`, panicking when absent.
pub fn stored<S: KeyValueStorage>(storage: &S, key: &str) -> String {
    storage
        .get(key)
        .expect("storage read failed")
        .unwrap_or_else(|| panic!("nothing stored under {key}"))
}

pub type EventLog = Rc<RefCell<Vec<StoreEvent>>>;

/// Subscribe a listener that records every event it sees.
/// Keep the returned subscription alive for as long as events should be recorded.
pub fn record_events<S: KeyValueStorage>(db: &DashboardDb<S>) -> (EventLog, Subscription) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let subscription = db.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
    (log, subscription)
}

/// Creates a solid red test image of the given size and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image(width: u32, height: u32) -> NamedTempFile {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([255u8, 0u8, 0u8]));
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}
