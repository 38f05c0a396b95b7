use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::core::storage::KeyValueStorage;

/// Read and decode `key`, treating a missing, unreadable or malformed value as absent.
pub(super) fn read_json<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let raw = read_raw(storage, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed stored value");
            None
        }
    }
}

/// Read a stored list, keeping every element that decodes.
///
/// A value that is missing, malformed or not a list reads as empty. Elements
/// that do not decode are skipped with a warning; their siblings survive.
pub(super) fn read_json_list<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let Some(items) = read_json::<Vec<Value>, _>(storage, key) else {
        return Vec::new();
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, index, error = %e, "skipping unreadable stored record");
                None
            }
        })
        .collect()
}

/// Field deserializer mapping an explicit `null` to the type's default.
pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a plain string value; empty counts as absent.
pub(super) fn read_raw<S>(storage: &S, key: &str) -> Option<String>
where
    S: KeyValueStorage + ?Sized,
{
    match storage.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!(key, error = %e, "failed to read from storage");
            None
        }
    }
}

pub(super) fn write_json<T, S>(storage: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStorage + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(body) => write_raw(storage, key, &body),
        Err(e) => warn!(key, error = %e, "failed to serialize value for storage"),
    }
}

/// Store writes are treated as always succeeding; a failing backend is only logged.
pub(super) fn write_raw<S>(storage: &mut S, key: &str, value: &str)
where
    S: KeyValueStorage + ?Sized,
{
    if let Err(e) = storage.set(key, value) {
        warn!(key, error = %e, "failed to write to storage");
    }
}

pub(super) fn remove_key<S>(storage: &mut S, key: &str)
where
    S: KeyValueStorage + ?Sized,
{
    if let Err(e) = storage.remove(key) {
        warn!(key, error = %e, "failed to remove from storage");
    }
}
