//! Browser `localStorage` helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity client persists its session here and the authenticated fetch
//! reads the bearer token back synchronously. Outside the browser a
//! per-thread in-memory map stands in for `localStorage`, so native builds
//! and tests see the same read-after-write behavior.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(not(feature = "csr"))]
thread_local! {
    static MEMORY: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

/// Load the raw string stored under `key`.
pub fn load_raw(key: &str) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        local_storage()?.get_item(key).ok().flatten()
    }
    #[cfg(not(feature = "csr"))]
    {
        MEMORY.with(|m| m.borrow().get(key).cloned())
    }
}

/// Store a raw string under `key`.
pub fn save_raw(key: &str, raw: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = local_storage() else {
            return;
        };
        if storage.set_item(key, raw).is_err() {
            log::warn!("failed to persist {key} to localStorage");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        MEMORY.with(|m| m.borrow_mut().insert(key.to_owned(), raw.to_owned()));
    }
}

/// Load and decode a JSON value stored under `key`. Malformed content reads
/// as absent.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = load_raw(key)?;
    serde_json::from_str(&raw).ok()
}

/// Save a JSON value under `key`.
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => save_raw(key, &raw),
        Err(e) => log::warn!("failed to encode {key}: {e}"),
    }
}

/// Remove whatever is stored under `key`.
pub fn remove(key: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = local_storage() else {
            return;
        };
        if storage.remove_item(key).is_err() {
            log::warn!("failed to remove {key} from localStorage");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        MEMORY.with(|m| m.borrow_mut().remove(key));
    }
}
