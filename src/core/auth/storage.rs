//! Persisted key-value areas the session store writes into
//!
//! The `Storage` trait mirrors the browser `Storage` API. Backends absorb
//! their own write failures (logged, never returned) and read failures
//! (reported as absent), so callers only ever see present or absent values.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Key-value area scoped to one browsing context (or one process)
pub trait Storage: Send + Sync {
    /// Whether the area exists at all in the current environment
    fn is_available(&self) -> bool {
        true
    }

    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);
}

/// In-process storage area
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Storage area persisted as a JSON object in a single file
///
/// The whole file is rewritten on every write. A missing, unreadable or
/// corrupt file reads as an empty area.
#[cfg(feature = "ssr")]
#[derive(Debug)]
pub struct FileStorage {
    path: std::path::PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

#[cfg(feature = "ssr")]
impl FileStorage {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_all(&self) -> HashMap<String, String> {
        let Ok(contents) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::debug!("Ignoring unreadable storage file {:?}: {}", self.path, e);
            HashMap::new()
        })
    }

    fn write_all(&self, items: &HashMap<String, String>) {
        let result = serde_json::to_string_pretty(items)
            .map_err(std::io::Error::other)
            .and_then(|json| write_private(&self.path, json.as_bytes()));

        if let Err(e) = result {
            tracing::warn!("Failed to write storage file {:?}: {}", self.path, e);
        }
    }

    fn update(&self, apply: impl FnOnce(&mut HashMap<String, String>)) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_all();
        apply(&mut items);
        self.write_all(&items);
    }
}

/// Write `contents` to `path`, readable only by the owner on unix
#[cfg(feature = "ssr")]
fn write_private(path: &std::path::Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // mode() only applies on creation
        if path.exists() {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
    }

    options.open(path)?.write_all(contents)
}

#[cfg(feature = "ssr")]
impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        });
    }

    fn remove_item(&self, key: &str) {
        if !self.path.exists() {
            return;
        }
        self.update(|items| {
            items.remove(key);
        });
    }
}

/// The browser's `window.localStorage`
///
/// Without the `hydrate` feature, or whenever there is no window (server-side
/// rendering, workers), the area is unavailable: reads return `None` and
/// writes are no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
impl BrowserStorage {
    fn area() -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        window.local_storage().ok()?
    }
}

#[cfg(feature = "hydrate")]
impl Storage for BrowserStorage {
    fn is_available(&self) -> bool {
        Self::area().is_some()
    }

    fn get_item(&self, key: &str) -> Option<String> {
        Self::area()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(area) = Self::area()
            && area.set_item(key, value).is_err()
        {
            tracing::warn!("localStorage rejected write for key {}", key);
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(area) = Self::area()
            && area.remove_item(key).is_err()
        {
            tracing::warn!("localStorage rejected removal of key {}", key);
        }
    }
}

/// Stubs - there is no browsing context outside the browser
#[cfg(not(feature = "hydrate"))]
impl Storage for BrowserStorage {
    fn is_available(&self) -> bool {
        false
    }

    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) {}

    fn remove_item(&self, _key: &str) {}
}
