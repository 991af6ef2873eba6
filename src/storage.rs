/// Durable key/value storage for small pieces of UI state.
///
/// [`FileStorage`] keeps a flat JSON object at `~/.trendlens/storage.json`
/// so that selections survive across `trendlens` invocations. All file I/O
/// is best-effort: a missing or corrupt file reads as empty and a failed
/// write is ignored, so storage problems never interrupt the dashboard.
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// String key/value store with `localStorage`-style semantics.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) {
        (**self).set_item(key, value);
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local storage. Used by tests and when persistence is disabled.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// Storage persisted as a JSON object in a single file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: Option<PathBuf>,
}

impl FileStorage {
    /// Storage at the default location, `~/.trendlens/storage.json`.
    pub fn open_default() -> Self {
        Self {
            path: crate::config::state_dir().map(|dir| dir.join("storage.json")),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        self.path
            .as_ref()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(items)?)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set_item(&mut self, key: &str, value: &str) {
        let mut items = self.read_all();
        items.insert(key.to_string(), value.to_string());
        let _ = self.write_all(&items);
    }
}
