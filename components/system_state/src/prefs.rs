// components/system_state/src/prefs.rs
//! Small persisted key-value store for update progress
//!
//! Two backends:
//! - [`MemoryPrefs`]: in-process map, for tests and one-shot runs
//! - [`FilePrefs`]: one file per key inside a directory, survives restarts

use crate::error::{PrefsError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store the update pipeline persists progress in
///
/// Reads never fail: a missing or unreadable value is `None`. Writes report
/// failure so callers can decide whether it matters.
pub trait Prefs: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;

    fn get_i64(&self, key: &str) -> Option<i64> {
        let raw = self.get_string(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Pref {} holds non-integer value {:?}", key, raw);
                None
            }
        }
    }

    fn set_i64(&self, key: &str, value: i64) -> Result<()> {
        self.set_string(key, &value.to_string())
    }

    fn exists(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }
}

/// Keys double as file names, so keep them to a safe alphabet
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PrefsError::InvalidKey(key.to_string()))
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prefs for MemoryPrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.values.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// File backend
// ============================================================================

#[derive(Debug, Clone)]
pub struct FilePrefs {
    dir: PathBuf,
}

impl FilePrefs {
    /// Open (creating if needed) a prefs directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| PrefsError::open(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl Prefs for FilePrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Could not read pref {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::write(&path, value).map_err(|e| PrefsError::io(key, e))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PrefsError::io(key, e)),
        }
    }
}
