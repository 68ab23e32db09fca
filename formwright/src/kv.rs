//! Key-value byte stores backing the local gateway.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// Error type for key-value store access.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot be reached right now.
    #[error("Store unavailable")]
    Unavailable,

    /// The value exceeds the store's size limit.
    #[error("Value for '{key}' is {len} bytes, limit is {limit}")]
    TooLarge {
        key: String,
        len: usize,
        limit: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// An opaque get/set-by-key byte store.
///
/// `set` replaces the whole value or leaves the old one in place; readers
/// never observe a partial write.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// An in-process store.
///
/// Can be told to reject oversized values or to act unreachable, which makes
/// it handy for exercising failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
    max_value_len: Option<usize>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values longer than `limit` bytes.
    pub fn with_max_value_len(mut self, limit: usize) -> Self {
        self.max_value_len = Some(limit);
        self
    }

    /// Make every call fail with [`StoreError::Unavailable`] until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    /// A copy of everything currently stored.
    pub fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.values.read().clone()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Acquire) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_online()?;
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.check_online()?;
        if let Some(limit) = self.max_value_len
            && value.len() > limit
        {
            return Err(StoreError::TooLarge {
                key: key.to_string(),
                len: value.len(),
                limit,
            });
        }
        self.values.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_online()?;
        self.values.write().remove(key);
        Ok(())
    }
}

/// A store keeping one file per key under a root directory.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(value)?;
            file.sync_all()?;
        }
        if let Err(err) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Map a key to a file-name-safe string, escaping anything but `[A-Za-z0-9_-]`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
