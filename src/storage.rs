//! Key-value persistence port for client state.
//!
//! Session and favorites never touch a global store; they are handed a
//! [`KeyValueStore`] and persist through it. Values are JSON documents wrapped
//! in a `{ "state": ..., "version": n }` envelope.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};

/// version written into every envelope
pub const STATE_VERSION: u32 = 0;

/// string key-value persistence
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// persisted envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState<T> {
    pub state: T,
    pub version: u32,
}

/// read and decode a typed state; None when the key is absent
pub fn load_state<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.load(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let envelope: PersistedState<T> = serde_json::from_str(&raw)?;
    if envelope.version != STATE_VERSION {
        warn!(
            "state under {} has version {}, expected {}",
            key, envelope.version, STATE_VERSION
        );
    }
    Ok(Some(envelope.state))
}

/// encode and write a typed state
pub fn save_state<T, S>(store: &mut S, key: &str, state: &T) -> Result<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let envelope = PersistedState {
        state,
        version: STATE_VERSION,
    };
    let raw = serde_json::to_string(&envelope)?;
    store.save(key, &raw)?;
    debug!("saved {} bytes under {}", raw.len(), key);
    Ok(())
}

/// in-memory store, used by tests and ephemeral sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// use `dir`, creating it if missing
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| ClientError::Storage {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(ClientError::Storage {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "unsupported storage key"),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ClientError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // sibling write + rename
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| ClientError::Storage {
                key: key.to_string(),
                source,
            })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ClientError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// memory store whose writes can be switched to fail
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) fail_writes: bool,
}

#[cfg(test)]
impl FlakyStore {
    fn check(&self, key: &str) -> Result<()> {
        if self.fail_writes {
            return Err(ClientError::Storage {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl KeyValueStore for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.inner.load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.save(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.remove(key)
    }
}
