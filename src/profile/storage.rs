//! Where the profile blob lives.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};

use super::ProfileError;

/// Reads and writes the serialized profile as a single string.
pub trait ProfileStorage: std::fmt::Debug + Send {
    /// The stored blob, or `None` if nothing was saved yet.
    fn load_blob(&self) -> Result<Option<String>, ProfileError>;

    /// Replaces the stored blob.
    fn save_blob(&mut self, blob: &str) -> Result<(), ProfileError>;
}

/// A JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by the file at `path`. Nothing is read until load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStorage for JsonFileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load_blob(&self) -> Result<Option<String>, ProfileError> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No profile file yet");
                Ok(None)
            }
            Err(err) => Err(ProfileError::new(format!(
                "Failed to read '{}': {}",
                self.path.display(),
                err
            ))),
        }
    }

    #[instrument(skip(self, blob), fields(path = %self.path.display(), bytes = blob.len()))]
    fn save_blob(&mut self, blob: &str) -> Result<(), ProfileError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, blob).map_err(|err| {
            ProfileError::new(format!(
                "Failed to write '{}': {}",
                self.path.display(),
                err
            ))
        })?;
        info!("Profile saved");
        Ok(())
    }
}

/// Process-local storage; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// A copy of the stored blob.
    pub fn blob(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl ProfileStorage for MemoryStorage {
    fn load_blob(&self) -> Result<Option<String>, ProfileError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| ProfileError::new("Profile slot poisoned"))?;
        Ok(slot.clone())
    }

    fn save_blob(&mut self, blob: &str) -> Result<(), ProfileError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ProfileError::new("Profile slot poisoned"))?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}
