//! On-disk session persistence.

use std::path::{Path, PathBuf};

use crate::auth::Session;
use crate::{Error, Result};

/// Keeps the current session in a JSON file so a signed-in user stays
/// signed in across process runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<platform data dir>/writersphere/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("writersphere").join("session.json"))
    }

    /// Store at [`SessionStore::default_path`].
    pub fn at_default_path() -> Result<Self> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| Error::config("Could not determine a data directory for the session file"))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file means signed out.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| Error::io_with_path(e, &self.path))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::decode(format!("session file {}: {e}", self.path.display())))
    }

    /// Write the session, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| Error::decode(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| Error::io_with_path(e, &self.path))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the stored session. Removing an absent file is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_with_path(e, &self.path)),
        }
    }
}
