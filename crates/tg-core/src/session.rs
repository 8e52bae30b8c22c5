// ABOUTME: Session state persistence for layout restoration.
// ABOUTME: Saves the pane tree, open tabs and focus history to disk.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::LayoutSnapshot;

/// Complete session data for one editor window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub version: u32,
    pub layout: LayoutSnapshot,
}

impl SessionData {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(layout: LayoutSnapshot) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            layout,
        }
    }

    /// Get the default session file path (~/.local/state/tabgrid/session.bin)
    pub fn default_path() -> Option<PathBuf> {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|p| p.join("tabgrid").join("session.bin"))
    }

    /// Encode as zstd-compressed JSON
    pub fn to_bytes(&self) -> Result<Vec<u8>, SessionError> {
        let json = serde_json::to_vec(self)?;
        let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
        encoder.write_all(&json)?;
        Ok(encoder.finish()?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SessionError> {
        let mut json = Vec::new();
        zstd::Decoder::new(bytes)?.read_to_end(&mut json)?;

        let session: SessionData = serde_json::from_slice(&json)?;
        if session.version > Self::CURRENT_VERSION {
            return Err(SessionError::UnsupportedVersion(session.version));
        }
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Remove a saved session; missing files are not an error
    pub fn clear(path: &Path) -> Result<(), SessionError> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::new(LayoutSnapshot::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported session version: {0}")]
    UnsupportedVersion(u32),
}
