//! Cart persistence in a local JSON file.
//!
//! The file holds the serialized `CartState`. Totals in the file are
//! ignored on load and recomputed from the items.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pickle_pot_core::{CartPersistence, CartState};
use thiserror::Error;

/// Errors reading or writing the cart file.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("Failed to access cart file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cart file {path} is not valid cart JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Stores the cart as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> FileStoreError {
        FileStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn json_error(&self, source: serde_json::Error) -> FileStoreError {
        FileStoreError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl CartPersistence for JsonFilePersistence {
    type Error = FileStoreError;

    fn load(&self) -> Result<Option<CartState>, Self::Error> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| self.json_error(e))
    }

    fn save(&self, state: &CartState) -> Result<(), Self::Error> {
        let json = serde_json::to_string_pretty(state).map_err(|e| self.json_error(e))?;

        // Write beside the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}
