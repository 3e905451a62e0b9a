//! Stored-links registry — the host's list of links waiting to be
//! inserted later.
//!
//! The file-backed store appends one JSON object per line, so a host
//! editor can pick the pairs up and turn them into its own links.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::link::LinkRecord;

use super::SurfaceError;

/// Accepts `(target, title)` pairs for later insertion.
pub trait LinkStore {
    fn push(&mut self, record: &LinkRecord) -> Result<(), SurfaceError>;
}

/// Appends records as JSON lines to a file.
#[derive(Debug)]
pub struct JsonlLinkStore {
    path: PathBuf,
}

impl JsonlLinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LinkStore for JsonlLinkStore {
    fn push(&mut self, record: &LinkRecord) -> Result<(), SurfaceError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| SurfaceError::Store(format!("encode: {e}")))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SurfaceError::Store(format!("open {}: {e}", self.path.display())))?;

        file.write_all(line.as_bytes())
            .map_err(|e| SurfaceError::Store(format!("write {}: {e}", self.path.display())))?;

        tracing::debug!(path = %self.path.display(), target = %record.target, "link stored");
        Ok(())
    }
}
