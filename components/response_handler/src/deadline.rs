// components/response_handler/src/deadline.rs
//! Deadline hand-off to the UI
//!
//! The response's deadline bytes are written verbatim to a well-known file
//! that the browser polls. There is no schema; readers get exactly what the
//! server sent.

use crate::error::{DeadlineError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DEADLINE_FILE: &str = "/tmp/update-check-response-deadline";

/// rw-r--r--
const DEADLINE_FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone)]
pub struct DeadlineFile {
    path: PathBuf,
}

impl Default for DeadlineFile {
    fn default() -> Self {
        Self::new(DEFAULT_DEADLINE_FILE)
    }
}

impl DeadlineFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with `deadline`
    pub fn write(&self, deadline: &[u8]) -> Result<()> {
        fs::write(&self.path, deadline).map_err(|e| DeadlineError::Write {
            path: self.path.clone(),
            source: e,
        })?;
        self.restrict_permissions()
    }

    #[cfg(unix)]
    fn restrict_permissions(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(&self.path, fs::Permissions::from_mode(DEADLINE_FILE_MODE)).map_err(
            |e| DeadlineError::Permissions {
                path: self.path.clone(),
                source: e,
            },
        )
    }

    #[cfg(not(unix))]
    fn restrict_permissions(&self) -> Result<()> {
        Ok(())
    }
}
