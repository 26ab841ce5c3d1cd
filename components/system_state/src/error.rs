//! System state error types
//!
//! Errors carry the pref key or file they concern so a warning in the log
//! says what was lost.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("invalid pref key {0:?}")]
    InvalidKey(String),

    #[error("failed to write pref {key}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open prefs directory {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pref {key} is read-only")]
    ReadOnly { key: String },
}

impl PrefsError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        PrefsError::Io {
            key: key.into(),
            source,
        }
    }

    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrefsError::Open {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("failed to read kernel command line from {path}")]
    CommandLine {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel command line has no root= device")]
    NoRootDevice,

    #[error("root device {0:?} is not a /dev path")]
    UnsupportedRoot(String),
}

pub type Result<T> = std::result::Result<T, PrefsError>;
