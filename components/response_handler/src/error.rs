use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeadlineError {
    #[error("failed to write deadline file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set permissions on deadline file {path}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DeadlineError>;
