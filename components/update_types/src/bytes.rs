use serde::{Deserialize, Serialize};
use std::fmt;

/// Size in bytes as reported by the update server
///
/// Payload sizes are exact byte counts (the downloader checks them), so
/// there are no unit constructors here, only display formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Get the raw byte value
    pub const fn bytes(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const KB: u64 = 1_000;
        const MB: u64 = 1_000_000;
        const GB: u64 = 1_000_000_000;

        if self.0 >= GB {
            write!(f, "{} bytes ({:.1} GB)", self.0, self.0 as f64 / GB as f64)
        } else if self.0 >= MB {
            write!(f, "{} bytes ({:.1} MB)", self.0, self.0 as f64 / MB as f64)
        } else if self.0 >= KB {
            write!(f, "{} bytes ({:.1} KB)", self.0, self.0 as f64 / KB as f64)
        } else {
            write!(f, "{} bytes", self.0)
        }
    }
}

impl From<u64> for ByteSize {
    fn from(bytes: u64) -> Self {
        ByteSize(bytes)
    }
}
