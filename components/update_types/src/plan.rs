use crate::{ByteSize, DevicePath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything the download and install stages need to apply one update
///
/// Built once by the response handler and then moved downstream; nothing
/// mutates it after hand-off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPlan {
    pub download_url: String,
    pub version: String,
    pub payload_size: ByteSize,
    pub payload_hash: String,
    pub metadata_size: ByteSize,
    pub metadata_signature: String,
    pub public_key_rsa: String,
    pub hash_checks_mandatory: bool,
    pub is_resume: bool,
    pub is_full_update: bool,
    pub install_path: DevicePath,
    pub kernel_install_path: DevicePath,
    pub powerwash_required: bool,
}

impl fmt::Display for InstallPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let update_type = if self.is_full_update { "full" } else { "delta" };
        let resume = if self.is_resume { "resume" } else { "new" };
        writeln!(f, "InstallPlan: {}, {} update", resume, update_type)?;
        writeln!(f, "  version: {}", self.version)?;
        writeln!(f, "  url: {}", self.download_url)?;
        writeln!(f, "  payload size: {}", self.payload_size)?;
        writeln!(f, "  payload hash: {}", self.payload_hash)?;
        writeln!(f, "  metadata size: {}", self.metadata_size)?;
        writeln!(f, "  metadata signature: {}", self.metadata_signature)?;
        writeln!(f, "  hash checks mandatory: {}", self.hash_checks_mandatory)?;
        writeln!(f, "  install path: {}", self.install_path)?;
        writeln!(f, "  kernel install path: {}", self.kernel_install_path)?;
        write!(f, "  powerwash required: {}", self.powerwash_required)
    }
}
