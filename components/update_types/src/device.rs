use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const DEV_PREFIX: &str = "/dev/";

/// The two A/B root partitions. The device boots from one and installs
/// into the other.
const ROOT_SLOT_A: u32 = 3;
const ROOT_SLOT_B: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("no boot device available")]
    NoBootDevice,

    #[error("{0} is not a device under {DEV_PREFIX}")]
    NotADevice(String),

    #[error("{0} has no partition number")]
    NoPartitionNumber(String),

    #[error("partition {partition} of {device} is not a root slot")]
    UnsupportedRootPartition { device: String, partition: u32 },

    #[error("no kernel partition pairs with {0}")]
    NoKernelPartition(String),
}

/// Block device path, e.g. `/dev/sda3` or `/dev/mmcblk0p5`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DevicePath(String);

impl DevicePath {
    pub fn new(path: impl Into<String>) -> Self {
        DevicePath(path.into())
    }

    /// Build a partition path from a disk and a partition number
    ///
    /// Disks whose name ends in a digit (`mmcblk0`, `nvme0n1`) take a `p`
    /// separator before the partition number.
    pub fn from_partition(disk: &str, partition: u32) -> Self {
        if disk.ends_with(|c: char| c.is_ascii_digit()) {
            DevicePath(format!("{}p{}", disk, partition))
        } else {
            DevicePath(format!("{}{}", disk, partition))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into (disk, partition number)
    pub fn split_partition(&self) -> Result<(String, u32), DeviceError> {
        let path = self.as_str();
        if !path.starts_with(DEV_PREFIX) {
            return Err(DeviceError::NotADevice(path.to_string()));
        }

        let digits_at = path.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let partition: u32 = path[digits_at..]
            .parse()
            .map_err(|_| DeviceError::NoPartitionNumber(path.to_string()))?;

        let mut disk = &path[..digits_at];
        if let Some(stripped) = disk.strip_suffix('p') {
            if stripped.ends_with(|c: char| c.is_ascii_digit()) {
                disk = stripped;
            }
        }

        if disk.len() <= DEV_PREFIX.len() {
            return Err(DeviceError::NoPartitionNumber(path.to_string()));
        }

        Ok((disk.to_string(), partition))
    }

    /// The root slot this device does not boot from (3 <-> 5)
    pub fn other_root_slot(&self) -> Result<DevicePath, DeviceError> {
        let (disk, partition) = self.split_partition()?;
        let other = match partition {
            ROOT_SLOT_A => ROOT_SLOT_B,
            ROOT_SLOT_B => ROOT_SLOT_A,
            _ => {
                return Err(DeviceError::UnsupportedRootPartition {
                    device: self.0.clone(),
                    partition,
                })
            }
        };
        Ok(DevicePath::from_partition(&disk, other))
    }

    /// Kernel partition paired with a root partition (3, 5, 7 -> 2, 4, 6)
    pub fn kernel_partition(&self) -> Result<DevicePath, DeviceError> {
        let (disk, partition) = self.split_partition()?;
        match partition {
            3 | 5 | 7 => Ok(DevicePath::from_partition(&disk, partition - 1)),
            _ => Err(DeviceError::NoKernelPartition(self.0.clone())),
        }
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DevicePath {
    fn from(s: &str) -> Self {
        DevicePath(s.to_string())
    }
}
