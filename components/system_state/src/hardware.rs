// components/system_state/src/hardware.rs
use crate::error::HardwareError;
use std::fs;
use std::path::PathBuf;
use update_types::DevicePath;

pub const DEFAULT_CMDLINE_PATH: &str = "/proc/cmdline";

/// Platform queries the update stages depend on
pub trait Hardware: Send + Sync {
    /// Official builds enforce payload hash checks more strictly
    fn is_official_build(&self) -> bool;

    /// Device the running system booted from, if it can be determined
    fn boot_device(&self) -> Option<DevicePath>;
}

/// Hardware backed by the running kernel
#[derive(Debug, Clone)]
pub struct SystemHardware {
    official_build: bool,
    cmdline_path: PathBuf,
}

impl SystemHardware {
    pub fn new(official_build: bool) -> Self {
        Self {
            official_build,
            cmdline_path: PathBuf::from(DEFAULT_CMDLINE_PATH),
        }
    }

    pub fn with_cmdline_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cmdline_path = path.into();
        self
    }

    /// Read `root=/dev/...` from the kernel command line
    pub fn read_boot_device(&self) -> Result<DevicePath, HardwareError> {
        let cmdline =
            fs::read_to_string(&self.cmdline_path).map_err(|e| HardwareError::CommandLine {
                path: self.cmdline_path.clone(),
                source: e,
            })?;

        let root = cmdline
            .split_whitespace()
            .filter_map(|arg| arg.strip_prefix("root="))
            .last()
            .ok_or(HardwareError::NoRootDevice)?;

        if !root.starts_with("/dev/") {
            return Err(HardwareError::UnsupportedRoot(root.to_string()));
        }

        Ok(DevicePath::new(root))
    }
}

impl Hardware for SystemHardware {
    fn is_official_build(&self) -> bool {
        self.official_build
    }

    fn boot_device(&self) -> Option<DevicePath> {
        match self.read_boot_device() {
            Ok(device) => {
                tracing::info!("Booted from {}", device);
                Some(device)
            }
            Err(e) => {
                tracing::warn!("Could not determine boot device: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cmdline(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn finds_root_device() {
        let file = cmdline("console=ttyS0 root=/dev/sda3 rootwait ro quiet\n");
        let hardware = SystemHardware::new(true).with_cmdline_path(file.path());

        assert_eq!(hardware.boot_device(), Some(DevicePath::new("/dev/sda3")));
        assert!(hardware.is_official_build());
    }

    #[test]
    fn last_root_argument_wins() {
        let file = cmdline("root=/dev/sda3 root=/dev/mmcblk0p5");
        let hardware = SystemHardware::new(false).with_cmdline_path(file.path());

        assert_eq!(
            hardware.read_boot_device().unwrap(),
            DevicePath::new("/dev/mmcblk0p5")
        );
    }

    #[test]
    fn partuuid_root_is_unsupported() {
        let file = cmdline("root=PARTUUID=1234-5678 ro");
        let hardware = SystemHardware::new(true).with_cmdline_path(file.path());

        assert!(matches!(
            hardware.read_boot_device(),
            Err(HardwareError::UnsupportedRoot(_))
        ));
        assert_eq!(hardware.boot_device(), None);
    }

    #[test]
    fn missing_root_or_file() {
        let file = cmdline("quiet splash");
        let hardware = SystemHardware::new(true).with_cmdline_path(file.path());
        assert!(matches!(
            hardware.read_boot_device(),
            Err(HardwareError::NoRootDevice)
        ));

        let hardware = SystemHardware::new(true).with_cmdline_path("/nonexistent/cmdline");
        assert!(matches!(
            hardware.read_boot_device(),
            Err(HardwareError::CommandLine { .. })
        ));
    }
}
