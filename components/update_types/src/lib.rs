//! Data model shared by the update pipeline stages
//!
//! This component provides the types that flow between stages:
//! - [`OmahaResponse`]: what the update server said
//! - [`InstallPlan`]: what the device will download and where it goes
//! - [`DevicePath`]: block devices with A/B root slot arithmetic
//! - [`ByteSize`]: payload and metadata sizes
//!
//! # Examples
//!
//! ```
//! use update_types::DevicePath;
//!
//! let boot = DevicePath::new("/dev/sda3");
//! let install = boot.other_root_slot().unwrap();
//! assert_eq!(install.as_str(), "/dev/sda5");
//! assert_eq!(install.kernel_partition().unwrap().as_str(), "/dev/sda4");
//! ```

mod bytes;
mod device;
mod plan;
mod response;
mod url;

pub use bytes::ByteSize;
pub use device::{DeviceError, DevicePath};
pub use plan::InstallPlan;
pub use response::OmahaResponse;
pub use url::is_https;
