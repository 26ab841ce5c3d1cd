//! Deterministic stand-ins for the system state capabilities
//!
//! Used by tests across the workspace; each fake records the calls made on
//! it so a test can assert on side effects.

use crate::error::{PrefsError, Result};
use crate::hardware::Hardware;
use crate::payload_state::PayloadState;
use crate::prefs::{MemoryPrefs, Prefs};
use parking_lot::Mutex;
use update_types::DevicePath;

/// Side effects observed on a [`FakePayloadState`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadCalls {
    pub using_p2p: bool,
    pub resumed: usize,
    pub restarted: usize,
}

#[derive(Debug, Default)]
pub struct FakePayloadState {
    rollback_version: String,
    current_url: String,
    calls: Mutex<PayloadCalls>,
}

impl FakePayloadState {
    pub fn new(current_url: impl Into<String>) -> Self {
        Self {
            current_url: current_url.into(),
            ..Default::default()
        }
    }

    pub fn with_rollback_version(mut self, version: impl Into<String>) -> Self {
        self.rollback_version = version.into();
        self
    }

    pub fn calls(&self) -> PayloadCalls {
        self.calls.lock().clone()
    }
}

impl PayloadState for FakePayloadState {
    fn rollback_version(&self) -> String {
        self.rollback_version.clone()
    }

    fn current_url(&self) -> String {
        self.current_url.clone()
    }

    fn set_using_p2p_for_downloading(&self, value: bool) {
        self.calls.lock().using_p2p = value;
    }

    fn using_p2p_for_downloading(&self) -> bool {
        self.calls.lock().using_p2p
    }

    fn update_resumed(&self) {
        self.calls.lock().resumed += 1;
    }

    fn update_restarted(&self) {
        self.calls.lock().restarted += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeHardware {
    pub official_build: bool,
    pub boot_device: Option<DevicePath>,
}

impl FakeHardware {
    pub fn official(boot_device: &str) -> Self {
        Self {
            official_build: true,
            boot_device: Some(DevicePath::new(boot_device)),
        }
    }

    pub fn unofficial(boot_device: &str) -> Self {
        Self {
            official_build: false,
            boot_device: Some(DevicePath::new(boot_device)),
        }
    }
}

impl Hardware for FakeHardware {
    fn is_official_build(&self) -> bool {
        self.official_build
    }

    fn boot_device(&self) -> Option<DevicePath> {
        self.boot_device.clone()
    }
}

/// Prefs that can be read but refuse every write
#[derive(Debug, Default)]
pub struct ReadOnlyPrefs {
    inner: MemoryPrefs,
}

impl ReadOnlyPrefs {
    /// Freeze a populated store
    pub fn wrap(inner: MemoryPrefs) -> Self {
        Self { inner }
    }
}

impl Prefs for ReadOnlyPrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.inner.get_string(key)
    }

    fn set_string(&self, key: &str, _value: &str) -> Result<()> {
        Err(PrefsError::ReadOnly {
            key: key.to_string(),
        })
    }

    fn delete(&self, key: &str) -> Result<()> {
        Err(PrefsError::ReadOnly {
            key: key.to_string(),
        })
    }
}
