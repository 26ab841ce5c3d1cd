//! Capabilities the update stages read and write
//!
//! Nothing here is a process-wide singleton: a [`SystemState`] bundles the
//! capability objects and is handed to whichever stage needs them, so
//! tests can substitute the fakes in [`fake`].

mod error;
pub mod fake;
mod hardware;
pub mod keys;
mod params;
mod payload_state;
mod prefs;
pub mod progress;

pub use error::{HardwareError, PrefsError, Result};
pub use hardware::{Hardware, SystemHardware, DEFAULT_CMDLINE_PATH};
pub use params::RequestParams;
pub use payload_state::{PayloadState, PrefsPayloadState};
pub use prefs::{FilePrefs, MemoryPrefs, Prefs};

use std::fmt;
use std::sync::Arc;

/// Everything a stage may consult about the device and its stored state
#[derive(Clone)]
pub struct SystemState {
    payload_state: Arc<dyn PayloadState>,
    prefs: Arc<dyn Prefs>,
    hardware: Arc<dyn Hardware>,
    request_params: RequestParams,
}

impl SystemState {
    pub fn new(
        payload_state: Arc<dyn PayloadState>,
        prefs: Arc<dyn Prefs>,
        hardware: Arc<dyn Hardware>,
        request_params: RequestParams,
    ) -> Self {
        Self {
            payload_state,
            prefs,
            hardware,
            request_params,
        }
    }

    pub fn payload_state(&self) -> &dyn PayloadState {
        self.payload_state.as_ref()
    }

    pub fn prefs(&self) -> &dyn Prefs {
        self.prefs.as_ref()
    }

    pub fn hardware(&self) -> &dyn Hardware {
        self.hardware.as_ref()
    }

    pub fn request_params(&self) -> &RequestParams {
        &self.request_params
    }
}

impl fmt::Debug for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemState")
            .field("official_build", &self.hardware.is_official_build())
            .field("request_params", &self.request_params)
            .finish_non_exhaustive()
    }
}
