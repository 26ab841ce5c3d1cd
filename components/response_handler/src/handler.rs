// components/response_handler/src/handler.rs
//! The decision engine
//!
//! Policy is applied in a fixed order, cheapest and most policy-critical
//! checks first:
//! 1. Abort if there is no update
//! 2. Abort if the update is the version we rolled back from
//! 3. Resolve the download URL (p2p peer replaces the server URL)
//! 4. Copy payload facts from the response
//! 5. Decide whether hash checks are mandatory
//! 6. Decide whether to resume, updating stored progress
//! 7. Resolve install and kernel devices
//! 8. Decide whether a powerwash is required

use crate::decision::Decision;
use crate::hash_policy::mandatory_hash_checks;
use system_state::{keys, progress, SystemState};
use tracing::{error, info, warn};
use update_types::{DeviceError, DevicePath, InstallPlan, OmahaResponse};

pub struct ResponseHandler {
    system_state: SystemState,
    boot_device: Option<DevicePath>,
}

impl ResponseHandler {
    pub fn new(system_state: SystemState) -> Self {
        Self {
            system_state,
            boot_device: None,
        }
    }

    /// Use `device` as the boot device instead of asking the hardware
    pub fn with_boot_device(mut self, device: DevicePath) -> Self {
        self.boot_device = Some(device).filter(|d| !d.is_empty());
        self
    }

    pub fn decide(&self, response: &OmahaResponse) -> Decision {
        if !response.update_exists {
            info!("There are no updates. Aborting.");
            return Decision::NoUpdate;
        }

        let payload_state = self.system_state.payload_state();

        let rollback_version = payload_state.rollback_version();
        if !rollback_version.is_empty() {
            info!("Detected previous rollback from version {}", rollback_version);
            if rollback_version == response.version {
                info!("Received version that we rolled back from. Aborting.");
                return Decision::RollbackAvoided;
            }
        }

        // URL selection already happened upstream; take whatever is current
        let current_url = payload_state.current_url();
        if current_url.is_empty() {
            error!("There are no suitable URLs in the response to use.");
            return Decision::ResponseInvalid;
        }
        let download_url = self.resolve_download_url(current_url);

        let hash_checks_mandatory = mandatory_hash_checks(
            self.system_state.hardware().is_official_build(),
            response.has_public_key(),
            &download_url,
            &response.payload_urls,
        );

        let is_resume = self.prepare_progress(&response.hash);

        let (install_path, kernel_install_path) = match self.resolve_install_devices() {
            Ok(devices) => devices,
            Err(e) => {
                error!("Unable to determine install device: {}", e);
                return Decision::DeviceResolutionFailure(e);
            }
        };

        let params = self.system_state.request_params();
        let powerwash_required = params.to_more_stable_channel && params.is_powerwash_allowed;
        if powerwash_required {
            info!("Moving to a more stable channel, powerwash required");
        }

        Decision::Success(InstallPlan {
            download_url,
            version: response.version.clone(),
            payload_size: response.size,
            payload_hash: response.hash.clone(),
            metadata_size: response.metadata_size,
            metadata_signature: response.metadata_signature.clone(),
            public_key_rsa: response.public_key_rsa.clone(),
            hash_checks_mandatory,
            is_resume,
            is_full_update: !response.is_delta_payload,
            install_path,
            kernel_install_path,
            powerwash_required,
        })
    }

    fn resolve_download_url(&self, current_url: String) -> String {
        let params = self.system_state.request_params();
        if params.use_p2p_for_downloading && !params.p2p_url.is_empty() {
            info!(
                "Replacing URL {} with local URL {} since p2p is enabled.",
                current_url, params.p2p_url
            );
            self.system_state
                .payload_state()
                .set_using_p2p_for_downloading(true);
            return params.p2p_url.clone();
        }
        current_url
    }

    /// Returns whether the update resumes stored progress
    ///
    /// A fresh start wipes stored progress and records which payload it is
    /// for. Bookkeeping failures only cost a future resume, so they are
    /// logged and the update carries on.
    fn prepare_progress(&self, response_hash: &str) -> bool {
        let prefs = self.system_state.prefs();
        let payload_state = self.system_state.payload_state();

        if progress::can_resume_update(prefs, response_hash) {
            payload_state.update_resumed();
            return true;
        }

        payload_state.update_restarted();
        if let Err(e) = progress::reset_update_progress(prefs, false) {
            warn!("Unable to reset the update progress: {}", e);
        }
        if let Err(e) = prefs.set_string(keys::UPDATE_CHECK_RESPONSE_HASH, response_hash) {
            warn!("Unable to save the update check response hash: {}", e);
        }
        false
    }

    fn resolve_install_devices(&self) -> Result<(DevicePath, DevicePath), DeviceError> {
        let boot_device = self
            .boot_device
            .clone()
            .or_else(|| self.system_state.hardware().boot_device())
            .ok_or(DeviceError::NoBootDevice)?;

        let install_path = boot_device.other_root_slot()?;
        let kernel_install_path = install_path.kernel_partition()?;
        info!(
            "Booted from {}, installing to {} (kernel {})",
            boot_device, install_path, kernel_install_path
        );
        Ok((install_path, kernel_install_path))
    }
}
