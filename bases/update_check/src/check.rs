// bases/update_check/src/check.rs
//! Wires the real capabilities to the response handler stage

use crate::config::{Config, DeviceState};
use action_processor::{ActionProcessor, ExecutionProgress, StageResult};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use response_handler::{DeadlineFile, ResponseHandler, ResponseHandlerAction};
use std::sync::Arc;
use system_state::{FilePrefs, Prefs, PrefsPayloadState, SystemHardware, SystemState};
use update_types::{InstallPlan, OmahaResponse};

/// Run the response handler stage against the device
pub fn run_check(
    config: &Config,
    response: &OmahaResponse,
    device: DeviceState,
) -> Result<StageResult<InstallPlan>> {
    let prefs: Arc<dyn Prefs> = Arc::new(
        FilePrefs::open(&config.prefs_dir)
            .wrap_err_with(|| format!("Failed to open prefs in {}", config.prefs_dir.display()))?,
    );

    let payload_state = Arc::new(PrefsPayloadState::new(prefs.clone()));
    payload_state.set_response(response);

    let hardware = SystemHardware::new(device.official_build)
        .with_cmdline_path(config.cmdline_path.clone());

    let system_state = SystemState::new(
        payload_state,
        prefs,
        Arc::new(hardware),
        device.request_params,
    );
    tracing::debug!("System state: {:?}", system_state);

    let mut handler = ResponseHandler::new(system_state);
    if let Some(boot_device) = device.boot_device {
        handler = handler.with_boot_device(boot_device);
    }
    let mut action = ResponseHandlerAction::new(handler)
        .with_deadline_file(DeadlineFile::new(config.deadline_file.clone()));

    let mut events: Vec<ExecutionProgress> = Vec::new();
    let result = {
        let mut processor = ActionProcessor::with_delegate(&mut events);
        let result = processor.run(&mut action, response);
        processor.finish(result)
    };

    for event in &events {
        tracing::debug!("{}", serde_json::to_string(event)?);
    }

    Ok(result)
}
