use action_processor::CompletionCode;
use update_types::{DeviceError, InstallPlan};

/// Outcome of handling one update check response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The server has no update for this device
    NoUpdate,
    /// The offered version is the one the device rolled back from
    RollbackAvoided,
    /// No usable download URL
    ResponseInvalid,
    /// No install device could be determined
    DeviceResolutionFailure(DeviceError),
    Success(InstallPlan),
}

impl Decision {
    pub fn completion_code(&self) -> CompletionCode {
        match self {
            Decision::NoUpdate | Decision::RollbackAvoided => CompletionCode::Declined,
            Decision::ResponseInvalid => CompletionCode::ResponseInvalid,
            Decision::DeviceResolutionFailure(_) => CompletionCode::DeviceResolutionFailed,
            Decision::Success(_) => CompletionCode::Success,
        }
    }

    pub fn plan(&self) -> Option<&InstallPlan> {
        match self {
            Decision::Success(plan) => Some(plan),
            _ => None,
        }
    }
}
