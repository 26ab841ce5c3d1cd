// components/action_processor/src/action.rs
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Completion
// ============================================================================

/// The single status a stage reports when it completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionCode {
    /// Stage did its work; output (if any) is ready for the next stage
    Success,
    /// Stage chose not to proceed (no update, rolled-back version).
    /// Stops the chain but is not a failure.
    Declined,
    /// Input was unusable
    ResponseInvalid,
    /// No install device could be determined
    DeviceResolutionFailed,
    Error,
}

impl CompletionCode {
    pub fn is_success(&self) -> bool {
        matches!(self, CompletionCode::Success)
    }

    pub fn is_benign(&self) -> bool {
        matches!(self, CompletionCode::Success | CompletionCode::Declined)
    }

    pub fn is_error(&self) -> bool {
        !self.is_benign()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionCode::Success => "success",
            CompletionCode::Declined => "declined",
            CompletionCode::ResponseInvalid => "response-invalid",
            CompletionCode::DeviceResolutionFailed => "device-resolution-failed",
            CompletionCode::Error => "error",
        }
    }
}

impl fmt::Display for CompletionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Output pipe
// ============================================================================

/// Slot a stage writes its output into
///
/// A disconnected pipe means no stage consumes this output; producing into
/// it drops the value. A pipe holds at most one value.
#[derive(Debug)]
pub struct OutputPipe<T> {
    connected: bool,
    value: Option<T>,
}

impl<T> OutputPipe<T> {
    pub fn connected() -> Self {
        Self {
            connected: true,
            value: None,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            value: None,
        }
    }

    pub fn has_output(&self) -> bool {
        self.value.is_some()
    }

    /// Hand a value downstream. Returns false if it was dropped.
    pub fn produce(&mut self, value: T) -> bool {
        if !self.connected {
            tracing::debug!("Output pipe not connected, dropping output");
            return false;
        }
        if self.value.is_some() {
            tracing::warn!("Output already produced, ignoring second value");
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

// ============================================================================
// Action trait
// ============================================================================

/// A pipeline stage
///
/// `perform` is called once per activation. Returning the code is the
/// completion signal, so a stage cannot complete twice or not at all.
pub trait Action<Input, Output> {
    fn id(&self) -> ActionId;

    fn description(&self) -> String;

    fn perform(&mut self, input: &Input, output: &mut OutputPipe<Output>) -> CompletionCode;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CompletionCode::Success, true, false)]
    #[case(CompletionCode::Declined, true, false)]
    #[case(CompletionCode::ResponseInvalid, false, true)]
    #[case(CompletionCode::DeviceResolutionFailed, false, true)]
    #[case(CompletionCode::Error, false, true)]
    fn classifies_codes(#[case] code: CompletionCode, #[case] benign: bool, #[case] error: bool) {
        assert_eq!(code.is_benign(), benign);
        assert_eq!(code.is_error(), error);
    }

    #[test]
    fn connected_pipe_holds_one_value() {
        let mut pipe = OutputPipe::connected();
        assert!(pipe.produce(1));
        assert!(!pipe.produce(2));
        assert_eq!(pipe.take(), Some(1));
        assert_eq!(pipe.take(), None);
    }

    #[test]
    fn disconnected_pipe_drops_value() {
        let mut pipe = OutputPipe::disconnected();
        assert!(!pipe.produce("plan"));
        assert!(!pipe.has_output());
    }
}
