//! Sequencing of pipeline stages
//!
//! The processor activates each stage once, feeds it the previous stage's
//! output, and reports progress to an optional delegate.

use crate::action::{Action, ActionId, CompletionCode, OutputPipe};
use serde::Serialize;
use std::sync::mpsc;

/// Progress feedback while the chain runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ExecutionProgress {
    Started { id: ActionId, description: String },
    Completed { id: ActionId, code: CompletionCode },
    Skipped { id: ActionId, code: CompletionCode },
    Finished { code: CompletionCode },
}

/// Receives progress events from the processor
pub trait ProcessorDelegate {
    fn progress(&mut self, event: ExecutionProgress);
}

impl ProcessorDelegate for Vec<ExecutionProgress> {
    fn progress(&mut self, event: ExecutionProgress) {
        self.push(event);
    }
}

impl ProcessorDelegate for mpsc::Sender<ExecutionProgress> {
    fn progress(&mut self, event: ExecutionProgress) {
        if let Err(e) = self.send(event) {
            tracing::warn!("Progress receiver gone: {}", e);
        }
    }
}

/// What a stage left behind: its completion code and its output, if any
#[derive(Debug)]
pub struct StageResult<T> {
    pub code: CompletionCode,
    pub output: Option<T>,
}

impl<T> StageResult<T> {
    fn stopped(code: CompletionCode) -> Self {
        Self { code, output: None }
    }
}

pub struct ActionProcessor<'d> {
    delegate: Option<&'d mut dyn ProcessorDelegate>,
}

impl Default for ActionProcessor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> ActionProcessor<'d> {
    pub fn new() -> Self {
        Self { delegate: None }
    }

    pub fn with_delegate(delegate: &'d mut dyn ProcessorDelegate) -> Self {
        Self {
            delegate: Some(delegate),
        }
    }

    fn report(&mut self, event: ExecutionProgress) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.progress(event);
        }
    }

    /// Activate the first stage of a chain
    pub fn run<I, O, A>(&mut self, action: &mut A, input: &I) -> StageResult<O>
    where
        A: Action<I, O>,
    {
        let id = action.id();
        tracing::info!("▶️  {}: {}", id, action.description());
        self.report(ExecutionProgress::Started {
            id: id.clone(),
            description: action.description(),
        });

        let mut pipe = OutputPipe::connected();
        let code = action.perform(input, &mut pipe);

        if code.is_error() {
            tracing::error!("Stage {} failed: {}", id, code);
        } else {
            tracing::info!("Stage {} completed: {}", id, code);
        }
        self.report(ExecutionProgress::Completed { id, code });

        StageResult {
            code,
            output: pipe.take(),
        }
    }

    /// Activate the next stage with the previous stage's output
    ///
    /// The chain only continues after `Success` with output; any other
    /// result is passed through unchanged and the stage is skipped.
    pub fn then<M, O, A>(&mut self, previous: StageResult<M>, action: &mut A) -> StageResult<O>
    where
        A: Action<M, O>,
    {
        if !previous.code.is_success() {
            self.report(ExecutionProgress::Skipped {
                id: action.id(),
                code: previous.code,
            });
            return StageResult::stopped(previous.code);
        }

        match previous.output {
            Some(input) => self.run(action, &input),
            None => {
                tracing::error!(
                    "Previous stage succeeded without output, cannot run {}",
                    action.id()
                );
                self.report(ExecutionProgress::Skipped {
                    id: action.id(),
                    code: CompletionCode::Error,
                });
                StageResult::stopped(CompletionCode::Error)
            }
        }
    }

    /// Close the chain, reporting the final code
    pub fn finish<T>(&mut self, result: StageResult<T>) -> StageResult<T> {
        tracing::info!("Processing done: {}", result.code);
        self.report(ExecutionProgress::Finished { code: result.code });
        result
    }
}
