//! Stage contract and sequencer for the update pipeline
//!
//! A stage is an [`Action`]: it accepts one borrowed input, may produce one
//! output into an [`OutputPipe`], and completes exactly once by returning a
//! [`CompletionCode`]. The [`ActionProcessor`] owns sequencing: it runs
//! stages in order, hands each stage's output to the next, and stops the
//! chain as soon as a stage declines or fails.

mod action;
mod processor;

pub use action::{Action, ActionId, CompletionCode, OutputPipe};
pub use processor::{ActionProcessor, ExecutionProgress, ProcessorDelegate, StageResult};
