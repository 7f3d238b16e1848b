//! Typed stage runner for one-directional pipelines.
//!
//! Each stage consumes the previous stage's output as its only input. The
//! builder checks at compile time that adjacent stages agree on the type they
//! hand over. Execution stops at the first failing stage; nothing is undone,
//! and the [`RunLog`] records how far the run got.

mod builder;
mod erased;
mod error;
mod pipeline;
mod run_log;
mod stage;

pub use builder::PipelineBuilder;
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use run_log::{RunLog, StageRecord, StageStatus};
pub use stage::Stage;
