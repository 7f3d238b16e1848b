use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::erased::ErasedStage;
use crate::error::PipelineError;
use crate::run_log::RunLog;

/// A sequence of stages built by [`crate::PipelineBuilder`].
pub struct Pipeline<Input, Output, Ctx, Err: Debug> {
    stages: Vec<Box<dyn ErasedStage<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output)>,
}

impl<Input, Output, Ctx, Err> Pipeline<Input, Output, Ctx, Err>
where
    Input: 'static,
    Output: 'static,
    Err: Debug,
{
    pub(crate) fn from_stages(stages: Vec<Box<dyn ErasedStage<Ctx, Err>>>) -> Self {
        Self {
            stages,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in order, feeding each one's output to the next.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StageFailed`] naming the first stage that
    /// failed. Later stages are not run.
    pub fn execute(&self, ctx: &Ctx, input: Input) -> Result<Output, PipelineError<Err>> {
        let (result, _run_log) = self.execute_with_log(ctx, input);
        result
    }

    /// Like [`Pipeline::execute`], also returning the trace of entered stages.
    pub fn execute_with_log(
        &self,
        ctx: &Ctx,
        input: Input,
    ) -> (Result<Output, PipelineError<Err>>, RunLog) {
        let mut run_log = RunLog::new();

        if self.stages.is_empty() {
            return (Err(PipelineError::Empty), run_log);
        }

        let mut current: Box<dyn Any> = Box::new(input);

        for stage in &self.stages {
            let name = stage.name();
            run_log.record_start(name);
            debug!(stage = name, "entering stage");

            match stage.execute_erased(ctx, current) {
                Ok(output) => {
                    run_log.record_success();
                    debug!(stage = name, "stage completed");
                    current = output;
                }
                Err(error) => {
                    run_log.record_failure();
                    warn!(stage = name, "stage failed");
                    return (Err(error), run_log);
                }
            }
        }

        let result = current
            .downcast::<Output>()
            .map(|output| *output)
            .map_err(|_| PipelineError::TypeMismatch {
                stage: self.stages.last().map_or("output", |s| s.name()),
            });
        (result, run_log)
    }
}
