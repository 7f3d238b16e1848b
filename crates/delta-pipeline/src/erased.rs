use std::any::Any;
use std::fmt::Debug;

use crate::error::PipelineError;
use crate::stage::Stage;

/// Object-safe view of a [`Stage`], so stages with different input and
/// output types can live in one list.
pub(crate) trait ErasedStage<Ctx, Err: Debug> {
    fn name(&self) -> &'static str;

    fn execute_erased(
        &self,
        ctx: &Ctx,
        input: Box<dyn Any>,
    ) -> Result<Box<dyn Any>, PipelineError<Err>>;
}

pub(crate) struct StageWrapper<S> {
    stage: S,
}

impl<S> StageWrapper<S> {
    pub(crate) fn new(stage: S) -> Self {
        Self { stage }
    }
}

impl<S> ErasedStage<S::Context, S::Error> for StageWrapper<S>
where
    S: Stage,
    S::Error: Debug,
{
    fn name(&self) -> &'static str {
        self.stage.name()
    }

    fn execute_erased(
        &self,
        ctx: &S::Context,
        input: Box<dyn Any>,
    ) -> Result<Box<dyn Any>, PipelineError<S::Error>> {
        let stage = self.stage.name();
        let typed_input = input
            .downcast::<S::Input>()
            .map_err(|_| PipelineError::TypeMismatch { stage })?;
        let output = self
            .stage
            .execute(ctx, *typed_input)
            .map_err(|source| PipelineError::StageFailed { stage, source })?;
        Ok(Box::new(output))
    }
}
