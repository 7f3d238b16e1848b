use std::fmt::Debug;
use std::marker::PhantomData;

use crate::erased::{ErasedStage, StageWrapper};
use crate::pipeline::Pipeline;
use crate::stage::Stage;

/// Type-state marker: no stage added yet.
pub struct Empty;

/// Type-state marker: at least one stage, the last producing `LastOutput`.
pub struct HasStages<LastOutput>(PhantomData<LastOutput>);

/// Builds a [`Pipeline`] whose adjacent stages agree on their hand-over
/// type.
///
/// ```ignore
/// let pipeline = PipelineBuilder::new()
///     .first_stage(Resolve)
///     .then(Classify)
///     .then(Assemble)
///     .build();
/// ```
pub struct PipelineBuilder<Input, Output, Ctx, Err: Debug, State> {
    stages: Vec<Box<dyn ErasedStage<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output, State)>,
}

impl<Ctx, Err: Debug> PipelineBuilder<(), (), Ctx, Err, Empty> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn first_stage<S>(
        self,
        stage: S,
    ) -> PipelineBuilder<S::Input, S::Output, Ctx, Err, HasStages<S::Output>>
    where
        S: Stage<Context = Ctx, Error = Err> + 'static,
    {
        let mut stages = self.stages;
        stages.push(Box::new(StageWrapper::new(stage)));
        PipelineBuilder {
            stages,
            _phantom: PhantomData,
        }
    }
}

impl<Ctx, Err: Debug> Default for PipelineBuilder<(), (), Ctx, Err, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Input, CurrentOutput, Ctx, Err: Debug>
    PipelineBuilder<Input, CurrentOutput, Ctx, Err, HasStages<CurrentOutput>>
{
    #[must_use]
    pub fn then<S>(
        self,
        stage: S,
    ) -> PipelineBuilder<Input, S::Output, Ctx, Err, HasStages<S::Output>>
    where
        S: Stage<Input = CurrentOutput, Context = Ctx, Error = Err> + 'static,
    {
        let mut stages = self.stages;
        stages.push(Box::new(StageWrapper::new(stage)));
        PipelineBuilder {
            stages,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn build(self) -> Pipeline<Input, CurrentOutput, Ctx, Err>
    where
        Input: 'static,
        CurrentOutput: 'static,
    {
        Pipeline::from_stages(self.stages)
    }
}
