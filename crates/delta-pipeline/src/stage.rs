/// One step of a pipeline.
///
/// # Type Parameters
///
/// - `Input`: produced by the previous stage (or handed to the pipeline)
/// - `Output`: handed to the next stage
/// - `Context`: shared dependencies, borrowed by every stage
/// - `Error`: the error type for stage failures
pub trait Stage {
    type Input: 'static;

    type Output: 'static;

    type Context;

    type Error;

    /// Name used in the run log, in logs and in error messages.
    fn name(&self) -> &'static str;

    /// Transforms the input into the next stage's input.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage cannot complete. The pipeline halts.
    fn execute(&self, ctx: &Self::Context, input: Self::Input)
    -> Result<Self::Output, Self::Error>;
}
