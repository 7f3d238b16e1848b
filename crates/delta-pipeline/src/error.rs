use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError<E: Debug> {
    #[error("stage '{stage}' failed")]
    StageFailed {
        stage: &'static str,
        #[source]
        source: E,
    },

    /// A stage received a value of the wrong type. The builder rules this
    /// out for pipelines it constructs.
    #[error("stage '{stage}' received an unexpected input type")]
    TypeMismatch { stage: &'static str },

    #[error("pipeline has no stages")]
    Empty,
}

impl<E: Debug> PipelineError<E> {
    /// Name of the stage the run halted in, if any.
    #[must_use]
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::StageFailed { stage, .. } | Self::TypeMismatch { stage } => Some(stage),
            Self::Empty => None,
        }
    }

    /// The failing stage's own error, if the run halted on one.
    #[must_use]
    pub fn stage_error(&self) -> Option<&E> {
        match self {
            Self::StageFailed { source, .. } => Some(source),
            Self::TypeMismatch { .. } | Self::Empty => None,
        }
    }

    /// Consumes the error, returning the failing stage's own error.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if the run did not halt on a stage error.
    pub fn into_stage_error(self) -> Result<E, Self> {
        match self {
            Self::StageFailed { source, .. } => Ok(source),
            other => Err(other),
        }
    }
}
