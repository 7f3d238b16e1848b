use std::fmt;

use delta_pipeline::{RunLog, StageStatus};

pub(crate) const RESOLVING: &str = "resolving";
pub(crate) const CLASSIFYING: &str = "classifying";
pub(crate) const ASSEMBLING: &str = "assembling";
pub(crate) const CONVERTING: &str = "converting";
pub(crate) const SCOPING: &str = "scoping";
pub(crate) const DEPLOYING: &str = "deploying";

/// Where a deploy run is, or where it stopped.
///
/// Runs only move forward: `Idle`, `Resolving`, `Classifying`, `Assembling`,
/// `Converting`, `ScopeBuilt`, `Deploying`, then `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Idle,
    Resolving,
    Classifying,
    Assembling,
    Converting,
    ScopeBuilt,
    Deploying,
    Succeeded,
    Failed { stage: &'static str },
}

impl DeployState {
    /// The state a run is in while the named stage executes.
    #[must_use]
    pub fn for_stage(stage: &str) -> Option<Self> {
        match stage {
            RESOLVING => Some(Self::Resolving),
            CLASSIFYING => Some(Self::Classifying),
            ASSEMBLING => Some(Self::Assembling),
            CONVERTING => Some(Self::Converting),
            SCOPING => Some(Self::ScopeBuilt),
            DEPLOYING => Some(Self::Deploying),
            _ => None,
        }
    }

    /// Every state the run passed through, ending with where it stopped.
    #[must_use]
    pub fn trace(run_log: &RunLog) -> Vec<Self> {
        let mut states = vec![Self::Idle];
        states.extend(
            run_log
                .records()
                .iter()
                .filter_map(|record| Self::for_stage(record.name)),
        );
        let last = Self::reached(run_log);
        if states.last() != Some(&last) {
            states.push(last);
        }
        states
    }

    /// The state a run ended in.
    #[must_use]
    pub fn reached(run_log: &RunLog) -> Self {
        if let Some(stage) = run_log.failed_stage() {
            return Self::Failed { stage };
        }
        match run_log
            .records()
            .iter()
            .rev()
            .find(|r| r.status == StageStatus::Completed)
        {
            Some(record) if record.name == DEPLOYING => Self::Succeeded,
            Some(record) => Self::for_stage(record.name).unwrap_or(Self::Idle),
            None => Self::Idle,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed { .. })
    }
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Resolving => f.write_str("resolving"),
            Self::Classifying => f.write_str("classifying"),
            Self::Assembling => f.write_str("assembling"),
            Self::Converting => f.write_str("converting"),
            Self::ScopeBuilt => f.write_str("scope built"),
            Self::Deploying => f.write_str("deploying"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed { stage } => write!(f, "failed in {stage}"),
        }
    }
}
