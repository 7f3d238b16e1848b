use std::path::{Path, PathBuf};
use std::sync::Arc;

use delta_config::{EmptyChangesetPolicy, PipelineConfig};
use delta_core::{DeploymentScope, DiffFilter, PackageManifest, StagedFile};
use delta_pipeline::{PipelineBuilder, PipelineError, RunLog};
use tracing::{debug, info, warn};

use super::context::DeployContext;
use super::stages::{
    AssembleStage, ClassifyStage, ConvertStage, DeployStage, DeployedPackage, ResolveStage,
    ScopeStage, Scoped,
};
use super::state::DeployState;
use crate::components::RevisionRange;
use crate::traits::{DeployReport, Deployer, FormatConverter, VcsProvider};
use crate::{OperationError, Result};

#[derive(Debug, Clone)]
pub struct DeployInput {
    pub range: RevisionRange,
    /// Required unless `dry_run` is set.
    pub target_org: Option<String>,
    pub check_only: bool,
    /// Stop once the test scope is built: nothing is converted or deployed.
    pub dry_run: bool,
}

/// What a run assembled, and how far it got.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub staged_files: Vec<StagedFile>,
    pub scope: DeploymentScope,
    /// Converted package directory. `None` for dry runs.
    pub package_dir: Option<PathBuf>,
    pub run_log: RunLog,
    pub state: DeployState,
}

#[derive(Debug, Clone)]
pub enum DeployOutcome {
    /// The diff was empty and the configured policy is to skip.
    NoChanges { filter: DiffFilter },
    DryRun(DeployPlan),
    Deployed {
        plan: DeployPlan,
        report: DeployReport,
    },
}

/// Turns a revision range into a deployed, test-scoped package.
pub struct DeployOperation<V, C, D> {
    vcs: Arc<V>,
    converter: Arc<C>,
    deployer: Arc<D>,
}

impl<V, C, D> DeployOperation<V, C, D>
where
    V: VcsProvider + 'static,
    C: FormatConverter + 'static,
    D: Deployer + 'static,
{
    pub fn new(vcs: Arc<V>, converter: Arc<C>, deployer: Arc<D>) -> Self {
        Self {
            vcs,
            converter,
            deployer,
        }
    }

    /// Runs resolve, classify, assemble, convert, scope and deploy in order,
    /// stopping at the first stage that fails.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::StageFailed`] naming the failing stage and
    /// carrying its error. An empty diff is only an error when the configured
    /// policy is [`EmptyChangesetPolicy::Fail`].
    pub fn execute(
        &self,
        repo_root: &Path,
        config: &PipelineConfig,
        input: &DeployInput,
    ) -> Result<DeployOutcome> {
        if !input.dry_run && input.target_org.is_none() {
            return Err(OperationError::MissingTargetOrg);
        }

        let ctx = DeployContext::new(
            repo_root.to_path_buf(),
            config.clone(),
            Arc::clone(&self.vcs),
            Arc::clone(&self.converter),
            Arc::clone(&self.deployer),
        )
        .with_target(input.target_org.clone(), input.check_only);

        info!(range = %input.range, dry_run = input.dry_run, "starting deploy run");

        if input.dry_run {
            Self::plan_only(&ctx, input)
        } else {
            Self::deploy(&ctx, input)
        }
    }

    fn plan_only(ctx: &DeployContext<V, C, D>, input: &DeployInput) -> Result<DeployOutcome> {
        let pipeline = PipelineBuilder::new()
            .first_stage(ResolveStage::<V, C, D>::new())
            .then(ClassifyStage::new())
            .then(AssembleStage::new())
            .then(ScopeStage::<PackageManifest, V, C, D>::new())
            .build();

        let (result, run_log) = pipeline.execute_with_log(ctx, input.range.clone());
        let Scoped { package, scope } = match finish(result, &run_log, ctx.config())? {
            Finished::Done(scoped) => scoped,
            Finished::Skipped(filter) => return Ok(DeployOutcome::NoChanges { filter }),
        };

        let state = DeployState::reached(&run_log);
        Ok(DeployOutcome::DryRun(DeployPlan {
            staged_files: package.staged_files().to_vec(),
            scope,
            package_dir: None,
            run_log,
            state,
        }))
    }

    fn deploy(ctx: &DeployContext<V, C, D>, input: &DeployInput) -> Result<DeployOutcome> {
        let pipeline = PipelineBuilder::new()
            .first_stage(ResolveStage::<V, C, D>::new())
            .then(ClassifyStage::new())
            .then(AssembleStage::new())
            .then(ConvertStage::new())
            .then(ScopeStage::new())
            .then(DeployStage::new())
            .build();

        let (result, run_log) = pipeline.execute_with_log(ctx, input.range.clone());
        let DeployedPackage {
            converted,
            scope,
            report,
        } = match finish(result, &run_log, ctx.config())? {
            Finished::Done(deployed) => deployed,
            Finished::Skipped(filter) => return Ok(DeployOutcome::NoChanges { filter }),
        };

        let state = DeployState::reached(&run_log);
        Ok(DeployOutcome::Deployed {
            plan: DeployPlan {
                staged_files: converted.manifest.staged_files().to_vec(),
                scope,
                package_dir: Some(converted.package_dir),
                run_log,
                state,
            },
            report,
        })
    }
}

enum Finished<T> {
    Done(T),
    Skipped(DiffFilter),
}

fn finish<T>(
    result: std::result::Result<T, PipelineError<OperationError>>,
    run_log: &RunLog,
    config: &PipelineConfig,
) -> Result<Finished<T>> {
    let state = DeployState::reached(run_log);
    debug!(stages = %run_log.summary(), "deploy run trace");

    match result {
        Ok(output) => {
            info!(state = %state, "deploy run finished");
            Ok(Finished::Done(output))
        }
        Err(err) => {
            if let Some(OperationError::EmptyChangeset { filter }) = err.stage_error() {
                if config.empty_changeset() == EmptyChangesetPolicy::Skip {
                    info!(filter = %filter, "no changes to deploy");
                    return Ok(Finished::Skipped(*filter));
                }
            }
            warn!(state = %state, "deploy run stopped");
            Err(err.into())
        }
    }
}
