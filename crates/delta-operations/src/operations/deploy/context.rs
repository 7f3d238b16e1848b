use std::path::{Path, PathBuf};
use std::sync::Arc;

use delta_config::PipelineConfig;

/// Dependencies shared by every deploy stage.
pub struct DeployContext<V, C, D> {
    repo_root: PathBuf,
    config: PipelineConfig,
    target_org: Option<String>,
    check_only: bool,
    vcs: Arc<V>,
    converter: Arc<C>,
    deployer: Arc<D>,
}

impl<V, C, D> DeployContext<V, C, D> {
    pub(crate) fn new(
        repo_root: PathBuf,
        config: PipelineConfig,
        vcs: Arc<V>,
        converter: Arc<C>,
        deployer: Arc<D>,
    ) -> Self {
        Self {
            repo_root,
            config,
            target_org: None,
            check_only: false,
            vcs,
            converter,
            deployer,
        }
    }

    pub(crate) fn with_target(mut self, target_org: Option<String>, check_only: bool) -> Self {
        self.target_org = target_org;
        self.check_only = check_only;
        self
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn target_org(&self) -> Option<&str> {
        self.target_org.as_deref()
    }

    #[must_use]
    pub fn check_only(&self) -> bool {
        self.check_only
    }

    #[must_use]
    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    #[must_use]
    pub fn converter(&self) -> &C {
        &self.converter
    }

    #[must_use]
    pub fn deployer(&self) -> &D {
        &self.deployer
    }
}
