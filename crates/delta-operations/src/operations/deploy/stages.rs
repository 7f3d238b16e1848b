use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

use delta_core::{ChangedFile, ClassifiedEntry, DeploymentScope, PackageManifest, TestLevel};
use delta_pipeline::Stage;
use tracing::{debug, info};

use super::context::DeployContext;
use super::output::{check_output_dirs, reset_output_dir};
use super::state::{ASSEMBLING, CLASSIFYING, CONVERTING, DEPLOYING, RESOLVING, SCOPING};
use crate::OperationError;
use crate::components::{PackageAssembler, RevisionRange, build_scope, classify, resolve};
use crate::traits::{DeployReport, DeploySubmission, Deployer, FormatConverter, VcsProvider};

const PROJECT_FILE: &str = "sfdx-project.json";

/// A staged tree after format conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedPackage {
    pub manifest: PackageManifest,
    pub package_dir: PathBuf,
}

/// A package together with its bounded test scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoped<T> {
    pub package: T,
    pub scope: DeploymentScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedPackage {
    pub converted: ConvertedPackage,
    pub scope: DeploymentScope,
    pub report: DeployReport,
}

/// Anything the scope stage can read test names from.
pub trait CarriesManifest {
    fn manifest(&self) -> &PackageManifest;
}

impl CarriesManifest for PackageManifest {
    fn manifest(&self) -> &PackageManifest {
        self
    }
}

impl CarriesManifest for ConvertedPackage {
    fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }
}

macro_rules! stage_struct {
    ($name:ident) => {
        pub(crate) struct $name<V, C, D> {
            _marker: PhantomData<(V, C, D)>,
        }

        impl<V, C, D> $name<V, C, D> {
            pub(crate) fn new() -> Self {
                Self {
                    _marker: PhantomData,
                }
            }
        }
    };
}

stage_struct!(ResolveStage);
stage_struct!(ClassifyStage);
stage_struct!(AssembleStage);
stage_struct!(ConvertStage);
stage_struct!(DeployStage);

impl<V, C, D> Stage for ResolveStage<V, C, D>
where
    V: VcsProvider + 'static,
    C: 'static,
    D: 'static,
{
    type Input = RevisionRange;
    type Output = Vec<ChangedFile>;
    type Context = DeployContext<V, C, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        RESOLVING
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let changed = resolve(ctx.vcs(), ctx.repo_root(), &input, ctx.config())?;
        if changed.is_empty() {
            return Err(OperationError::EmptyChangeset {
                filter: ctx.config().diff_filter(),
            });
        }
        Ok(changed)
    }
}

impl<V, C, D> Stage for ClassifyStage<V, C, D>
where
    V: 'static,
    C: 'static,
    D: 'static,
{
    type Input = Vec<ChangedFile>;
    type Output = Vec<ClassifiedEntry>;
    type Context = DeployContext<V, C, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        CLASSIFYING
    }

    fn execute(
        &self,
        _ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let entries = classify(&input);
        debug!(
            entries = entries.len(),
            tests = entries.iter().filter(|e| e.is_test_class()).count(),
            descriptors = entries.iter().filter(|e| e.is_descriptor()).count(),
            "classified changeset"
        );
        Ok(entries)
    }
}

impl<V, C, D> Stage for AssembleStage<V, C, D>
where
    V: VcsProvider + 'static,
    C: 'static,
    D: 'static,
{
    type Input = Vec<ClassifiedEntry>;
    type Output = PackageManifest;
    type Context = DeployContext<V, C, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        ASSEMBLING
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        check_output_dirs(ctx.vcs(), ctx.repo_root(), ctx.config())?;
        let staging_root = ctx.config().staging_root();
        reset_output_dir(&staging_root)?;
        PackageAssembler::new(ctx.repo_root(), &staging_root, ctx.config()).assemble(&input)
    }
}

impl<V, C, D> Stage for ConvertStage<V, C, D>
where
    V: 'static,
    C: FormatConverter + 'static,
    D: 'static,
{
    type Input = PackageManifest;
    type Output = ConvertedPackage;
    type Context = DeployContext<V, C, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        CONVERTING
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let staging_root = ctx.config().staging_root();
        let package_dir = ctx.config().package_output();
        reset_output_dir(&package_dir)?;

        // The converter only runs inside a project, so carry the marker over.
        let project_file = ctx.repo_root().join(PROJECT_FILE);
        if project_file.is_file() {
            fs::copy(&project_file, staging_root.join(PROJECT_FILE)).map_err(|source| {
                OperationError::Staging {
                    path: project_file.clone(),
                    source,
                }
            })?;
        }

        ctx.converter()
            .convert(&staging_root, ctx.config().package_root(), &package_dir)?;
        info!(package = %package_dir.display(), "converted staged sources");

        Ok(ConvertedPackage {
            manifest: input,
            package_dir,
        })
    }
}

/// Builds the bounded test scope for whatever package reaches it.
pub(crate) struct ScopeStage<T, V, C, D> {
    _marker: PhantomData<(T, V, C, D)>,
}

impl<T, V, C, D> ScopeStage<T, V, C, D> {
    pub(crate) fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T, V, C, D> Stage for ScopeStage<T, V, C, D>
where
    T: CarriesManifest + 'static,
    V: 'static,
    C: 'static,
    D: 'static,
{
    type Input = T;
    type Output = Scoped<T>;
    type Context = DeployContext<V, C, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        SCOPING
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let scope = build_scope(input.manifest(), ctx.config().max_scope_chars())?;
        info!(scope = scope.serialized(), "test scope ready");
        Ok(Scoped {
            package: input,
            scope,
        })
    }
}

impl<V, C, D> Stage for DeployStage<V, C, D>
where
    V: 'static,
    C: 'static,
    D: Deployer + 'static,
{
    type Input = Scoped<ConvertedPackage>;
    type Output = DeployedPackage;
    type Context = DeployContext<V, C, D>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        DEPLOYING
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let org = ctx.target_org().ok_or(OperationError::MissingTargetOrg)?;
        let Scoped { package, scope } = input;

        info!(
            org,
            check_only = ctx.check_only(),
            tests = scope.test_names().len(),
            "deploying package"
        );
        let report = ctx.deployer().deploy(&DeploySubmission {
            package_dir: &package.package_dir,
            org,
            scope: &scope,
            test_level: TestLevel::RunSpecifiedTests,
            wait: ctx.config().wait(),
            check_only: ctx.check_only(),
        })?;

        Ok(DeployedPackage {
            converted: package,
            scope,
            report,
        })
    }
}
