use delta_operations::operations::{DeployOutcome, DeployPlan};

pub(crate) trait DeployFormatter {
    fn format_outcome(&self, outcome: &DeployOutcome) -> String;
}

pub(crate) struct PlainTextDeployFormatter;

impl PlainTextDeployFormatter {
    fn format_staged_files(output: &mut String, plan: &DeployPlan) {
        output.push_str(&format!("Staged files: {}\n", plan.staged_files.len()));
        for file in &plan.staged_files {
            output.push_str(&format!("  {}\n", file.source_path.display()));
        }
    }

    fn format_scope(output: &mut String, plan: &DeployPlan) {
        output.push_str(&format!(
            "\nTest scope ({} tests):\n  {}\n",
            plan.scope.test_names().len(),
            plan.scope.serialized()
        ));
    }

    fn format_stages(output: &mut String, plan: &DeployPlan) {
        if let Some(dir) = &plan.package_dir {
            output.push_str(&format!("\nPackage: {}\n", dir.display()));
        }

        output.push_str("\nStages:\n");
        for line in plan.run_log.summary().lines() {
            output.push_str(&format!("  {line}\n"));
        }
    }

    fn format_plan(output: &mut String, plan: &DeployPlan) {
        Self::format_staged_files(output, plan);
        Self::format_scope(output, plan);
        Self::format_stages(output, plan);
    }
}

impl DeployFormatter for PlainTextDeployFormatter {
    fn format_outcome(&self, outcome: &DeployOutcome) -> String {
        let mut output = String::new();
        match outcome {
            DeployOutcome::NoChanges { filter } => {
                output.push_str(&format!(
                    "No changes match diff filter '{filter}'. Nothing to deploy.\n"
                ));
            }
            DeployOutcome::DryRun(plan) => {
                Self::format_plan(&mut output, plan);
                output.push_str("\nDry run: nothing was converted or deployed.\n");
            }
            DeployOutcome::Deployed { plan, report } => {
                Self::format_plan(&mut output, plan);
                output.push_str(&format!("\n{}\n", report.diagnostic));
            }
        }
        output
    }
}
