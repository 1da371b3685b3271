use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use tracing::{debug, info};

use crate::command::CommandRunner;
use crate::config::GenerationConfig;
use crate::deps::{ensure_dependencies, InstallPolicy, InstallReport};
use crate::generator::{GeneratorTarget, WrapperGenerator};
use crate::platform::Platform;
use crate::tools::{local_path, locate, prepare_tools};

/// A fully resolved run: nothing is looked up from the environment after
/// this point except the tools themselves.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RunPlan {
    pub working_dir: PathBuf,
    pub platform: Platform,
    pub python: PathBuf,
    pub packages: Vec<String>,
    pub install: InstallPolicy,
    pub mark_executable: bool,
    pub generator: GeneratorTarget,
    pub config: GenerationConfig,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub installs: Vec<InstallReport>,
    pub marked_executable: Vec<PathBuf>,
}

pub struct Bootstrap<'a> {
    runner: &'a dyn CommandRunner,
    generator: &'a dyn WrapperGenerator,
}

impl<'a> Bootstrap<'a> {
    pub fn new(runner: &'a dyn CommandRunner, generator: &'a dyn WrapperGenerator) -> Self {
        Bootstrap { runner, generator }
    }

    pub fn run(&self, plan: &RunPlan) -> Result<RunReport> {
        info!("preparing wrapper generation for {}", plan.platform);

        let config = check_inputs(plan)?;

        let installs = ensure_dependencies(self.runner, &plan.python, &plan.packages, plan.install)
            .context("while installing generator dependencies")?;

        let marked_executable = if plan.mark_executable {
            prepare_tools(
                &plan.working_dir,
                &[config.clang.as_path(), config.castxml.as_path()],
            )
            .context("while preparing external tools")?
        } else {
            debug!("{} needs no execute bits, skipping", plan.platform);
            vec![]
        };

        self.generator
            .generate(&config)
            .context("wrapper generation failed")?;
        info!("wrappers written to {}", config.output_root.display());

        Ok(RunReport {
            installs,
            marked_executable,
        })
    }
}

/// Fails before anything is installed or touched if an input is missing.
/// Tools found under the working directory are handed on as absolute paths;
/// bare names found on `PATH` are passed through unchanged.
fn check_inputs(plan: &RunPlan) -> Result<GenerationConfig> {
    let mut config = plan.config.clone();
    ensure!(
        config.mapping_file.is_file(),
        "mapping file {} does not exist",
        config.mapping_file.display()
    );
    for tool in [&mut config.castxml, &mut config.clang] {
        let found = locate(&plan.working_dir, &**tool)?;
        debug!("using {}", found.display());
        if let Some(local) = local_path(&plan.working_dir, &**tool) {
            *tool = local;
        }
    }
    Ok(config)
}
