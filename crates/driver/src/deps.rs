use std::path::Path;

use anyhow::{bail, Result};
use serde::Deserialize;
use strum_macros::{Display, EnumString, EnumVariantNames};
use tracing::{info, warn};

use crate::command::{CommandOutcome, CommandRunner, Invocation};

pub const DEFAULT_PACKAGES: [&str; 2] = ["pybindx", "pygccxml"];

/// What to do about the generator's Python dependencies before a run.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Deserialize, Display, EnumString, EnumVariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InstallPolicy {
    /// Don't touch the Python environment.
    Skip,
    /// Install/upgrade, warn about failures and carry on.
    BestEffort,
    /// Install/upgrade, any failure aborts the run.
    Strict,
}

impl Default for InstallPolicy {
    fn default() -> Self {
        InstallPolicy::BestEffort
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InstallReport {
    pub package: String,
    /// `Err` holds the reason the installer could not be started at all.
    pub outcome: std::result::Result<CommandOutcome, String>,
}

impl InstallReport {
    pub fn succeeded(&self) -> bool {
        matches!(&self.outcome, Ok(outcome) if outcome.success())
    }
}

pub fn pip_install(python: &Path, package: &str) -> Invocation {
    Invocation::new(python).args(["-m", "pip", "install", "--upgrade", package])
}

/// Installs or upgrades each package with pip, one call per package.
pub fn ensure_dependencies(
    runner: &dyn CommandRunner,
    python: &Path,
    packages: &[String],
    policy: InstallPolicy,
) -> Result<Vec<InstallReport>> {
    if policy == InstallPolicy::Skip {
        info!("skipping dependency installation");
        return Ok(vec![]);
    }

    let mut reports = Vec::with_capacity(packages.len());
    for package in packages {
        let invocation = pip_install(python, package);
        info!("installing {}: {}", package, invocation);
        let outcome = match runner.run(&invocation) {
            Ok(outcome) => {
                if !outcome.success() {
                    if policy == InstallPolicy::Strict {
                        bail!("installing {} failed with {}", package, outcome);
                    }
                    warn!("installing {} failed with {}, continuing", package, outcome);
                }
                Ok(outcome)
            }
            Err(e) if policy == InstallPolicy::BestEffort => {
                warn!("could not run the installer for {}: {:#}", package, e);
                Err(format!("{:#}", e))
            }
            Err(e) => return Err(e.context(format!("failed to install {}", package))),
        };
        reports.push(InstallReport {
            package: package.clone(),
            outcome,
        });
    }
    Ok(reports)
}
