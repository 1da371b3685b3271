use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use pygen_driver::{
    Bootstrap, InterpreterGenerator, RunPlan, RunReport, Settings, SystemRunner, WrapperGenerator,
};
use tracing::{info, Level};
use tracing_subscriber::fmt;

use crate::cli::{app, apply_overrides};

mod cli;

fn working_dir(matches: &ArgMatches) -> Result<PathBuf> {
    let cwd = env::current_dir().context("failed to determine the current directory")?;
    Ok(match matches.value_of_os("directory") {
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

fn load_settings(matches: &ArgMatches, working_dir: &Path) -> Result<Settings> {
    let mut settings = match matches.value_of_os("config") {
        Some(path) => Settings::load(&working_dir.join(path))?,
        None => Settings::load_default(working_dir)?,
    };
    apply_overrides(&mut settings, matches);
    Ok(settings)
}

#[cfg(feature = "embedded")]
fn run(matches: &ArgMatches, runner: &SystemRunner, plan: &RunPlan) -> Result<RunReport> {
    if matches.is_present("embedded") {
        let generator = pygen_driver::EmbeddedGenerator::new(plan.generator.clone());
        return bootstrap(runner, &generator, plan);
    }
    let generator = InterpreterGenerator::new(runner, plan.python.clone(), plan.generator.clone());
    bootstrap(runner, &generator, plan)
}

#[cfg(not(feature = "embedded"))]
fn run(_matches: &ArgMatches, runner: &SystemRunner, plan: &RunPlan) -> Result<RunReport> {
    let generator = InterpreterGenerator::new(runner, plan.python.clone(), plan.generator.clone());
    bootstrap(runner, &generator, plan)
}

fn bootstrap(
    runner: &SystemRunner,
    generator: &dyn WrapperGenerator,
    plan: &RunPlan,
) -> Result<RunReport> {
    Bootstrap::new(runner, generator).run(plan)
}

fn main() -> Result<()> {
    let matches = app().get_matches();

    let level = if matches.is_present("debug") {
        Level::DEBUG
    } else if matches.is_present("quiet") {
        Level::WARN
    } else {
        Level::INFO
    };
    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let working_dir = working_dir(&matches)?;
    let settings = load_settings(&matches, &working_dir)?;
    let plan = settings.resolve(&working_dir);

    let runner = SystemRunner::in_dir(&plan.working_dir);
    let report = run(&matches, &runner, &plan)?;

    let failed = report
        .installs
        .iter()
        .filter(|install| !install.succeeded())
        .count();
    info!(
        "done ({} of {} packages installed, {} tools marked executable)",
        report.installs.len() - failed,
        report.installs.len(),
        report.marked_executable.len()
    );
    Ok(())
}
