mod bootstrap;
mod command;
mod config;
mod deps;
mod generator;
mod platform;
mod settings;
mod tools;

pub use crate::bootstrap::{Bootstrap, RunPlan, RunReport};
pub use crate::command::{CommandOutcome, CommandRunner, Invocation, SystemRunner};
pub use crate::config::{GenerationConfig, GeneratorArg, DEFAULT_MAPPING_FILE};
pub use crate::deps::{ensure_dependencies, pip_install, InstallPolicy, InstallReport};
#[cfg(feature = "embedded")]
pub use crate::generator::EmbeddedGenerator;
pub use crate::generator::{GeneratorTarget, InterpreterGenerator, WrapperGenerator};
pub use crate::platform::{Platform, ToolchainProfile, POSIX_CFLAGS, WINDOWS_CFLAGS};
pub use crate::settings::{Settings, SETTINGS_FILE};
pub use crate::tools::{locate, mark_executable};
