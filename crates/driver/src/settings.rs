use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use derivative::Derivative;
use serde::Deserialize;

use crate::bootstrap::RunPlan;
use crate::config::{GenerationConfig, DEFAULT_MAPPING_FILE};
use crate::deps::{InstallPolicy, DEFAULT_PACKAGES};
use crate::generator::GeneratorTarget;
use crate::platform::Platform;

pub const SETTINGS_FILE: &str = "pygen.toml";

/// User-facing knobs, read from `pygen.toml` and overridden from the command
/// line. Anything left unset falls back to the platform defaults.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[derivative(Default(value = "PathBuf::from(DEFAULT_MAPPING_FILE)"))]
    pub mapping_file: PathBuf,
    pub source_root: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub include_root: Option<PathBuf>,
    pub castxml: Option<PathBuf>,
    pub clang: Option<PathBuf>,
    pub cflags: Option<String>,
    pub python: Option<PathBuf>,
    #[derivative(Default(value = "DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect()"))]
    pub packages: Vec<String>,
    pub install: InstallPolicy,
    pub extra_options: Option<Vec<String>>,
    pub platform: Option<String>,
    pub generator: GeneratorTarget,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Loads `pygen.toml` from `dir` if there is one.
    pub fn load_default(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn platform(&self) -> Platform {
        match &self.platform {
            Some(name) => Platform::from_system_name(name),
            None => Platform::current(),
        }
    }

    pub fn resolve(&self, working_dir: &Path) -> RunPlan {
        let platform = self.platform();
        let profile = platform.profile();
        let dir_or_default = |dir: &Option<PathBuf>| match dir {
            Some(dir) => working_dir.join(dir),
            None => working_dir.to_owned(),
        };

        let config = GenerationConfig {
            source_root: dir_or_default(&self.source_root),
            output_root: dir_or_default(&self.output_root),
            include_root: dir_or_default(&self.include_root),
            castxml: self.castxml.clone().unwrap_or_else(|| profile.castxml.clone()),
            clang: self.clang.clone().unwrap_or_else(|| profile.clang.clone()),
            mapping_file: working_dir.join(&self.mapping_file),
            cflags: self.cflags.clone().unwrap_or_else(|| profile.cflags.clone()),
            extra_options: self.extra_options.clone(),
        };

        RunPlan {
            working_dir: working_dir.to_owned(),
            platform,
            python: self
                .python
                .clone()
                .unwrap_or_else(|| platform.default_python()),
            packages: self.packages.clone(),
            install: self.install,
            mark_executable: profile.mark_executable,
            generator: self.generator.clone(),
            config,
        }
    }
}
