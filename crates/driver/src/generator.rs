use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use derivative::Derivative;
use serde::Deserialize;
use tracing::info;

use crate::command::{CommandRunner, Invocation};
use crate::config::GenerationConfig;

pub const DEFAULT_MODULE: &str = "pybindx";
pub const DEFAULT_CLASS: &str = "CppWrapperGenerator";

// argv[1]: module, argv[2]: class, argv[3]: JSON array of constructor arguments
const DRIVER: &str = "\
import importlib, json, sys
module = importlib.import_module(sys.argv[1])
generator = getattr(module, sys.argv[2])(*json.loads(sys.argv[3]))
generator.generate_wrapper()
";

/// Which Python class performs the generation.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorTarget {
    #[derivative(Default(value = "DEFAULT_MODULE.into()"))]
    pub module: String,
    #[derivative(Default(value = "DEFAULT_CLASS.into()"))]
    pub class: String,
}

pub trait WrapperGenerator {
    fn generate(&self, config: &GenerationConfig) -> Result<()>;
}

/// Runs the generator through a Python interpreter process.
pub struct InterpreterGenerator<'a> {
    runner: &'a dyn CommandRunner,
    python: PathBuf,
    target: GeneratorTarget,
}

impl<'a> InterpreterGenerator<'a> {
    pub fn new(runner: &'a dyn CommandRunner, python: PathBuf, target: GeneratorTarget) -> Self {
        InterpreterGenerator {
            runner,
            python,
            target,
        }
    }

    pub fn invocation(&self, config: &GenerationConfig) -> Result<Invocation> {
        let args = serde_json::to_string(&config.generator_args())
            .context("failed to encode generator arguments")?;
        Ok(Invocation::new(&self.python).args([
            "-c",
            DRIVER,
            self.target.module.as_str(),
            self.target.class.as_str(),
            args.as_str(),
        ]))
    }
}

impl WrapperGenerator for InterpreterGenerator<'_> {
    fn generate(&self, config: &GenerationConfig) -> Result<()> {
        let invocation = self.invocation(config)?;
        info!(
            "generating wrappers with {}.{} into {}",
            self.target.module,
            self.target.class,
            config.output_root.display()
        );
        let outcome = self.runner.run(&invocation)?;
        ensure!(
            outcome.success(),
            "{}.{} failed with {}",
            self.target.module,
            self.target.class,
            outcome
        );
        Ok(())
    }
}

#[cfg(feature = "embedded")]
pub use embedded::EmbeddedGenerator;

#[cfg(feature = "embedded")]
mod embedded {
    use anyhow::{anyhow, Result};
    use pyo3::types::PyTuple;
    use pyo3::{IntoPy, PyObject, PyResult, Python};
    use tracing::info;

    use super::{GeneratorTarget, WrapperGenerator};
    use crate::config::{GenerationConfig, GeneratorArg};

    impl IntoPy<PyObject> for GeneratorArg {
        fn into_py(self, py: Python) -> PyObject {
            match self {
                GeneratorArg::Str(s) => s.into_py(py),
                GeneratorArg::List(l) => l.into_py(py),
                GeneratorArg::None => py.None(),
            }
        }
    }

    /// Runs the generator inside this process's embedded interpreter.
    pub struct EmbeddedGenerator {
        target: GeneratorTarget,
    }

    impl EmbeddedGenerator {
        pub fn new(target: GeneratorTarget) -> Self {
            EmbeddedGenerator { target }
        }
    }

    impl WrapperGenerator for EmbeddedGenerator {
        fn generate(&self, config: &GenerationConfig) -> Result<()> {
            info!(
                "generating wrappers in-process with {}.{}",
                self.target.module, self.target.class
            );
            Python::with_gil(|py| -> PyResult<()> {
                let args: Vec<PyObject> = config
                    .generator_args()
                    .into_iter()
                    .map(|arg| arg.into_py(py))
                    .collect();
                let generator = py
                    .import(self.target.module.as_str())?
                    .getattr(self.target.class.as_str())?
                    .call1(PyTuple::new(py, args))?;
                generator.call_method0("generate_wrapper")?;
                Ok(())
            })
            .map_err(|e| {
                anyhow!(
                    "{}.{} failed: {}",
                    self.target.module,
                    self.target.class,
                    e
                )
            })
        }
    }

}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::command::CommandOutcome;

    struct FixedRunner {
        outcome: CommandOutcome,
        seen: RefCell<Vec<Invocation>>,
    }

    impl CommandRunner for FixedRunner {
        fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
            self.seen.borrow_mut().push(invocation.clone());
            Ok(self.outcome)
        }
    }

    fn config() -> GenerationConfig {
        GenerationConfig::in_directory(
            Path::new("/work"),
            "castxml".into(),
            "clang".into(),
            "-std=c++14 -w".into(),
        )
    }

    #[test]
    fn passes_target_and_arguments() {
        let runner = FixedRunner {
            outcome: CommandOutcome::SUCCESS,
            seen: RefCell::new(vec![]),
        };
        let generator =
            InterpreterGenerator::new(&runner, "python3".into(), GeneratorTarget::default());
        generator.generate(&config()).unwrap();

        let seen = runner.seen.into_inner();
        assert_eq!(seen.len(), 1);
        let args: Vec<_> = seen[0].args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(seen[0].program, PathBuf::from("python3"));
        assert_eq!(args[0], "-c");
        assert_eq!(args[2], "pybindx");
        assert_eq!(args[3], "CppWrapperGenerator");
        let decoded: serde_json::Value = serde_json::from_str(args[4]).unwrap();
        assert_eq!(
            decoded,
            serde_json::json!([
                "/work",
                "/work",
                "/work",
                "castxml",
                "/work/memflow_py.yml",
                "clang",
                "-std=c++14 -w",
                null
            ])
        );
    }

    #[test]
    fn failure_is_an_error() {
        let runner = FixedRunner {
            outcome: CommandOutcome { code: Some(1) },
            seen: RefCell::new(vec![]),
        };
        let generator =
            InterpreterGenerator::new(&runner, "python3".into(), GeneratorTarget::default());
        let err = generator.generate(&config()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pybindx.CppWrapperGenerator failed with exit status 1"
        );
    }

    #[test]
    fn target_defaults() {
        let target: GeneratorTarget = toml::from_str("class = \"Other\"").unwrap();
        assert_eq!(target.module, "pybindx");
        assert_eq!(target.class, "Other");
    }
}
