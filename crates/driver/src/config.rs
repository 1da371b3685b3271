use std::path::{Path, PathBuf};

use serde::Serialize;

pub const DEFAULT_MAPPING_FILE: &str = "memflow_py.yml";

/// Everything the wrapper generator is constructed with.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GenerationConfig {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub include_root: PathBuf,
    pub castxml: PathBuf,
    pub clang: PathBuf,
    pub mapping_file: PathBuf,
    pub cflags: String,
    pub extra_options: Option<Vec<String>>,
}

/// A single positional argument of the generator constructor.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(untagged)]
pub enum GeneratorArg {
    Str(String),
    List(Vec<String>),
    None,
}

impl From<&Path> for GeneratorArg {
    fn from(path: &Path) -> Self {
        GeneratorArg::Str(path.to_string_lossy().into_owned())
    }
}

impl GenerationConfig {
    /// Config rooted at `dir` with the default mapping file.
    pub fn in_directory(dir: &Path, castxml: PathBuf, clang: PathBuf, cflags: String) -> Self {
        GenerationConfig {
            source_root: dir.to_owned(),
            output_root: dir.to_owned(),
            include_root: dir.to_owned(),
            castxml,
            clang,
            mapping_file: dir.join(DEFAULT_MAPPING_FILE),
            cflags,
            extra_options: None,
        }
    }

    // constructor order is (source_root, source_includes, wrapper_root, castxml_binary,
    // package_info_path, clang_binary, cflags, source_header_files)
    pub fn generator_args(&self) -> Vec<GeneratorArg> {
        vec![
            self.source_root.as_path().into(),
            self.include_root.as_path().into(),
            self.output_root.as_path().into(),
            self.castxml.as_path().into(),
            self.mapping_file.as_path().into(),
            self.clang.as_path().into(),
            GeneratorArg::Str(self.cflags.clone()),
            match &self.extra_options {
                Some(options) => GeneratorArg::List(options.clone()),
                None => GeneratorArg::None,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config() -> GenerationConfig {
        GenerationConfig::in_directory(
            Path::new("/work"),
            "castxml".into(),
            "clang".into(),
            "-std=c++14".into(),
        )
    }

    #[test]
    fn roots_share_the_directory() {
        let config = config();
        assert_eq!(config.source_root, PathBuf::from("/work"));
        assert_eq!(config.output_root, PathBuf::from("/work"));
        assert_eq!(config.include_root, PathBuf::from("/work"));
        assert_eq!(config.mapping_file, PathBuf::from("/work/memflow_py.yml"));
        assert_eq!(config.extra_options, None);
    }

    #[test]
    fn args_follow_constructor_order() {
        let mut config = config();
        config.output_root = "/out".into();
        config.include_root = "/inc".into();
        assert_eq!(
            config.generator_args(),
            vec![
                GeneratorArg::Str("/work".into()),
                GeneratorArg::Str("/inc".into()),
                GeneratorArg::Str("/out".into()),
                GeneratorArg::Str("castxml".into()),
                GeneratorArg::Str("/work/memflow_py.yml".into()),
                GeneratorArg::Str("clang".into()),
                GeneratorArg::Str("-std=c++14".into()),
                GeneratorArg::None,
            ]
        );
    }

    #[test]
    fn args_serialize_as_plain_json() {
        let mut config = config();
        config.extra_options = Some(vec!["a.hpp".into()]);
        let json = serde_json::to_string(&config.generator_args()).unwrap();
        assert_eq!(
            json,
            r#"["/work","/work","/work","castxml","/work/memflow_py.yml","clang","-std=c++14",["a.hpp"]]"#
        );
        let json = serde_json::to_value(GeneratorArg::None).unwrap();
        assert!(json.is_null());
    }
}
