use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
#[cfg(unix)]
use anyhow::Context;
use tracing::debug;

/// Returns `tool` resolved against `working_dir` if a file exists there.
pub fn local_path(working_dir: &Path, tool: &Path) -> Option<PathBuf> {
    let candidate = working_dir.join(tool);
    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

/// Finds a tool either next to the working directory or on `PATH`.
pub fn locate(working_dir: &Path, tool: &Path) -> Result<PathBuf> {
    if let Some(path) = local_path(working_dir, tool) {
        return Ok(path);
    }
    // anything with a directory component must exist where it says
    if tool.components().count() == 1 {
        if let Some(path) = search_path(tool, env::var_os("PATH")) {
            return Ok(path);
        }
    }
    Err(anyhow!(
        "{} not found in {} or on PATH",
        tool.display(),
        working_dir.display()
    ))
}

fn search_path(tool: &Path, path_var: Option<OsString>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(&path_var)
        .flat_map(|dir| candidates(tool).into_iter().map(move |c| dir.join(c)))
        .find(|candidate| candidate.is_file())
}

fn candidates(tool: &Path) -> Vec<PathBuf> {
    if cfg!(windows) && tool.extension().is_none() {
        vec![tool.to_owned(), tool.with_extension("exe")]
    } else {
        vec![tool.to_owned()]
    }
}

/// Adds execute permission for user, group and other.
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms)
        .with_context(|| format!("failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
pub fn mark_executable(path: &Path) -> Result<()> {
    debug!("no execute bit to set on {}", path.display());
    Ok(())
}

/// Marks each tool that exists relative to `working_dir` as executable.
/// Tools only reachable through `PATH` are left alone.
pub fn prepare_tools(working_dir: &Path, tools: &[&Path]) -> Result<Vec<PathBuf>> {
    let mut marked = vec![];
    for tool in tools {
        match local_path(working_dir, tool) {
            Some(path) => {
                mark_executable(&path)?;
                debug!("marked {} executable", path.display());
                marked.push(path);
            }
            None => debug!("{} is not a local file, leaving it to PATH", tool.display()),
        }
    }
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn local_tools_win() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("castxml"), "").unwrap();
        assert_eq!(
            locate(dir.path(), Path::new("castxml")).unwrap(),
            dir.path().join("castxml")
        );
    }

    #[test]
    fn searches_path_entries_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("clang"), "").unwrap();
        let path_var = env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(
            search_path(Path::new("clang"), Some(path_var)),
            Some(second.path().join("clang"))
        );
        assert_eq!(search_path(Path::new("clang"), None), None);
    }

    #[test]
    fn missing_tool_names_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate(dir.path(), Path::new("no/such/castxml-tool")).unwrap_err();
        assert!(err.to_string().contains("castxml-tool not found"));
    }

    #[test]
    fn path_only_tools_are_not_marked() {
        let dir = tempfile::tempdir().unwrap();
        let marked = prepare_tools(dir.path(), &[Path::new("clang")]).unwrap();
        assert!(marked.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn marks_local_tools_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("castxml");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o640)).unwrap();

        let marked = prepare_tools(dir.path(), &[Path::new("castxml")]).unwrap();
        assert_eq!(marked, vec![tool.clone()]);
        let mode = fs::metadata(&tool).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }
}
