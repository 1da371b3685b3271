use std::path::PathBuf;

use strum_macros::{Display, EnumIter};

pub const WINDOWS_CFLAGS: &str = "-std=c++14 -w";
pub const POSIX_CFLAGS: &str = "-std=c++14";

const CLANG: &str = "clang";
const CASTXML: &str = "castxml";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    Macos,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_system_name(std::env::consts::OS)
    }

    /// Classifies an OS identity string such as `Windows`, `linux` or
    /// `Darwin`. Only the Windows check changes behavior.
    pub fn from_system_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("windows") {
            Platform::Windows
        } else if name.contains("linux") {
            Platform::Linux
        } else if name.contains("macos") || name.contains("darwin") {
            Platform::Macos
        } else {
            Platform::Other
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    pub fn profile(self) -> ToolchainProfile {
        if self.is_windows() {
            ToolchainProfile {
                clang: PathBuf::from(CLANG),
                castxml: PathBuf::from(CASTXML),
                cflags: WINDOWS_CFLAGS.into(),
                mark_executable: false,
            }
        } else {
            ToolchainProfile {
                clang: PathBuf::from(CLANG),
                castxml: PathBuf::from(CASTXML),
                cflags: POSIX_CFLAGS.into(),
                mark_executable: true,
            }
        }
    }

    pub fn default_python(self) -> PathBuf {
        if self.is_windows() {
            PathBuf::from("python")
        } else {
            PathBuf::from("python3")
        }
    }
}

/// Tool names and compiler flags used on a given platform.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ToolchainProfile {
    pub clang: PathBuf,
    pub castxml: PathBuf,
    pub cflags: String,
    pub mark_executable: bool,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn windows_names_are_detected() {
        for name in ["Windows", "windows", "CYGWIN_NT on Windows", "WINDOWS"] {
            assert_eq!(Platform::from_system_name(name), Platform::Windows);
        }
    }

    #[test]
    fn everything_else_is_not_windows() {
        assert_eq!(Platform::from_system_name("Linux"), Platform::Linux);
        assert_eq!(Platform::from_system_name("Darwin"), Platform::Macos);
        assert_eq!(Platform::from_system_name("macos"), Platform::Macos);
        assert_eq!(Platform::from_system_name("FreeBSD"), Platform::Other);
        assert_eq!(Platform::from_system_name(""), Platform::Other);
    }

    #[test]
    fn windows_profile_skips_permissions() {
        let profile = Platform::Windows.profile();
        assert_eq!(profile.cflags, WINDOWS_CFLAGS);
        assert!(!profile.mark_executable);
        assert_eq!(profile.clang, PathBuf::from("clang"));
        assert_eq!(profile.castxml, PathBuf::from("castxml"));
    }

    #[test]
    fn non_windows_profiles_mark_tools_executable() {
        for platform in Platform::iter().filter(|p| !p.is_windows()) {
            let profile = platform.profile();
            assert_eq!(profile.cflags, POSIX_CFLAGS, "{}", platform);
            assert!(profile.mark_executable, "{}", platform);
        }
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Platform::Macos.to_string(), "macos");
    }
}
