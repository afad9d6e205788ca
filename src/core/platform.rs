//! Target platform and its artifact conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::target::TargetKind;

/// Operating system the build tree targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    #[serde(alias = "darwin", alias = "osx")]
    MacOs,
    Windows,
}

impl Default for Os {
    fn default() -> Self {
        Os::host()
    }
}

impl Os {
    /// The operating system this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Linux
        }
    }

    /// Returns the lowercase identifier for this OS.
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::MacOs => "macos",
            Os::Windows => "windows",
        }
    }

    pub fn is_apple(&self) -> bool {
        matches!(self, Os::MacOs)
    }

    /// Whether shared libraries and executables come with import libraries.
    pub fn has_import_libraries(&self) -> bool {
        matches!(self, Os::Windows)
    }

    /// The linker flag that records a shared library's soname, if any.
    pub fn soname_flag(&self) -> Option<&'static str> {
        match self {
            Os::Linux => Some("-Wl,-soname,"),
            Os::MacOs => Some("-install_name"),
            Os::Windows => None,
        }
    }

    /// Whether binaries embed a runtime search path that differs between
    /// the build tree and the install tree.
    pub fn has_runtime_path(&self) -> bool {
        matches!(self, Os::Linux)
    }

    /// Whether static archives need their symbol index rebuilt after copying.
    pub fn archives_need_index(&self) -> bool {
        self.is_apple()
    }

    /// Whether executables may carry a VERSION.
    pub fn executable_versioning(&self) -> bool {
        !matches!(self, Os::Windows)
    }

    /// File name prefix for an artifact kind.
    pub fn prefix(&self, kind: TargetKind) -> &'static str {
        match (self, kind) {
            (_, TargetKind::Exe) | (Os::Windows, _) => "",
            _ => "lib",
        }
    }

    /// File name suffix (including the dot) for an artifact kind.
    pub fn suffix(&self, kind: TargetKind) -> &'static str {
        match (self, kind) {
            (Os::Windows, TargetKind::Exe) => ".exe",
            (_, TargetKind::Exe) => "",
            (Os::Windows, TargetKind::StaticLib) => ".lib",
            (_, TargetKind::StaticLib) => ".a",
            (Os::Windows, _) => ".dll",
            (Os::MacOs, TargetKind::SharedLib) => ".dylib",
            (_, TargetKind::SharedLib | TargetKind::Module) => ".so",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" | "osx" => Ok(Os::MacOs),
            "windows" => Ok(Os::Windows),
            other => Err(format!(
                "unknown platform `{}` (expected linux, macos or windows)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_suffix() {
        assert_eq!(Os::Linux.prefix(TargetKind::SharedLib), "lib");
        assert_eq!(Os::Linux.suffix(TargetKind::SharedLib), ".so");
        assert_eq!(Os::Linux.suffix(TargetKind::Exe), "");
        assert_eq!(Os::MacOs.suffix(TargetKind::SharedLib), ".dylib");
        assert_eq!(Os::MacOs.suffix(TargetKind::Module), ".so");
        assert_eq!(Os::Windows.prefix(TargetKind::StaticLib), "");
        assert_eq!(Os::Windows.suffix(TargetKind::StaticLib), ".lib");
        assert_eq!(Os::Windows.suffix(TargetKind::Module), ".dll");
        assert_eq!(Os::Windows.suffix(TargetKind::Exe), ".exe");
    }

    #[test]
    fn test_platform_policies() {
        assert!(Os::MacOs.archives_need_index());
        assert!(!Os::Linux.archives_need_index());
        assert!(!Os::Windows.executable_versioning());
        assert!(Os::Windows.soname_flag().is_none());
        assert!(Os::Linux.has_runtime_path());
        assert!(!Os::MacOs.has_runtime_path());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Darwin".parse::<Os>(), Ok(Os::MacOs));
        assert_eq!("linux".parse::<Os>(), Ok(Os::Linux));
        assert!("beos".parse::<Os>().is_err());
    }
}
