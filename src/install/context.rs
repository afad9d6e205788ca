//! Platform and tool settings shared by every target generator.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::platform::Os;
use crate::util::config::ToolPaths;

/// Settings that decide which post-install rules are emitted.
///
/// A tool left unset (or set to an empty path) silently disables the rules
/// that would invoke it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallContext {
    /// Target platform is Apple
    pub apple: bool,

    /// Path rewrite tool for Mach-O install names
    pub install_name_tool: Option<PathBuf>,

    /// Archive index tool
    pub ranlib: Option<PathBuf>,

    /// Symbol stripping tool
    pub strip: Option<PathBuf>,

    /// Default of the install-time strip request
    pub strip_requested: bool,

    /// Executables may carry a VERSION property
    pub executable_versioning: bool,
}

impl InstallContext {
    /// Context with the platform policies of `os` and no tools.
    pub fn for_os(os: Os) -> Self {
        InstallContext {
            apple: os.is_apple(),
            executable_versioning: os.executable_versioning(),
            ..Default::default()
        }
    }

    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.install_name_tool = tools.install_name_tool;
        self.ranlib = tools.ranlib;
        self.strip = tools.strip;
        self
    }

    pub fn with_install_name_tool(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_name_tool = Some(path.into());
        self
    }

    pub fn with_ranlib(mut self, path: impl Into<PathBuf>) -> Self {
        self.ranlib = Some(path.into());
        self
    }

    pub fn with_strip(mut self, path: impl Into<PathBuf>) -> Self {
        self.strip = Some(path.into());
        self
    }

    pub fn with_strip_requested(mut self, requested: bool) -> Self {
        self.strip_requested = requested;
        self
    }

    /// The configured install name tool, if usable.
    pub fn install_name_tool_path(&self) -> Option<&Path> {
        usable(&self.install_name_tool)
    }

    /// The configured ranlib, if usable.
    pub fn ranlib_path(&self) -> Option<&Path> {
        usable(&self.ranlib)
    }

    /// The configured strip tool, if usable.
    pub fn strip_path(&self) -> Option<&Path> {
        usable(&self.strip)
    }
}

fn usable(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}
