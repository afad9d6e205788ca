//! Tool configuration for Berth.
//!
//! Post-install tool paths can be configured in two file locations:
//! - Global: `~/.berth/tools.toml` - User-wide defaults
//! - Project: `.berth/tools.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. The manifest's own
//! `[tools]` table takes precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Paths of the tools install scripts invoke after copying artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Rewrites install names of Mach-O binaries
    pub install_name_tool: Option<PathBuf>,

    /// Regenerates the symbol index of static archives
    pub ranlib: Option<PathBuf>,

    /// Strips symbols from binaries
    pub strip: Option<PathBuf>,
}

impl ToolPaths {
    /// Check if any tool path is configured.
    pub fn has_overrides(&self) -> bool {
        self.install_name_tool.is_some() || self.ranlib.is_some() || self.strip.is_some()
    }

    /// Merge another set of paths into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolPaths) {
        if other.install_name_tool.is_some() {
            self.install_name_tool = other.install_name_tool;
        }
        if other.ranlib.is_some() {
            self.ranlib = other.ranlib;
        }
        if other.strip.is_some() {
            self.strip = other.strip;
        }
    }
}

/// Contents of a `tools.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub tools: ToolPaths,
}

impl ToolsConfig {
    /// Load tool configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tools config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse tools config: {}", path.display()))
    }

    /// Load tool configuration with fallback to defaults if the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load tools config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}

/// Load merged tool paths from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/tools.toml)
/// 2. Global config (~/.berth/tools.toml)
pub fn load_tools_config(global_path: Option<&Path>, project_path: &Path) -> ToolPaths {
    let mut tools = ToolPaths::default();

    if let Some(global_path) = global_path {
        tools.merge(ToolsConfig::load_or_default(global_path).tools);
    }

    tools.merge(ToolsConfig::load_or_default(project_path).tools);
    tools
}

/// Get the global berth config directory (~/.berth).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".berth"))
}

/// Get the global tools config path (~/.berth/tools.toml).
pub fn global_tools_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tools.toml"))
}

/// Get the project tools config path (.berth/tools.toml).
pub fn project_tools_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".berth").join("tools.toml")
}
