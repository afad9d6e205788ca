//! Post-install tool resolution.
//!
//! Each tool is looked up with the following priority:
//! 1. Manifest `[tools]` table
//! 2. Tool config file (`.berth/tools.toml` or `~/.berth/tools.toml`)
//! 3. Environment variables (INSTALL_NAME_TOOL, RANLIB, STRIP)
//! 4. `PATH` search, only when detection is requested
//!
//! Tools the platform never uses are not resolved at all.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::platform::Os;
use crate::util::config::{
    global_tools_config_path, load_tools_config, project_tools_config_path, ToolPaths,
};

/// A post-install tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    InstallNameTool,
    Ranlib,
    Strip,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::InstallNameTool, Tool::Ranlib, Tool::Strip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::InstallNameTool => "install_name_tool",
            Tool::Ranlib => "ranlib",
            Tool::Strip => "strip",
        }
    }

    /// Environment variable that names the tool.
    pub fn env_var(&self) -> &'static str {
        match self {
            Tool::InstallNameTool => "INSTALL_NAME_TOOL",
            Tool::Ranlib => "RANLIB",
            Tool::Strip => "STRIP",
        }
    }

    /// Program names searched on `PATH`, in order.
    pub fn programs(&self) -> &'static [&'static str] {
        match self {
            Tool::InstallNameTool => &["install_name_tool", "llvm-install-name-tool"],
            Tool::Ranlib => &["ranlib", "llvm-ranlib"],
            Tool::Strip => &["strip", "llvm-strip"],
        }
    }

    /// Whether install scripts for `os` ever invoke this tool.
    pub fn used_on(&self, os: Os) -> bool {
        match self {
            Tool::InstallNameTool => os.is_apple(),
            Tool::Ranlib => os.archives_need_index(),
            Tool::Strip => true,
        }
    }

    fn configured<'a>(&self, paths: &'a ToolPaths) -> Option<&'a PathBuf> {
        match self {
            Tool::InstallNameTool => paths.install_name_tool.as_ref(),
            Tool::Ranlib => paths.ranlib.as_ref(),
            Tool::Strip => paths.strip.as_ref(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a resolved tool path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSource {
    Manifest,
    Config,
    Environment,
    Path,
}

impl fmt::Display for ToolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToolSource::Manifest => "manifest",
            ToolSource::Config => "config",
            ToolSource::Environment => "environment",
            ToolSource::Path => "PATH",
        })
    }
}

/// A tool path and its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTool {
    pub path: PathBuf,
    pub source: ToolSource,
}

/// The resolved tool set for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedTools {
    pub install_name_tool: Option<ResolvedTool>,
    pub ranlib: Option<ResolvedTool>,
    pub strip: Option<ResolvedTool>,
}

impl ResolvedTools {
    pub fn get(&self, tool: Tool) -> Option<&ResolvedTool> {
        match tool {
            Tool::InstallNameTool => self.install_name_tool.as_ref(),
            Tool::Ranlib => self.ranlib.as_ref(),
            Tool::Strip => self.strip.as_ref(),
        }
    }

    fn set(&mut self, tool: Tool, resolved: Option<ResolvedTool>) {
        match tool {
            Tool::InstallNameTool => self.install_name_tool = resolved,
            Tool::Ranlib => self.ranlib = resolved,
            Tool::Strip => self.strip = resolved,
        }
    }

    /// The bare paths, without origins.
    pub fn paths(&self) -> ToolPaths {
        let path = |t: Option<&ResolvedTool>| t.map(|t| t.path.clone());
        ToolPaths {
            install_name_tool: path(self.install_name_tool.as_ref()),
            ranlib: path(self.ranlib.as_ref()),
            strip: path(self.strip.as_ref()),
        }
    }
}

/// Resolve the tools for `os` from every configured source.
pub fn resolve_tools(os: Os, manifest: &ToolPaths, project_root: &Path, detect: bool) -> ResolvedTools {
    let global_path = global_tools_config_path();
    let config = load_tools_config(
        global_path.as_deref(),
        &project_tools_config_path(project_root),
    );

    resolve_with(os, manifest, &config, detect, |var| {
        std::env::var_os(var).map(PathBuf::from)
    })
}

/// Resolve tools against explicit sources.
pub fn resolve_with(
    os: Os,
    manifest: &ToolPaths,
    config: &ToolPaths,
    detect: bool,
    env: impl Fn(&str) -> Option<PathBuf>,
) -> ResolvedTools {
    let mut resolved = ResolvedTools::default();

    for tool in Tool::ALL {
        if !tool.used_on(os) {
            tracing::debug!("{} is not used on {}", tool, os);
            continue;
        }

        let found = tool
            .configured(manifest)
            .map(|p| (p.clone(), ToolSource::Manifest))
            .or_else(|| tool.configured(config).map(|p| (p.clone(), ToolSource::Config)))
            .or_else(|| {
                env(tool.env_var())
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| (p, ToolSource::Environment))
            })
            .or_else(|| {
                if detect {
                    find_on_path(tool).map(|p| (p, ToolSource::Path))
                } else {
                    None
                }
            });

        match found {
            Some((path, source)) => {
                tracing::debug!("using {} from {}: {}", tool, source, path.display());
                resolved.set(tool, Some(ResolvedTool { path, source }));
            }
            None => tracing::debug!("{} not configured; its rules are skipped", tool),
        }
    }

    resolved
}

fn find_on_path(tool: Tool) -> Option<PathBuf> {
    tool.programs()
        .iter()
        .find_map(|program| which::which(program).ok())
}
