//! Berth.toml manifest parsing and schema.
//!
//! The manifest describes a build tree: where it lives, which platform it
//! targets, the targets it produced and how each of them is installed.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::install::DEFAULT_COMPONENT;
use crate::core::platform::Os;
use crate::core::target::{Language, LinkLibrary, LinkType, TargetKind};
use crate::util::config::ToolPaths;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

/// Errors in the declarations of a manifest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("install rule names unknown target `{target}`\n\
             help: declare it under [targets.{target}]")]
    UnknownTarget { target: String },

    #[error("target `{target}` is already installed to `{destination}`{}", implib_suffix(.implib))]
    DuplicateInstall {
        target: String,
        destination: String,
        implib: bool,
    },

    #[error("invalid permission `{permission}` in install rule for `{target}`\n\
             help: use OWNER_*, GROUP_* or WORLD_* with READ, WRITE or EXECUTE, SETUID or SETGID")]
    InvalidPermission { target: String, permission: String },

    #[error("target `{target}` is a {kind} and has no import library")]
    NoImportLibrary { target: String, kind: TargetKind },
}

/// A parsed Berth.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Build tree settings
    pub project: ProjectSection,

    /// Platform the build tree targets
    #[serde(default)]
    pub platform: PlatformSection,

    /// Post-install tool paths
    #[serde(default)]
    pub tools: ToolPaths,

    /// Targets, in declaration order
    #[serde(default)]
    pub targets: IndexMap<String, TargetSpec>,

    /// Install declarations, in declaration order
    #[serde(default)]
    pub install: Vec<InstallDecl>,
}

/// The `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name
    pub name: String,

    /// Build tree root, relative to the manifest
    #[serde(default = "default_binary_dir")]
    pub binary_dir: String,

    /// Configuration of a single-configuration build tree
    #[serde(default)]
    pub build_type: Option<String>,

    /// Configurations of a multi-configuration build tree
    #[serde(default)]
    pub configurations: Vec<String>,

    /// Default install prefix
    #[serde(default = "default_install_prefix")]
    pub install_prefix: String,

    /// Output directory for shared libraries and modules
    #[serde(default)]
    pub library_output_dir: Option<String>,

    /// Output directory for executables
    #[serde(default)]
    pub executable_output_dir: Option<String>,

    /// Output directory for static and import libraries
    #[serde(default)]
    pub archive_output_dir: Option<String>,
}

fn implib_suffix(implib: &bool) -> &'static str {
    if *implib {
        " as an import library"
    } else {
        ""
    }
}

fn default_binary_dir() -> String {
    "build".to_string()
}

fn default_install_prefix() -> String {
    "/usr/local".to_string()
}

/// The `[platform]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformSection {
    /// Target operating system (defaults to the host)
    #[serde(default)]
    pub os: Option<Os>,

    /// Never embed runtime search paths or install names
    #[serde(default)]
    pub skip_rpath: bool,
}

/// A `[targets.<name>]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(default)]
    pub kind: TargetKind,

    #[serde(default = "default_language")]
    pub language: Option<Language>,

    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default)]
    pub link: Vec<LinkSpec>,

    /// Force or suppress relinking before install
    #[serde(default)]
    pub needs_relink: Option<bool>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

fn default_language() -> Option<Language> {
    Some(Language::C)
}

/// A link dependency as written in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkSpec {
    /// Simple name: `"core"`
    Simple(String),

    /// Name with a link type: `{ name = "core", type = "debug" }`
    Detailed {
        name: String,
        #[serde(rename = "type", default)]
        link_type: LinkType,
    },
}

impl LinkSpec {
    pub fn to_link_library(&self) -> LinkLibrary {
        match self {
            LinkSpec::Simple(name) => LinkLibrary::new(name.clone(), LinkType::General),
            LinkSpec::Detailed { name, link_type } => LinkLibrary::new(name.clone(), *link_type),
        }
    }
}

/// An `[[install]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallDecl {
    pub target: String,

    pub destination: String,

    #[serde(default)]
    pub implib: bool,

    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub configurations: Vec<String>,

    #[serde(default = "default_component")]
    pub component: String,

    #[serde(default)]
    pub optional: bool,
}

fn default_component() -> String {
    DEFAULT_COMPONENT.to_string()
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(manifest)
    }
}
