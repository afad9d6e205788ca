//! Project - the build tree being installed.
//!
//! A Project owns the targets of one build tree, the install declarations
//! that apply to them and the layout decisions (output directories, relink
//! staging, install names) install generation reads through [`BuildModel`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::core::install::InstallSpec;
use crate::core::manifest::{InstallDecl, Manifest, ManifestError};
use crate::core::model::{ArtifactNames, BuildModel};
use crate::core::platform::Os;
use crate::core::target::{Target, TargetKind};
use crate::install::script::script_path;
use crate::util::config::ToolPaths;

/// Directory, relative to the binary directory, for generator bookkeeping.
pub const FILES_DIR: &str = "CMakeFiles";

/// Prefix that makes a relative destination absolute at install time.
pub const INSTALL_PREFIX_REF: &str = "${CMAKE_INSTALL_PREFIX}";

/// A build tree with its targets and install declarations.
#[derive(Debug)]
pub struct Project {
    name: String,
    binary_dir: PathBuf,
    os: Os,
    skip_rpath: bool,
    build_type: Option<String>,
    install_prefix: String,
    library_output_dir: Option<String>,
    executable_output_dir: Option<String>,
    archive_output_dir: Option<String>,
    tools: ToolPaths,
    targets: IndexMap<String, Target>,
    installs: Vec<InstallSpec>,
    relink_overrides: BTreeMap<String, bool>,
    declared_configurations: Vec<String>,
    configuration_types: Option<Vec<String>>,
    finalized: bool,
}

impl Project {
    /// Create an empty project rooted at `binary_dir`.
    pub fn new(name: impl Into<String>, binary_dir: impl Into<PathBuf>, os: Os) -> Self {
        Project {
            name: name.into(),
            binary_dir: binary_dir.into(),
            os,
            skip_rpath: false,
            build_type: None,
            install_prefix: "/usr/local".to_string(),
            library_output_dir: None,
            executable_output_dir: None,
            archive_output_dir: None,
            tools: ToolPaths::default(),
            targets: IndexMap::new(),
            installs: Vec::new(),
            relink_overrides: BTreeMap::new(),
            declared_configurations: Vec::new(),
            configuration_types: None,
            finalized: false,
        }
    }

    /// Load and finalize a project from a manifest path.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path.parent().unwrap_or(Path::new("."));

        let mut project = Self::from_manifest(manifest, root)
            .with_context(|| format!("invalid manifest: {}", manifest_path.display()))?;
        project.finalize();
        Ok(project)
    }

    /// Build an (unfinalized) project from a parsed manifest.
    pub fn from_manifest(manifest: Manifest, root: &Path) -> Result<Self, ManifestError> {
        let section = manifest.project;
        let binary_dir = if Path::new(&section.binary_dir).is_absolute() {
            PathBuf::from(&section.binary_dir)
        } else {
            root.join(&section.binary_dir)
        };

        let mut project = Project::new(
            section.name,
            binary_dir,
            manifest.platform.os.unwrap_or_default(),
        );
        project.skip_rpath = manifest.platform.skip_rpath;
        project.build_type = section.build_type;
        project.install_prefix = section.install_prefix;
        project.library_output_dir = section.library_output_dir;
        project.executable_output_dir = section.executable_output_dir;
        project.archive_output_dir = section.archive_output_dir;
        project.declared_configurations = section.configurations;
        project.tools = manifest.tools;

        for (name, spec) in manifest.targets {
            let mut target = Target::new(name.clone(), spec.kind)
                .with_linker_language(spec.language);
            target.properties = spec.properties;
            target.output_dir = spec.output_dir;
            target.link_libraries = spec.link.iter().map(|l| l.to_link_library()).collect();

            if let Some(relink) = spec.needs_relink {
                project.relink_overrides.insert(name, relink);
            }
            project.add_target(target);
        }

        for decl in manifest.install {
            let spec = install_spec_from_decl(decl)?;
            project.declare_install(spec)?;
        }

        Ok(project)
    }

    /// Add (or replace) a target.
    pub fn add_target(&mut self, target: Target) {
        self.finalized = false;
        self.targets.insert(target.name.clone(), target);
    }

    /// Declare an install rule for one of the project's targets.
    ///
    /// Marks the target as installed and invalidates a previous
    /// [`finalize`](Self::finalize), since relinking depends on it.
    pub fn declare_install(&mut self, spec: InstallSpec) -> Result<(), ManifestError> {
        let target = self
            .targets
            .get(&spec.target)
            .ok_or_else(|| ManifestError::UnknownTarget {
                target: spec.target.clone(),
            })?;

        if spec.implib && !target.kind.has_import_library() {
            return Err(ManifestError::NoImportLibrary {
                target: spec.target.clone(),
                kind: target.kind,
            });
        }

        if let Some(permission) = spec
            .file_permissions
            .split_whitespace()
            .find(|p| !InstallSpec::is_valid_permission(p))
        {
            return Err(ManifestError::InvalidPermission {
                target: spec.target.clone(),
                permission: permission.to_string(),
            });
        }

        let duplicate = self.installs.iter().any(|existing| {
            existing.target == spec.target
                && existing.destination == spec.destination
                && existing.implib == spec.implib
        });
        if duplicate {
            return Err(ManifestError::DuplicateInstall {
                target: spec.target,
                destination: spec.destination,
                implib: spec.implib,
            });
        }

        target.mark_install_rule();
        self.finalized = false;
        self.installs.push(spec);
        Ok(())
    }

    /// Set the configurations of a multi-configuration build tree.
    pub fn set_configurations(&mut self, configurations: Vec<String>) {
        self.declared_configurations = configurations;
        self.finalized = false;
    }

    /// Force or suppress relinking of a target before install.
    pub fn set_relink_override(&mut self, target: impl Into<String>, relink: bool) {
        self.relink_overrides.insert(target.into(), relink);
        self.finalized = false;
    }

    /// Fix the configuration set and every target's build-tree layout.
    pub fn finalize(&mut self) {
        let relink: Vec<bool> = self
            .targets
            .values()
            .map(|t| match self.relink_overrides.get(&t.name) {
                Some(forced) => *forced,
                None => self.compute_needs_relink(t),
            })
            .collect();

        for (target, relink) in self.targets.values_mut().zip(relink) {
            target.needs_relink_before_install = relink;
        }

        self.configuration_types = Some(self.declared_configurations.clone());
        self.finalized = true;
        tracing::debug!(
            "finalized project `{}` with {} targets",
            self.name,
            self.targets.len()
        );
    }

    /// Whether a target must be relinked with its install-tree runtime path.
    fn compute_needs_relink(&self, target: &Target) -> bool {
        if !target.kind.is_runtime_linked() || !target.has_install_rule() {
            return false;
        }
        if self.skip_rpath || target.property_as_bool("BUILD_WITH_INSTALL_RPATH") {
            return false;
        }
        if !self.os.has_runtime_path() || target.linker_language.is_none() {
            return false;
        }

        let build_tree_rpath =
            !target.property_as_bool("SKIP_BUILD_RPATH") && !target.link_libraries.is_empty();
        let install_tree_rpath = target
            .property("INSTALL_RPATH")
            .is_some_and(|rpath| !rpath.is_empty());

        build_tree_rpath || install_tree_rpath
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    /// Binary directory as used inside scripts (forward slashes).
    pub fn binary_dir_str(&self) -> String {
        script_path(&self.binary_dir)
    }

    pub fn build_type(&self) -> Option<&str> {
        self.build_type.as_deref()
    }

    pub fn install_prefix(&self) -> &str {
        &self.install_prefix
    }

    /// Tool paths declared in the manifest.
    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    /// Install declarations in declaration order.
    pub fn installs(&self) -> &[InstallSpec] {
        &self.installs
    }

    fn resolve_dir(&self, dir: Option<&str>) -> String {
        let base = self.binary_dir_str();
        match dir {
            Some(dir) if Path::new(dir).is_absolute() => dir.trim_end_matches('/').to_string(),
            Some(dir) => format!("{}/{}", base, dir.trim_end_matches('/')),
            None => base,
        }
    }
}

impl BuildModel for Project {
    fn configuration_types(&self) -> Option<&[String]> {
        self.configuration_types.as_deref()
    }

    fn is_layout_final(&self, target: &Target) -> bool {
        self.finalized && self.targets.contains_key(&target.name)
    }

    fn find_target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    fn artifact_names(&self, target: &Target, config: Option<&str>) -> ArtifactNames {
        ArtifactNames::compute(target, self.os, config)
    }

    fn output_directory(&self, target: &Target, implib: bool) -> String {
        let archive = || {
            self.archive_output_dir
                .as_deref()
                .or(self.library_output_dir.as_deref())
        };

        let dir = target.output_dir.as_deref().or_else(|| match target.kind {
            _ if implib => archive(),
            TargetKind::StaticLib => archive(),
            TargetKind::Exe => self.executable_output_dir.as_deref(),
            TargetKind::SharedLib | TargetKind::Module => self.library_output_dir.as_deref(),
        });

        self.resolve_dir(dir)
    }

    fn relink_directory(&self, _target: &Target) -> String {
        format!("{}/{}/CMakeRelink.dir", self.binary_dir_str(), FILES_DIR)
    }

    fn config_directory(&self, config: &str) -> String {
        format!("{config}/")
    }

    fn install_name_dir_for_build_tree(&self, target: &Target, config: Option<&str>) -> String {
        if target.property_as_bool("BUILD_WITH_INSTALL_RPATH") {
            return self.install_name_dir_for_install_tree(target, config);
        }

        if self.os.is_apple() && !self.skip_rpath && !target.property_as_bool("SKIP_BUILD_RPATH")
        {
            format!("{}/", self.output_directory(target, false))
        } else {
            String::new()
        }
    }

    fn install_name_dir_for_install_tree(&self, target: &Target, _config: Option<&str>) -> String {
        match target.property("INSTALL_NAME_DIR") {
            Some(dir) if self.os.is_apple() && !self.skip_rpath && !dir.is_empty() => {
                format!("{dir}/")
            }
            _ => String::new(),
        }
    }

    fn soname_flag(&self, target: &Target) -> Option<&str> {
        target.linker_language.and(self.os.soname_flag())
    }
}

/// Convert a manifest `[[install]]` entry, anchoring relative destinations
/// at the install prefix.
fn install_spec_from_decl(decl: InstallDecl) -> Result<InstallSpec, ManifestError> {
    let destination = if decl.destination.starts_with('/') || decl.destination.starts_with('$') {
        decl.destination
    } else {
        format!("{}/{}", INSTALL_PREFIX_REF, decl.destination)
    };

    let mut spec = InstallSpec::new(decl.target, destination)
        .with_permissions(&decl.permissions)
        .with_configurations(decl.configurations)
        .with_component(decl.component);
    spec.implib = decl.implib;
    spec.optional = decl.optional;
    Ok(spec)
}
