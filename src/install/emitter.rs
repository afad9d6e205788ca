//! The generic install-rule primitive.
//!
//! Target generators describe what to copy with an [`InstallRule`]; an
//! [`InstallRuleEmitter`] renders it. [`FileInstallEmitter`] renders the
//! `FILE(INSTALL ...)` command understood by the install-time executor.

use std::fmt;

use serde::Serialize;

use crate::core::target::TargetKind;

/// How the install-time executor treats the copied files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallType {
    Executable,
    StaticLibrary,
    SharedLibrary,
    ModuleLibrary,
    Directory,
}

impl InstallType {
    /// Keyword used after `TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallType::Executable => "EXECUTABLE",
            InstallType::StaticLibrary => "STATIC_LIBRARY",
            InstallType::SharedLibrary => "SHARED_LIBRARY",
            InstallType::ModuleLibrary => "MODULE",
            InstallType::Directory => "DIRECTORY",
        }
    }

    /// Whether the installed file is a linked binary carrying install names.
    pub fn is_linked_binary(&self) -> bool {
        matches!(
            self,
            InstallType::Executable | InstallType::SharedLibrary | InstallType::ModuleLibrary
        )
    }
}

impl From<TargetKind> for InstallType {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Exe => InstallType::Executable,
            TargetKind::StaticLib => InstallType::StaticLibrary,
            TargetKind::SharedLib => InstallType::SharedLibrary,
            TargetKind::Module => InstallType::ModuleLibrary,
        }
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the install primitive needs to copy one file or bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallRule {
    pub destination: String,
    pub install_type: InstallType,
    pub file: String,
    pub optional: bool,

    /// Extra properties, e.g. `VERSION 2.1 SOVERSION 2`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub properties: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub file_permissions: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir_permissions: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub configurations: Vec<String>,

    pub component: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    /// Directives appended verbatim after the file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub literal_args: Vec<String>,
}

impl InstallRule {
    /// A rule copying `file` into `destination`.
    pub fn new(
        destination: impl Into<String>,
        install_type: InstallType,
        file: impl Into<String>,
    ) -> Self {
        InstallRule {
            destination: destination.into(),
            install_type,
            file: file.into(),
            optional: false,
            properties: String::new(),
            file_permissions: String::new(),
            dir_permissions: String::new(),
            configurations: Vec::new(),
            component: String::new(),
            rename: None,
            literal_args: Vec::new(),
        }
    }
}

/// Renders install rules into script text.
pub trait InstallRuleEmitter {
    /// Render `rule` at the given indentation, including the final newline.
    fn emit(&self, rule: &InstallRule, indent: &str) -> String;
}

/// Emits `FILE(INSTALL ...)` commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInstallEmitter;

impl InstallRuleEmitter for FileInstallEmitter {
    fn emit(&self, rule: &InstallRule, indent: &str) -> String {
        let mut out = format!(
            "{indent}FILE(INSTALL DESTINATION \"{}\" TYPE {}",
            rule.destination, rule.install_type
        );

        if rule.optional {
            out.push_str(" OPTIONAL");
        }
        if !rule.properties.is_empty() {
            out.push_str(&format!(" PROPERTIES {}", rule.properties));
        }
        if !rule.file_permissions.is_empty() {
            out.push_str(&format!(" PERMISSIONS {}", rule.file_permissions));
        }
        if !rule.dir_permissions.is_empty() {
            out.push_str(&format!(" DIR_PERMISSIONS {}", rule.dir_permissions));
        }
        if let Some(rename) = rule.rename.as_deref().filter(|r| !r.is_empty()) {
            out.push_str(&format!(" RENAME \"{rename}\""));
        }
        if !rule.configurations.is_empty() {
            out.push_str(" CONFIGURATIONS");
            for config in &rule.configurations {
                out.push_str(&format!(" \"{config}\""));
            }
        }
        if !rule.component.is_empty() {
            out.push_str(&format!(" COMPONENTS \"{}\"", rule.component));
        }

        out.push_str(&format!(" FILES \"{}\"", rule.file));

        for arg in &rule.literal_args {
            out.push(' ');
            out.push_str(arg);
        }
        out.push_str(")\n");
        out
    }
}
