//! Target definitions - what gets installed.
//!
//! A Target represents one build artifact: executable, static library,
//! shared library, or loadable module.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of target being installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Executable binary
    #[default]
    #[serde(alias = "bin", alias = "executable")]
    Exe,

    /// Static library (.a / .lib)
    #[serde(alias = "lib", alias = "static")]
    StaticLib,

    /// Shared/dynamic library (.so / .dylib / .dll)
    #[serde(alias = "dylib", alias = "dynamic", alias = "shared")]
    SharedLib,

    /// Loadable module, never linked against (.so / .dll)
    #[serde(alias = "plugin", alias = "modulelib")]
    Module,
}

impl TargetKind {
    /// Name of the target type as it appears in build descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Exe => "EXECUTABLE",
            TargetKind::StaticLib => "STATIC_LIBRARY",
            TargetKind::SharedLib => "SHARED_LIBRARY",
            TargetKind::Module => "MODULE_LIBRARY",
        }
    }

    /// Check if this kind can carry an import library.
    pub fn has_import_library(&self) -> bool {
        matches!(self, TargetKind::Exe | TargetKind::SharedLib)
    }

    /// Check if the artifact may embed a runtime search path.
    pub fn is_runtime_linked(&self) -> bool {
        matches!(
            self,
            TargetKind::Exe | TargetKind::SharedLib | TargetKind::Module
        )
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language used to drive the final link step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    #[serde(alias = "c++", alias = "cpp")]
    Cxx,
}

/// How a link dependency participates per build configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Linked in every configuration
    #[default]
    General,
    /// Linked only in the debug configuration
    Debug,
    /// Linked in every configuration except debug
    Optimized,
}

impl LinkType {
    /// The link type active for a configuration name.
    pub fn for_config(config: Option<&str>) -> Self {
        match config {
            Some(c) if c.eq_ignore_ascii_case("debug") => LinkType::Debug,
            _ => LinkType::Optimized,
        }
    }

    /// Check if a dependency of this type is linked when `active` is in effect.
    pub fn applies_to(&self, active: LinkType) -> bool {
        *self == LinkType::General || *self == active
    }
}

/// A direct link dependency of a target, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkLibrary {
    /// Library or target name
    pub name: String,

    /// Configurations the dependency applies to
    #[serde(default)]
    pub link_type: LinkType,
}

impl LinkLibrary {
    pub fn new(name: impl Into<String>, link_type: LinkType) -> Self {
        LinkLibrary {
            name: name.into(),
            link_type,
        }
    }
}

/// A build artifact with the metadata needed to install it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Target name
    pub name: String,

    /// What kind of artifact the target produces
    #[serde(default)]
    pub kind: TargetKind,

    /// Language of the link step, if known
    #[serde(default)]
    pub linker_language: Option<Language>,

    /// Free-form properties (VERSION, SOVERSION, MACOSX_BUNDLE, ...)
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Direct link dependencies
    #[serde(default)]
    pub link_libraries: Vec<LinkLibrary>,

    /// Output directory override, relative to the binary directory
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Whether the build-tree binary must be relinked before installing
    #[serde(default)]
    pub needs_relink_before_install: bool,

    #[serde(skip)]
    has_install_rule: Cell<bool>,
}

impl Target {
    /// Create a new target with the given name and kind.
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        Target {
            name: name.into(),
            kind,
            linker_language: Some(Language::C),
            properties: BTreeMap::new(),
            link_libraries: Vec::new(),
            output_dir: None,
            needs_relink_before_install: false,
            has_install_rule: Cell::new(false),
        }
    }

    /// Create a new executable target.
    pub fn exe(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::Exe)
    }

    /// Create a new static library target.
    pub fn staticlib(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::StaticLib)
    }

    /// Create a new shared library target.
    pub fn sharedlib(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::SharedLib)
    }

    /// Create a new loadable module target.
    pub fn module(name: impl Into<String>) -> Self {
        Self::new(name, TargetKind::Module)
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Append a link dependency used in every configuration.
    pub fn with_link(self, name: impl Into<String>) -> Self {
        self.with_link_type(name, LinkType::General)
    }

    /// Append a link dependency with an explicit link type.
    pub fn with_link_type(mut self, name: impl Into<String>, link_type: LinkType) -> Self {
        self.link_libraries.push(LinkLibrary::new(name, link_type));
        self
    }

    /// Set the link language (`None` means the link language is unknown).
    pub fn with_linker_language(mut self, language: Option<Language>) -> Self {
        self.linker_language = language;
        self
    }

    /// Set the output directory override.
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Look up a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Look up a property and interpret it as a boolean.
    pub fn property_as_bool(&self, key: &str) -> bool {
        self.property(key).is_some_and(is_on)
    }

    /// Whether an install rule has been declared for this target.
    pub fn has_install_rule(&self) -> bool {
        self.has_install_rule.get()
    }

    /// Record that an install rule exists. There is no way to clear it.
    pub fn mark_install_rule(&self) {
        self.has_install_rule.set(true);
    }
}

/// Boolean interpretation of a property value.
///
/// Only `1`, `ON`, `YES`, `TRUE` and `Y` (any case) are true.
pub fn is_on(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "1" | "ON" | "YES" | "TRUE" | "Y"
    )
}
