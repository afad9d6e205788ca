//! Per-configuration name references.
//!
//! A single-configuration tree refers to artifacts by their literal name. A
//! multi-configuration tree defines one variable per configuration and
//! refers to the one selected by `CMAKE_INSTALL_CONFIG_NAME` at install time.

use std::fmt;

use crate::core::model::BuildModel;
use crate::core::target::Target;
use crate::install::names::{install_filename, NameRole};
use crate::install::script::Statement;

/// Runtime variable naming the configuration being installed.
pub const CMAKE_INSTALL_CONFIG_NAME: &str = "CMAKE_INSTALL_CONFIG_NAME";

/// What a reference points at; part of the variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Place {
    /// Build-tree artifact being copied
    Build,
    /// Installed artifact
    Install,
    /// Build-tree install name of a dependency
    RemapFrom,
    /// Install-tree install name of a dependency
    RemapTo,
    /// Installed artifact whose install names are rewritten
    Remapped,
}

impl Place {
    pub fn as_str(&self) -> &'static str {
        match self {
            Place::Build => "BUILD",
            Place::Install => "INSTALL",
            Place::RemapFrom => "REMAP_FROM",
            Place::RemapTo => "REMAP_TO",
            Place::Remapped => "REMAPPED",
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configuration state of one generation pass.
#[derive(Debug, Clone, Copy)]
pub struct Generation<'a> {
    /// Configuration being generated for, if any
    pub config: Option<&'a str>,

    /// Configuration types of the build tree (empty for single-configuration)
    pub configurations: &'a [String],
}

impl Generation<'_> {
    pub fn is_multi_config(&self) -> bool {
        !self.configurations.is_empty()
    }
}

/// Variable definitions plus the reference that uses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReference {
    pub definitions: Vec<Statement>,
    pub reference: String,
}

/// Name of the variable holding `target`'s name for one configuration.
pub fn variable_prefix(target: &Target, place: Place, role: NameRole) -> String {
    let kind = if role.is_import_library() {
        "IMPNAME"
    } else {
        "NAME"
    };
    format!("{}_{}_{}_", target.name, place, kind)
}

/// Build a reference to the install-time value of `target`'s name.
///
/// With `use_config_dir` the per-configuration values are prefixed with
/// the configuration's build subdirectory.
pub fn script_reference<M: BuildModel + ?Sized>(
    model: &M,
    generation: Generation<'_>,
    target: &Target,
    place: Place,
    use_config_dir: bool,
    role: NameRole,
) -> ScriptReference {
    if !generation.is_multi_config() {
        return ScriptReference {
            definitions: Vec::new(),
            reference: install_filename(model, target, generation.config, role),
        };
    }

    let prefix = variable_prefix(target, place, role);
    let definitions = generation
        .configurations
        .iter()
        .map(|config| {
            let mut value = if use_config_dir {
                model.config_directory(config)
            } else {
                String::new()
            };
            value.push_str(&install_filename(model, target, Some(config), role));
            Statement::set(format!("{prefix}{config}"), value)
        })
        .collect();

    ScriptReference {
        definitions,
        reference: format!("${{{prefix}${{{CMAKE_INSTALL_CONFIG_NAME}}}}}"),
    }
}
