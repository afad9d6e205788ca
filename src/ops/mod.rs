//! High-level operations.
//!
//! This module contains the implementation of Berth commands.

pub mod install_script;
pub mod names;

pub use install_script::{
    generate, generate_install_script, write_install_script, GenerateOptions, GenerateResult,
    InstallScript,
};
pub use names::{artifact_names, resolve_name};
