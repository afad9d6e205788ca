//! Install rule synthesis.
//!
//! For every installed target this module produces a script fragment that
//! copies the right build-tree artifact to its destination and then patches
//! it for the install tree:
//! - `names` and `reference` resolve per-configuration artifact names
//! - `target` orchestrates one target
//! - `remap`, `post` emit the platform post-processing rules
//! - `script` and `emitter` render the structured statements

pub mod context;
pub mod emitter;
pub mod error;
pub mod names;
pub mod post;
pub mod reference;
pub mod remap;
pub mod script;
pub mod target;

pub use context::InstallContext;
pub use emitter::{FileInstallEmitter, InstallRule, InstallRuleEmitter, InstallType};
pub use error::GenerateError;
pub use names::{install_filename, NameRole};
pub use reference::{script_reference, Generation, Place, ScriptReference};
pub use remap::{plan_remap, RemapPlan};
pub use script::{render, ScriptWriter, Statement};
pub use target::InstallTargetGenerator;
