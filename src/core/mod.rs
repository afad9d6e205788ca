//! Core data structures for Berth.
//!
//! This module contains the build model install generation reads:
//! - Targets and their link dependencies
//! - Platform naming conventions
//! - Install declarations
//! - Manifests and the project built from them

pub mod install;
pub mod manifest;
pub mod model;
pub mod platform;
pub mod project;
pub mod target;

pub use install::InstallSpec;
pub use manifest::{Manifest, ManifestError, MANIFEST_NAME};
pub use model::{ArtifactNames, BuildModel};
pub use platform::Os;
pub use project::Project;
pub use target::{LinkType, Target, TargetKind};
