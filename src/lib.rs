//! Berth - install script generator for C and C++ build trees
//!
//! This crate provides the core library functionality for Berth: the
//! build model, per-target install rule synthesis and the driver that
//! writes a build tree's install script.

pub mod core;
pub mod install;
pub mod ops;
pub mod util;

/// Test utilities for Berth unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides finalized fixture projects and manifest
/// generators.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{InstallSpec, Manifest, Project, Target};
pub use install::{InstallContext, InstallTargetGenerator, Statement};
pub use util::context::GlobalContext;
