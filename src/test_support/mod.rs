//! Test utilities for Berth unit tests.
//!
//! Fixtures build finalized in-memory projects and on-disk manifests so
//! generator tests can focus on the emitted statements.
//!
//! # Example
//!
//! ```rust,ignore
//! use berth::test_support::project_with;
//!
//! #[test]
//! fn test_example() {
//!     let project = project_with(Os::Linux, vec![Target::exe("app")]);
//!     // Generate against `project`...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
