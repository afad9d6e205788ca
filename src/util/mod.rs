//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod tools;

pub use config::ToolPaths;
pub use context::GlobalContext;
