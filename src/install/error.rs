//! Install generation errors.

use thiserror::Error;

/// Invariant violations that abort generation for one target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("configuration types are not known yet\n\
             help: finalize the project before generating install rules")]
    ConfigurationsUnknown,

    #[error("build-tree layout of target `{target}` is not final\n\
             help: finalize the project before generating install rules")]
    LayoutNotFinalized { target: String },
}
