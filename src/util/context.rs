//! Global context for Berth operations.
//!
//! Provides centralized access to the working directory and the manifest
//! lookup shared by every command.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::MANIFEST_NAME;

/// Global context containing the paths commands resolve against.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext { cwd })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext { cwd }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find Berth.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                bail!(
                    "could not find `{}` in `{}` or any parent directory",
                    MANIFEST_NAME,
                    self.cwd.display()
                );
            }
        }
    }

    /// Resolve an explicit manifest path against cwd, or search for one.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
            Some(path) => Ok(self.cwd.join(path)),
            None => self.find_manifest(),
        }
    }
}
