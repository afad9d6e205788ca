//! Test fixtures for common test scenarios.
//!
//! This module provides pre-built projects and manifest generators for
//! the install generation tests.

use std::path::{Path, PathBuf};

use crate::core::manifest::MANIFEST_NAME;
use crate::core::platform::Os;
use crate::core::project::Project;
use crate::core::target::Target;

/// Binary directory used by every in-memory fixture project.
pub const FIXTURE_BINARY_DIR: &str = "/work/build";

/// A finalized single-configuration project holding `targets`.
pub fn project_with(os: Os, targets: Vec<Target>) -> Project {
    let mut project = Project::new("demo", FIXTURE_BINARY_DIR, os);
    for target in targets {
        project.add_target(target);
    }
    project.finalize();
    project
}

/// A finalized multi-configuration project holding `targets`.
pub fn multi_config_project_with(os: Os, configurations: &[&str], targets: Vec<Target>) -> Project {
    let mut project = Project::new("demo", FIXTURE_BINARY_DIR, os);
    for target in targets {
        project.add_target(target);
    }
    project.set_configurations(configurations.iter().map(|c| c.to_string()).collect());
    project.finalize();
    project
}

/// Fixture for a Berth.toml manifest on disk.
#[derive(Debug, Clone)]
pub struct ManifestFixture {
    /// Project name.
    pub name: String,
    /// Target platform.
    pub os: Os,
    /// Extra `[project]` lines.
    pub project_lines: Vec<String>,
    /// Remaining manifest content (targets, installs, tools).
    pub body: String,
}

impl ManifestFixture {
    /// Create a manifest fixture with no targets.
    pub fn new(name: impl Into<String>, os: Os) -> Self {
        ManifestFixture {
            name: name.into(),
            os,
            project_lines: Vec::new(),
            body: String::new(),
        }
    }

    /// A shared library installed to `lib` with a versioned soname.
    pub fn shared_library(os: Os) -> Self {
        Self::new("demo", os).with_body(
            r#"
[targets.core]
kind = "sharedlib"

[targets.core.properties]
VERSION = "2.1"
SOVERSION = "2"

[[install]]
target = "core"
destination = "lib"
"#,
        )
    }

    /// Add a line to the `[project]` section.
    pub fn with_project_line(mut self, line: impl Into<String>) -> Self {
        self.project_lines.push(line.into());
        self
    }

    /// Append manifest content after the `[platform]` section.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body.push_str(body);
        self
    }

    /// Render the manifest text.
    pub fn manifest(&self) -> String {
        let mut out = format!("[project]\nname = \"{}\"\n", self.name);
        for line in &self.project_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("\n[platform]\nos = \"{}\"\n", self.os));
        out.push_str(&self.body);
        out
    }

    /// Write the manifest into `dir`, returning its path.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        let path = dir.join(MANIFEST_NAME);
        std::fs::write(&path, self.manifest()).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::Manifest;
    use crate::core::model::BuildModel;

    #[test]
    fn test_fixture_projects_are_finalized() {
        let project = project_with(Os::Linux, vec![Target::exe("app")]);
        assert!(project.is_finalized());
        assert_eq!(project.configuration_types(), Some(&[][..]));

        let project = multi_config_project_with(Os::Linux, &["Debug"], vec![]);
        assert_eq!(project.configuration_types().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_manifest_fixture_parses() {
        let fixture = ManifestFixture::shared_library(Os::MacOs)
            .with_project_line("build_type = \"Release\"");
        let manifest = Manifest::parse(&fixture.manifest()).unwrap();

        assert_eq!(manifest.project.build_type.as_deref(), Some("Release"));
        assert_eq!(manifest.platform.os, Some(Os::MacOs));
        assert_eq!(manifest.install.len(), 1);
    }
}
