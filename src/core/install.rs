//! Install declarations.

use serde::{Deserialize, Serialize};

/// Component used when an install declaration does not name one.
pub const DEFAULT_COMPONENT: &str = "Unspecified";

/// Permission keywords accepted by the install primitive.
pub const PERMISSIONS: &[&str] = &[
    "OWNER_READ",
    "OWNER_WRITE",
    "OWNER_EXECUTE",
    "GROUP_READ",
    "GROUP_WRITE",
    "GROUP_EXECUTE",
    "WORLD_READ",
    "WORLD_WRITE",
    "WORLD_EXECUTE",
    "SETUID",
    "SETGID",
];

/// How one target is installed. Immutable once declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSpec {
    /// Name of the installed target
    pub target: String,

    /// Install-tree destination directory
    pub destination: String,

    /// Install the import library instead of the main artifact
    #[serde(default)]
    pub implib: bool,

    /// Space-separated permission keywords, empty for the default
    #[serde(default)]
    pub file_permissions: String,

    /// Configurations the rule applies to (empty means all)
    #[serde(default)]
    pub configurations: Vec<String>,

    /// Component the rule belongs to
    pub component: String,

    /// Tolerate a missing artifact at install time
    #[serde(default)]
    pub optional: bool,
}

impl InstallSpec {
    /// Declare an install of `target` into `destination`.
    pub fn new(target: impl Into<String>, destination: impl Into<String>) -> Self {
        InstallSpec {
            target: target.into(),
            destination: destination.into(),
            implib: false,
            file_permissions: String::new(),
            configurations: Vec::new(),
            component: DEFAULT_COMPONENT.to_string(),
            optional: false,
        }
    }

    /// Install the import library rather than the artifact itself.
    pub fn import_library(mut self) -> Self {
        self.implib = true;
        self
    }

    /// Set the permission keywords.
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.file_permissions = permissions
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self
    }

    /// Restrict the rule to the given configurations.
    pub fn with_configurations(
        mut self,
        configurations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.configurations = configurations.into_iter().map(Into::into).collect();
        self
    }

    /// Set the component.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    /// Mark the rule optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Check if a permission keyword is known.
    pub fn is_valid_permission(permission: &str) -> bool {
        PERMISSIONS.contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_spec_builder() {
        let spec = InstallSpec::new("core", "/usr/lib")
            .with_permissions(["OWNER_READ", "OWNER_WRITE"])
            .with_configurations(["Release"])
            .with_component("runtime")
            .optional();

        assert_eq!(spec.file_permissions, "OWNER_READ OWNER_WRITE");
        assert_eq!(spec.configurations, vec!["Release".to_string()]);
        assert_eq!(spec.component, "runtime");
        assert!(spec.optional);
        assert!(!spec.implib);
    }

    #[test]
    fn test_default_component() {
        let spec = InstallSpec::new("core", "lib");
        assert_eq!(spec.component, DEFAULT_COMPONENT);
    }

    #[test]
    fn test_permission_keywords() {
        assert!(InstallSpec::is_valid_permission("WORLD_EXECUTE"));
        assert!(!InstallSpec::is_valid_permission("world_execute"));
        assert!(!InstallSpec::is_valid_permission("0755"));
    }
}
