//! The build model seen by install generation.
//!
//! Install rules are synthesized against the [`BuildModel`] trait rather than
//! a concrete project so the target graph, its directory layout and its
//! naming conventions stay owned by whoever computed them.

use serde::Serialize;

use crate::core::platform::Os;
use crate::core::target::{Target, TargetKind};

/// File names a target produces for one configuration.
///
/// Names that do not apply on the platform are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactNames {
    /// Canonical name, without version suffixes
    pub name: String,
    /// Name recorded as the library's identity (soname)
    pub so_name: String,
    /// Real file name, with version suffixes
    pub real_name: String,
    /// Import library name
    pub import_name: String,
}

impl ArtifactNames {
    /// Compute the names a target produces on `os` for `config`.
    ///
    /// Honors the `OUTPUT_NAME`, `PREFIX`, `SUFFIX`, `<CONFIG>_POSTFIX`,
    /// `VERSION` and `SOVERSION` properties.
    pub fn compute(target: &Target, os: Os, config: Option<&str>) -> Self {
        let kind = target.kind;
        let base = target.property("OUTPUT_NAME").unwrap_or(target.name.as_str());
        let postfix = config
            .and_then(|c| target.property(&format!("{}_POSTFIX", c.to_ascii_uppercase())))
            .unwrap_or("");
        let prefix = target.property("PREFIX").unwrap_or(os.prefix(kind));
        let suffix = target.property("SUFFIX").unwrap_or(os.suffix(kind));

        let name = format!("{prefix}{base}{postfix}{suffix}");

        let import_name = if os.has_import_libraries() && kind.has_import_library() {
            format!("{base}{postfix}.lib")
        } else {
            String::new()
        };

        let (so_name, real_name) = match kind {
            TargetKind::Exe => {
                let real = match target.property("VERSION") {
                    Some(version) if os.executable_versioning() => format!("{name}-{version}"),
                    _ => name.clone(),
                };
                (name.clone(), real)
            }
            TargetKind::SharedLib if os.soname_flag().is_some() => {
                let version = target.property("VERSION");
                let soversion = target.property("SOVERSION");
                match (version.or(soversion), soversion.or(version)) {
                    (Some(version), Some(soversion)) if os.is_apple() => (
                        format!("{prefix}{base}{postfix}.{soversion}{suffix}"),
                        format!("{prefix}{base}{postfix}.{version}{suffix}"),
                    ),
                    (Some(version), Some(soversion)) => {
                        (format!("{name}.{soversion}"), format!("{name}.{version}"))
                    }
                    _ => (name.clone(), name.clone()),
                }
            }
            _ => (name.clone(), name.clone()),
        };

        ArtifactNames {
            name,
            so_name,
            real_name,
            import_name,
        }
    }
}

/// Read-only view of the build model consumed by install generation.
pub trait BuildModel {
    /// Configuration types of a multi-configuration build tree (empty for a
    /// single-configuration tree), or `None` while they are not yet known.
    fn configuration_types(&self) -> Option<&[String]>;

    /// Whether the build-tree layout of `target` has been finalized.
    fn is_layout_final(&self, target: &Target) -> bool;

    /// Look up a target by name.
    fn find_target(&self, name: &str) -> Option<&Target>;

    /// File names `target` produces for `config`.
    fn artifact_names(&self, target: &Target, config: Option<&str>) -> ArtifactNames;

    /// Build-tree directory holding the target's artifact (no trailing slash).
    fn output_directory(&self, target: &Target, implib: bool) -> String;

    /// Staging directory for binaries relinked for installation (no trailing slash).
    fn relink_directory(&self, target: &Target) -> String;

    /// Per-configuration subdirectory prefix, including the trailing slash.
    fn config_directory(&self, config: &str) -> String;

    /// Directory part of the install name a shared library carries in the
    /// build tree, with a trailing slash, or empty.
    fn install_name_dir_for_build_tree(&self, target: &Target, config: Option<&str>) -> String;

    /// Directory part of the install name a shared library carries once
    /// installed, with a trailing slash, or empty.
    fn install_name_dir_for_install_tree(&self, target: &Target, config: Option<&str>) -> String;

    /// The soname flag of the target's link language, if it has one.
    fn soname_flag(&self, target: &Target) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_library_names_linux() {
        let target = Target::sharedlib("core")
            .with_property("VERSION", "2.1")
            .with_property("SOVERSION", "2");
        let names = ArtifactNames::compute(&target, Os::Linux, None);

        assert_eq!(names.name, "libcore.so");
        assert_eq!(names.so_name, "libcore.so.2");
        assert_eq!(names.real_name, "libcore.so.2.1");
        assert_eq!(names.import_name, "");
    }

    #[test]
    fn test_shared_library_names_macos() {
        let target = Target::sharedlib("core").with_property("VERSION", "3.0");
        let names = ArtifactNames::compute(&target, Os::MacOs, None);

        assert_eq!(names.name, "libcore.dylib");
        assert_eq!(names.so_name, "libcore.3.0.dylib");
        assert_eq!(names.real_name, "libcore.3.0.dylib");
    }

    #[test]
    fn test_unversioned_shared_library() {
        let target = Target::sharedlib("core");
        let names = ArtifactNames::compute(&target, Os::Linux, None);

        assert_eq!(names.so_name, "libcore.so");
        assert_eq!(names.real_name, "libcore.so");
    }

    #[test]
    fn test_windows_import_library() {
        let target = Target::sharedlib("core").with_property("VERSION", "1.0");
        let names = ArtifactNames::compute(&target, Os::Windows, Some("Debug"));

        assert_eq!(names.name, "core.dll");
        assert_eq!(names.so_name, "core.dll");
        assert_eq!(names.import_name, "core.lib");

        let app = Target::exe("app").with_property("VERSION", "1.0");
        let names = ArtifactNames::compute(&app, Os::Windows, None);
        assert_eq!(names.name, "app.exe");
        assert_eq!(names.real_name, "app.exe");
        assert_eq!(names.import_name, "app.lib");
    }

    #[test]
    fn test_config_postfix_and_overrides() {
        let target = Target::staticlib("util")
            .with_property("DEBUG_POSTFIX", "_d")
            .with_property("OUTPUT_NAME", "myutil");

        assert_eq!(
            ArtifactNames::compute(&target, Os::Linux, Some("Debug")).name,
            "libmyutil_d.a"
        );
        assert_eq!(
            ArtifactNames::compute(&target, Os::Linux, Some("Release")).name,
            "libmyutil.a"
        );

        let plugin = Target::module("codec")
            .with_property("PREFIX", "")
            .with_property("SUFFIX", ".bundle");
        assert_eq!(
            ArtifactNames::compute(&plugin, Os::MacOs, None).name,
            "codec.bundle"
        );
    }

    #[test]
    fn test_executable_real_name() {
        let app = Target::exe("app").with_property("VERSION", "1.4");
        let names = ArtifactNames::compute(&app, Os::Linux, None);

        assert_eq!(names.name, "app");
        assert_eq!(names.real_name, "app-1.4");
        assert_eq!(names.import_name, "");
    }
}
