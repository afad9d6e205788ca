//! Artifact file names as seen by install rules.

use serde::Serialize;

use crate::core::model::BuildModel;
use crate::core::target::{Target, TargetKind};

/// Which of a target's names an install rule refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameRole {
    /// Canonical name, without version suffixes
    Canonical,
    /// The name a shared library records as its identity
    Soname,
    /// The companion import library
    ImportLibrary,
}

impl NameRole {
    /// Pick the role by precedence: import library > soname > canonical.
    pub fn select(implib: bool, soname: bool) -> Self {
        if implib {
            NameRole::ImportLibrary
        } else if soname {
            NameRole::Soname
        } else {
            NameRole::Canonical
        }
    }

    pub fn is_import_library(&self) -> bool {
        matches!(self, NameRole::ImportLibrary)
    }
}

/// The file name `target` produces for `config` in the given role.
///
/// Returns an empty string when the role does not apply, e.g. an import
/// library on a platform without them. Executables have no soname and
/// resolve [`NameRole::Soname`] to their canonical name.
pub fn install_filename<M: BuildModel + ?Sized>(
    model: &M,
    target: &Target,
    config: Option<&str>,
    role: NameRole,
) -> String {
    let names = model.artifact_names(target, config);
    match (target.kind, role) {
        (_, NameRole::ImportLibrary) => names.import_name,
        (TargetKind::Exe, _) | (_, NameRole::Canonical) => names.name,
        (_, NameRole::Soname) => names.so_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Os;
    use crate::test_support::fixtures::project_with;

    #[test]
    fn test_role_precedence() {
        assert_eq!(NameRole::select(true, true), NameRole::ImportLibrary);
        assert_eq!(NameRole::select(false, true), NameRole::Soname);
        assert_eq!(NameRole::select(false, false), NameRole::Canonical);
    }

    #[test]
    fn test_library_names_ignore_versioning_when_canonical() {
        let project = project_with(
            Os::Linux,
            vec![Target::sharedlib("core")
                .with_property("VERSION", "2.1")
                .with_property("SOVERSION", "2")],
        );
        let core = project.target("core").unwrap();

        assert_eq!(
            install_filename(&project, core, None, NameRole::Canonical),
            "libcore.so"
        );
        assert_eq!(
            install_filename(&project, core, None, NameRole::Soname),
            "libcore.so.2"
        );
        assert_eq!(install_filename(&project, core, None, NameRole::ImportLibrary), "");
    }

    #[test]
    fn test_executable_names() {
        let project = project_with(Os::Windows, vec![Target::exe("app")]);
        let app = project.target("app").unwrap();

        assert_eq!(install_filename(&project, app, None, NameRole::Canonical), "app.exe");
        assert_eq!(install_filename(&project, app, None, NameRole::Soname), "app.exe");
        assert_eq!(
            install_filename(&project, app, None, NameRole::ImportLibrary),
            "app.lib"
        );

        let project = project_with(Os::Linux, vec![Target::exe("app")]);
        let app = project.target("app").unwrap();
        assert_eq!(install_filename(&project, app, None, NameRole::ImportLibrary), "");
    }

    #[test]
    fn test_names_vary_with_config() {
        let project = project_with(
            Os::Linux,
            vec![Target::staticlib("util").with_property("DEBUG_POSTFIX", "_d")],
        );
        let util = project.target("util").unwrap();

        let debug = install_filename(&project, util, Some("Debug"), NameRole::Canonical);
        let release = install_filename(&project, util, Some("Release"), NameRole::Canonical);
        assert_eq!(debug, "libutil_d.a");
        assert_eq!(release, "libutil.a");

        // Deterministic
        assert_eq!(
            install_filename(&project, util, Some("Debug"), NameRole::Canonical),
            debug
        );
    }
}
