//! Implementation of `berth names`.

use anyhow::{bail, Result};

use crate::core::model::{ArtifactNames, BuildModel};
use crate::core::project::Project;
use crate::install::names::{install_filename, NameRole};

/// Resolve the file name an install rule would use for `target`.
///
/// An empty result means the name does not apply on the project's platform.
pub fn resolve_name(
    project: &Project,
    target: &str,
    config: Option<&str>,
    role: NameRole,
) -> Result<String> {
    let Some(found) = project.target(target) else {
        let available: Vec<_> = project.targets().map(|t| t.name.as_str()).collect();
        bail!(
            "unknown target `{}`\n\
             available targets: {}",
            target,
            if available.is_empty() {
                "(none)".to_string()
            } else {
                available.join(", ")
            }
        );
    };

    Ok(install_filename(project, found, config, role))
}

/// Every name `target` produces for `config`.
pub fn artifact_names(project: &Project, target: &str, config: Option<&str>) -> Result<ArtifactNames> {
    match project.target(target) {
        Some(found) => Ok(project.artifact_names(found, config)),
        None => bail!("unknown target `{}`", target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Os;
    use crate::core::target::Target;
    use crate::test_support::fixtures::project_with;

    #[test]
    fn test_resolve_name() {
        let project = project_with(
            Os::Linux,
            vec![Target::sharedlib("core").with_property("SOVERSION", "1")],
        );

        assert_eq!(
            resolve_name(&project, "core", None, NameRole::Soname).unwrap(),
            "libcore.so.1"
        );
        assert_eq!(
            resolve_name(&project, "core", None, NameRole::ImportLibrary).unwrap(),
            ""
        );
    }

    #[test]
    fn test_unknown_target_lists_available() {
        let project = project_with(Os::Linux, vec![Target::exe("app"), Target::staticlib("util")]);

        let err = resolve_name(&project, "nope", None, NameRole::Canonical).unwrap_err();
        assert!(err.to_string().contains("available targets: app, util"));

        assert!(artifact_names(&project, "nope", None).is_err());
        assert_eq!(artifact_names(&project, "util", None).unwrap().name, "libutil.a");
    }
}
