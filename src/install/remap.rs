//! Install name rewriting for Apple binaries.
//!
//! A Mach-O binary records the install names of the shared libraries it
//! links, and a shared library records its own. When the build tree and the
//! install tree use different directories, the installed copies are patched
//! with `install_name_tool`.

use std::path::Path;

use indexmap::IndexMap;

use crate::core::model::BuildModel;
use crate::core::target::{LinkType, Target, TargetKind};
use crate::install::context::InstallContext;
use crate::install::names::NameRole;
use crate::install::reference::{script_reference, Generation, Place};
use crate::install::script::{quoted, script_path, ProcessCommand, Statement};

/// The rewrites one installed binary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapPlan {
    /// Variable definitions the references below rely on
    pub definitions: Vec<Statement>,

    /// New identity of an installed shared library
    pub new_id: Option<String>,

    /// Build-tree install name to install-tree install name, in link order
    pub changes: Vec<(String, String)>,

    /// Reference to the installed file name
    pub installed_reference: String,
}

/// Compute the install name rewrites for `target`.
///
/// Returns `None` when every directory pair coincides.
pub fn plan_remap<M: BuildModel + ?Sized>(
    model: &M,
    generation: Generation<'_>,
    target: &Target,
    implib: bool,
) -> Option<RemapPlan> {
    let config = generation.config;
    let active = LinkType::for_config(config);

    let mut definitions = Vec::new();
    let mut changes: IndexMap<String, String> = IndexMap::new();

    for link in &target.link_libraries {
        if !link.link_type.applies_to(active) {
            continue;
        }
        if target.kind != TargetKind::Exe && link.name == target.name {
            continue;
        }

        let Some(dependency) = model.find_target(&link.name) else {
            tracing::debug!(
                "`{}` links `{}`, which is not a target; no install name to remap",
                target.name,
                link.name
            );
            continue;
        };
        if dependency.kind != TargetKind::SharedLib {
            continue;
        }

        let for_build = model.install_name_dir_for_build_tree(dependency, config);
        let for_install = model.install_name_dir_for_install_tree(dependency, config);
        if for_build == for_install {
            continue;
        }

        let from = script_reference(
            model,
            generation,
            dependency,
            Place::RemapFrom,
            !for_build.is_empty(),
            NameRole::Soname,
        );
        let to = script_reference(
            model,
            generation,
            dependency,
            Place::RemapTo,
            false,
            NameRole::Soname,
        );

        extend_unique(&mut definitions, from.definitions);
        extend_unique(&mut definitions, to.definitions);
        changes.insert(
            format!("{for_build}{}", from.reference),
            format!("{for_install}{}", to.reference),
        );
    }

    let remapped = script_reference(
        model,
        generation,
        target,
        Place::Remapped,
        false,
        NameRole::select(implib, true),
    );

    let new_id = if target.kind == TargetKind::SharedLib {
        let for_build = model.install_name_dir_for_build_tree(target, config);
        let for_install = model.install_name_dir_for_install_tree(target, config);
        (for_build != for_install).then(|| format!("{for_install}{}", remapped.reference))
    } else {
        None
    };

    if new_id.is_none() && changes.is_empty() {
        return None;
    }

    extend_unique(&mut definitions, remapped.definitions);
    Some(RemapPlan {
        definitions,
        new_id,
        changes: changes.into_iter().collect(),
        installed_reference: remapped.reference,
    })
}

/// Render a plan as one component-gated `install_name_tool` invocation.
pub fn remap_statements(
    plan: RemapPlan,
    tool: &Path,
    destination: &str,
    component: &str,
) -> Vec<Statement> {
    let mut command = ProcessCommand::new(script_path(tool)).one_per_line();
    if let Some(new_id) = &plan.new_id {
        command = command.arg(format!("-id {}", quoted(new_id)));
    }
    for (from, to) in &plan.changes {
        command = command.arg(format!("-change {} {}", quoted(from), quoted(to)));
    }
    command = command.arg(quoted(&format!(
        "$ENV{{DESTDIR}}{destination}/{}",
        plan.installed_reference
    )));

    let mut statements = plan.definitions;
    statements.push(Statement::if_block(
        component_test(component),
        vec![Statement::Execute(command)],
    ));
    statements
}

/// Patch install names of `target` once installed to `destination`.
///
/// Emits nothing when no install name tool is configured.
pub fn install_name_patch<M: BuildModel + ?Sized>(
    model: &M,
    generation: Generation<'_>,
    ctx: &InstallContext,
    target: &Target,
    implib: bool,
    destination: &str,
    component: &str,
) -> Vec<Statement> {
    let Some(tool) = ctx.install_name_tool_path() else {
        return Vec::new();
    };

    match plan_remap(model, generation, target, implib) {
        Some(plan) => remap_statements(plan, tool, destination, component),
        None => Vec::new(),
    }
}

/// Condition selecting `component` (or every component when none is requested).
pub fn component_test(component: &str) -> String {
    format!(
        "NOT CMAKE_INSTALL_COMPONENT OR \"${{CMAKE_INSTALL_COMPONENT}}\" MATCHES \"^({component})$\""
    )
}

fn extend_unique(into: &mut Vec<Statement>, statements: Vec<Statement>) {
    for statement in statements {
        if !into.contains(&statement) {
            into.push(statement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Os;
    use crate::install::script::render;
    use crate::test_support::fixtures::{multi_config_project_with, project_with};

    fn single(config: Option<&str>) -> Generation<'_> {
        Generation {
            config,
            configurations: &[],
        }
    }

    fn mac_targets() -> Vec<Target> {
        vec![
            Target::sharedlib("core").with_property("INSTALL_NAME_DIR", "/usr/lib"),
            Target::sharedlib("local"),
            Target::exe("app").with_link("core").with_link("m"),
        ]
    }

    #[test]
    fn test_executable_dependency_changes() {
        let project = project_with(Os::MacOs, mac_targets());
        let app = project.target("app").unwrap();

        let plan = plan_remap(&project, single(Some("Release")), app, false).unwrap();
        assert_eq!(plan.new_id, None);
        assert_eq!(
            plan.changes,
            vec![(
                "/work/build/libcore.dylib".to_string(),
                "/usr/lib/libcore.dylib".to_string()
            )]
        );
        assert!(plan.definitions.is_empty());

        let text = render(&remap_statements(
            plan,
            Path::new("/usr/bin/install_name_tool"),
            "/usr/bin",
            "Unspecified",
        ));
        assert_eq!(
            text,
            "IF(NOT CMAKE_INSTALL_COMPONENT OR \"${CMAKE_INSTALL_COMPONENT}\" MATCHES \"^(Unspecified)$\")\n  \
             EXECUTE_PROCESS(COMMAND \"/usr/bin/install_name_tool\"\n    \
             -change \"/work/build/libcore.dylib\" \"/usr/lib/libcore.dylib\"\n    \
             \"$ENV{DESTDIR}/usr/bin/app\")\n\
             ENDIF(NOT CMAKE_INSTALL_COMPONENT OR \"${CMAKE_INSTALL_COMPONENT}\" MATCHES \"^(Unspecified)$\")\n"
        );
    }

    #[test]
    fn test_shared_library_new_id() {
        let project = project_with(Os::MacOs, mac_targets());
        let core = project.target("core").unwrap();

        let plan = plan_remap(&project, single(None), core, false).unwrap();
        assert_eq!(plan.new_id.as_deref(), Some("/usr/lib/libcore.dylib"));
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn test_nothing_when_directories_coincide() {
        let project = project_with(
            Os::MacOs,
            vec![
                Target::sharedlib("core").with_property("SKIP_BUILD_RPATH", "ON"),
                Target::exe("app").with_link("core"),
            ],
        );

        for name in ["core", "app"] {
            let target = project.target(name).unwrap();
            assert!(plan_remap(&project, single(None), target, false).is_none());
        }
    }

    #[test]
    fn test_link_type_filtering() {
        let project = project_with(
            Os::MacOs,
            vec![
                Target::sharedlib("dbg").with_property("INSTALL_NAME_DIR", "/usr/lib"),
                Target::sharedlib("opt").with_property("INSTALL_NAME_DIR", "/usr/lib"),
                Target::exe("app")
                    .with_link_type("dbg", LinkType::Debug)
                    .with_link_type("opt", LinkType::Optimized),
            ],
        );
        let app = project.target("app").unwrap();

        let debug = plan_remap(&project, single(Some("debug")), app, false).unwrap();
        assert_eq!(debug.changes.len(), 1);
        assert!(debug.changes[0].0.ends_with("libdbg.dylib"));

        let release = plan_remap(&project, single(Some("Release")), app, false).unwrap();
        assert_eq!(release.changes.len(), 1);
        assert!(release.changes[0].0.ends_with("libopt.dylib"));
    }

    #[test]
    fn test_library_ignores_self_reference() {
        let project = project_with(
            Os::MacOs,
            vec![Target::sharedlib("core")
                .with_property("INSTALL_NAME_DIR", "/usr/lib")
                .with_link("core")],
        );
        let core = project.target("core").unwrap();

        let plan = plan_remap(&project, single(None), core, false).unwrap();
        assert!(plan.changes.is_empty());
        assert!(plan.new_id.is_some());
    }

    #[test]
    fn test_duplicate_dependency_keeps_first_position() {
        let project = project_with(
            Os::MacOs,
            vec![
                Target::sharedlib("core").with_property("INSTALL_NAME_DIR", "/usr/lib"),
                Target::sharedlib("extra").with_property("INSTALL_NAME_DIR", "/opt/lib"),
                Target::exe("app")
                    .with_link("core")
                    .with_link("extra")
                    .with_link_type("core", LinkType::Optimized),
            ],
        );
        let app = project.target("app").unwrap();

        let plan = plan_remap(&project, single(None), app, false).unwrap();
        let froms: Vec<_> = plan.changes.iter().map(|(from, _)| from.as_str()).collect();
        assert_eq!(
            froms,
            vec!["/work/build/libcore.dylib", "/work/build/libextra.dylib"]
        );
    }

    #[test]
    fn test_duplicate_install_name_last_write_wins() {
        let project = project_with(
            Os::MacOs,
            vec![
                Target::sharedlib("first")
                    .with_property("OUTPUT_NAME", "shared")
                    .with_property("INSTALL_NAME_DIR", "/usr/lib"),
                Target::sharedlib("other").with_property("INSTALL_NAME_DIR", "/usr/lib"),
                Target::sharedlib("second")
                    .with_property("OUTPUT_NAME", "shared")
                    .with_property("INSTALL_NAME_DIR", "/opt/lib"),
                Target::exe("app")
                    .with_link("first")
                    .with_link("other")
                    .with_link("second"),
            ],
        );
        let app = project.target("app").unwrap();

        let plan = plan_remap(&project, single(None), app, false).unwrap();
        assert_eq!(
            plan.changes,
            vec![
                (
                    "/work/build/libshared.dylib".to_string(),
                    "/opt/lib/libshared.dylib".to_string()
                ),
                (
                    "/work/build/libother.dylib".to_string(),
                    "/usr/lib/libother.dylib".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_multi_config_definitions() {
        let project = multi_config_project_with(
            Os::MacOs,
            &["Debug", "Release"],
            vec![
                Target::sharedlib("core").with_property("INSTALL_NAME_DIR", "/usr/lib"),
                Target::exe("app").with_link("core"),
            ],
        );
        let app = project.target("app").unwrap();
        let configurations = vec!["Debug".to_string(), "Release".to_string()];
        let generation = Generation {
            config: None,
            configurations: &configurations,
        };

        let plan = plan_remap(&project, generation, app, false).unwrap();
        assert_eq!(
            plan.definitions,
            vec![
                Statement::set("core_REMAP_FROM_NAME_Debug", "Debug/libcore.dylib"),
                Statement::set("core_REMAP_FROM_NAME_Release", "Release/libcore.dylib"),
                Statement::set("core_REMAP_TO_NAME_Debug", "libcore.dylib"),
                Statement::set("core_REMAP_TO_NAME_Release", "libcore.dylib"),
                Statement::set("app_REMAPPED_NAME_Debug", "app"),
                Statement::set("app_REMAPPED_NAME_Release", "app"),
            ]
        );
        assert_eq!(
            plan.changes[0],
            (
                "/work/build/${core_REMAP_FROM_NAME_${CMAKE_INSTALL_CONFIG_NAME}}".to_string(),
                "/usr/lib/${core_REMAP_TO_NAME_${CMAKE_INSTALL_CONFIG_NAME}}".to_string()
            )
        );
        assert_eq!(
            plan.installed_reference,
            "${app_REMAPPED_NAME_${CMAKE_INSTALL_CONFIG_NAME}}"
        );
    }

    #[test]
    fn test_no_tool_no_patch() {
        let project = project_with(Os::MacOs, mac_targets());
        let app = project.target("app").unwrap();
        let ctx = InstallContext::for_os(Os::MacOs);

        let statements =
            install_name_patch(&project, single(None), &ctx, app, false, "/usr/bin", "Unspecified");
        assert!(statements.is_empty());
    }
}
