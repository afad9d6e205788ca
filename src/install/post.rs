//! Post-install processing of copied binaries: archive indexing and
//! stripping.

use crate::install::context::InstallContext;
use crate::install::emitter::InstallType;
use crate::install::script::{script_path, ProcessCommand, Statement};

/// Runtime variable requesting symbol stripping.
pub const CMAKE_INSTALL_DO_STRIP: &str = "CMAKE_INSTALL_DO_STRIP";

/// Regenerate the symbol index of an installed static archive.
///
/// Only Apple archives need it, and only when ranlib is configured.
pub fn ranlib_rule(
    ctx: &InstallContext,
    install_type: InstallType,
    quoted_destination: &str,
) -> Option<Statement> {
    if install_type != InstallType::StaticLibrary || !ctx.apple {
        return None;
    }

    let Some(ranlib) = ctx.ranlib_path() else {
        tracing::debug!("ranlib not configured, archive index left as installed");
        return None;
    };

    Some(Statement::Execute(
        ProcessCommand::new(script_path(ranlib)).arg(quoted_destination),
    ))
}

/// Strip the installed file when stripping is requested at install time.
///
/// Static libraries keep their symbol table and Apple bundles are left
/// untouched. Optional installs are only stripped if the file exists.
pub fn strip_rule(
    ctx: &InstallContext,
    install_type: InstallType,
    bundle: bool,
    quoted_destination: &str,
    optional: bool,
) -> Option<Statement> {
    if install_type == InstallType::StaticLibrary || bundle {
        return None;
    }

    let strip = ctx.strip_path()?;

    let condition = if optional {
        format!("{CMAKE_INSTALL_DO_STRIP} AND EXISTS {quoted_destination}")
    } else {
        CMAKE_INSTALL_DO_STRIP.to_string()
    };

    Some(Statement::if_block(
        condition,
        vec![Statement::Execute(
            ProcessCommand::new(script_path(strip)).arg(quoted_destination),
        )],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Os;
    use crate::install::script::render;

    const DEST: &str = "\"$ENV{DESTDIR}/usr/lib/libutil.a\"";

    #[test]
    fn test_ranlib_only_for_apple_static_libraries() {
        let mac = InstallContext::for_os(Os::MacOs).with_ranlib("/usr/bin/ranlib");

        let rule = ranlib_rule(&mac, InstallType::StaticLibrary, DEST).unwrap();
        assert_eq!(
            render(&[rule]),
            "EXECUTE_PROCESS(COMMAND \"/usr/bin/ranlib\" \"$ENV{DESTDIR}/usr/lib/libutil.a\" )\n"
        );

        assert!(ranlib_rule(&mac, InstallType::SharedLibrary, DEST).is_none());

        let linux = InstallContext::for_os(Os::Linux).with_ranlib("/usr/bin/ranlib");
        assert!(ranlib_rule(&linux, InstallType::StaticLibrary, DEST).is_none());

        let no_tool = InstallContext::for_os(Os::MacOs);
        assert!(ranlib_rule(&no_tool, InstallType::StaticLibrary, DEST).is_none());
    }

    #[test]
    fn test_strip_rule() {
        let ctx = InstallContext::for_os(Os::Linux).with_strip("/usr/bin/strip");
        let dest = "\"$ENV{DESTDIR}/usr/bin/app\"";

        let rule = strip_rule(&ctx, InstallType::Executable, false, dest, false).unwrap();
        assert_eq!(
            render(&[rule]),
            "IF(CMAKE_INSTALL_DO_STRIP)\n  \
             EXECUTE_PROCESS(COMMAND \"/usr/bin/strip\" \"$ENV{DESTDIR}/usr/bin/app\" )\n\
             ENDIF(CMAKE_INSTALL_DO_STRIP)\n"
        );
    }

    #[test]
    fn test_optional_strip_checks_existence() {
        let ctx = InstallContext::for_os(Os::Linux).with_strip("/usr/bin/strip");
        let dest = "\"$ENV{DESTDIR}/usr/lib/libcore.so\"";

        let Some(Statement::If { condition, .. }) =
            strip_rule(&ctx, InstallType::SharedLibrary, false, dest, true)
        else {
            panic!("expected a conditional strip");
        };
        assert_eq!(
            condition,
            "CMAKE_INSTALL_DO_STRIP AND EXISTS \"$ENV{DESTDIR}/usr/lib/libcore.so\""
        );
    }

    #[test]
    fn test_strip_skipped() {
        let ctx = InstallContext::for_os(Os::MacOs).with_strip("/usr/bin/strip");

        assert!(strip_rule(&ctx, InstallType::StaticLibrary, false, DEST, false).is_none());
        assert!(strip_rule(&ctx, InstallType::Directory, true, DEST, false).is_none());

        let no_tool = InstallContext::for_os(Os::Linux);
        assert!(strip_rule(&no_tool, InstallType::Executable, false, DEST, false).is_none());
    }
}
