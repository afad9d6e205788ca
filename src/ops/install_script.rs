//! Implementation of `berth generate`.
//!
//! Sequences one [`InstallTargetGenerator`] per install declaration behind a
//! header that defaults the install-time variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::model::BuildModel;
use crate::core::project::Project;
use crate::install::post::CMAKE_INSTALL_DO_STRIP;
use crate::install::reference::CMAKE_INSTALL_CONFIG_NAME;
use crate::install::{render, InstallContext, InstallTargetGenerator, Statement};
use crate::util::fs::write_string;
use crate::util::tools::resolve_tools;

/// File name of the generated script inside the binary directory.
pub const INSTALL_SCRIPT_NAME: &str = "cmake_install.cmake";

/// Configuration installed when none is requested.
pub const DEFAULT_INSTALL_CONFIG: &str = "Release";

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Configuration to generate for (defaults to the project build type)
    pub config: Option<String>,

    /// Output path (defaults to `<binary_dir>/cmake_install.cmake`)
    pub output: Option<PathBuf>,

    /// Return the statements without writing the script
    pub plan: bool,

    /// Strip installed binaries unless overridden at install time
    pub strip: bool,

    /// Search `PATH` for tools that are not configured
    pub detect_tools: bool,
}

/// A generated install script.
#[derive(Debug, Clone, Serialize)]
pub struct InstallScript {
    pub project: String,
    pub config: Option<String>,
    pub context: InstallContext,
    pub statements: Vec<Statement>,

    /// Number of install declarations that produced rules
    #[serde(skip)]
    pub fragments: usize,
}

impl InstallScript {
    /// Render the script text.
    pub fn render(&self) -> String {
        render(&self.statements)
    }

    /// The script as a JSON plan.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize install plan")
    }
}

/// Result of [`generate`].
#[derive(Debug)]
pub struct GenerateResult {
    pub script: InstallScript,

    /// Where the script was written, unless only planned
    pub output_path: Option<PathBuf>,
}

/// Load a project, generate its install script and write it.
pub fn generate(manifest_path: &Path, opts: &GenerateOptions) -> Result<GenerateResult> {
    let project = Project::load(manifest_path)?;
    let root = manifest_path.parent().unwrap_or(Path::new("."));

    let ctx = install_context(&project, root, opts);
    let config = opts.config.as_deref().or(project.build_type());
    let script = generate_install_script(&project, &ctx, config)?;

    let output_path = if opts.plan {
        None
    } else {
        Some(write_install_script(&project, &script, opts.output.as_deref())?)
    };

    Ok(GenerateResult {
        script,
        output_path,
    })
}

/// Assemble the install context for a project from every tool source.
pub fn install_context(project: &Project, root: &Path, opts: &GenerateOptions) -> InstallContext {
    let tools = resolve_tools(project.os(), project.tools(), root, opts.detect_tools);
    InstallContext::for_os(project.os())
        .with_tools(tools.paths())
        .with_strip_requested(opts.strip)
}

/// Generate the install script of every install declaration, in order.
///
/// Each target's fragment is generated completely before it is appended, so
/// a failure leaves no partial fragment behind.
pub fn generate_install_script(
    project: &Project,
    ctx: &InstallContext,
    config: Option<&str>,
) -> Result<InstallScript> {
    let mut statements = script_header(project, config, ctx.strip_requested);
    let mut fragments = 0;

    for spec in project.installs() {
        let target = project
            .target(&spec.target)
            .with_context(|| format!("install rule names unknown target `{}`", spec.target))?;

        let fragment = InstallTargetGenerator::new(target, spec)
            .generate(project, ctx, config)
            .with_context(|| {
                format!("failed to generate install rules for target `{}`", spec.target)
            })?;

        if fragment.is_empty() {
            continue;
        }

        statements.push(Statement::comment(format!(
            "Install {} `{}` to {}",
            if spec.implib { "import library of" } else { "target" },
            spec.target,
            spec.destination
        )));
        statements.extend(fragment);
        fragments += 1;
    }

    tracing::info!(
        "generated install rules for {} of {} declarations in `{}`",
        fragments,
        project.installs().len(),
        project.name()
    );

    Ok(InstallScript {
        project: project.name().to_string(),
        config: config.map(str::to_string),
        context: ctx.clone(),
        statements,
        fragments,
    })
}

/// Statements defaulting the install-time variables.
pub fn script_header(project: &Project, config: Option<&str>, strip_requested: bool) -> Vec<Statement> {
    let default_config = config.unwrap_or(DEFAULT_INSTALL_CONFIG);
    let multi_config = project
        .configuration_types()
        .is_some_and(|types| !types.is_empty());

    let mut statements = vec![
        Statement::comment(format!("Install script for project: {}", project.name())),
        Statement::comment(format!("Binary directory: {}", project.binary_dir_str())),
    ];
    if multi_config {
        statements.push(Statement::comment(
            "Names are selected by CMAKE_INSTALL_CONFIG_NAME at install time",
        ));
    }

    statements.extend([
        Statement::if_block(
            "NOT DEFINED CMAKE_INSTALL_PREFIX",
            vec![Statement::set("CMAKE_INSTALL_PREFIX", project.install_prefix())],
        ),
        Statement::if_block(
            format!("NOT {CMAKE_INSTALL_CONFIG_NAME}"),
            vec![Statement::set(CMAKE_INSTALL_CONFIG_NAME, default_config)],
        ),
        Statement::if_block(
            "NOT CMAKE_INSTALL_COMPONENT",
            vec![Statement::if_block(
                "COMPONENT",
                vec![Statement::set("CMAKE_INSTALL_COMPONENT", "${COMPONENT}")],
            )],
        ),
        Statement::if_block(
            format!("NOT DEFINED {CMAKE_INSTALL_DO_STRIP}"),
            vec![Statement::set(
                CMAKE_INSTALL_DO_STRIP,
                if strip_requested { "1" } else { "0" },
            )],
        ),
    ]);

    statements
}

/// Write the script, by default to `<binary_dir>/cmake_install.cmake`.
pub fn write_install_script(
    project: &Project,
    script: &InstallScript,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => project.binary_dir().join(INSTALL_SCRIPT_NAME),
    };

    write_string(&path, &script.render())?;
    Ok(path)
}
