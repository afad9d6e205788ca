//! Install rules for one target.
//!
//! [`InstallTargetGenerator`] runs a single pass per target: pick the
//! build-tree file to copy, apply the per-kind adjustments, emit the install
//! primitive and then the post-install rules.

use crate::core::install::InstallSpec;
use crate::core::model::BuildModel;
use crate::core::target::{Target, TargetKind};
use crate::install::context::InstallContext;
use crate::install::emitter::{InstallRule, InstallType};
use crate::install::error::GenerateError;
use crate::install::names::{install_filename, NameRole};
use crate::install::post::{ranlib_rule, strip_rule};
use crate::install::reference::{script_reference, Generation, Place};
use crate::install::remap::install_name_patch;
use crate::install::script::{quoted, Statement};

/// Generates the install script fragment for one target.
#[derive(Debug, Clone, Copy)]
pub struct InstallTargetGenerator<'a> {
    target: &'a Target,
    spec: &'a InstallSpec,
}

/// Adjustments that depend on the kind of target being installed.
#[derive(Debug, Default)]
struct KindRule {
    install_type: Option<InstallType>,
    properties: Vec<String>,
    literal_args: Vec<String>,
    bundle: bool,
}

impl<'a> InstallTargetGenerator<'a> {
    /// Create a generator. Records on the target that it has an install rule.
    pub fn new(target: &'a Target, spec: &'a InstallSpec) -> Self {
        target.mark_install_rule();
        InstallTargetGenerator { target, spec }
    }

    pub fn target(&self) -> &'a Target {
        self.target
    }

    pub fn spec(&self) -> &'a InstallSpec {
        self.spec
    }

    /// Name of the installed file for `config`.
    pub fn install_filename<M: BuildModel + ?Sized>(&self, model: &M, config: Option<&str>) -> String {
        install_filename(model, self.target, config, NameRole::select(self.spec.implib, false))
    }

    /// Generate the complete fragment for this target.
    ///
    /// The fragment is built in memory, so an error leaves no partial output.
    pub fn generate<M: BuildModel + ?Sized>(
        &self,
        model: &M,
        ctx: &InstallContext,
        config: Option<&str>,
    ) -> Result<Vec<Statement>, GenerateError> {
        let configurations = model
            .configuration_types()
            .ok_or(GenerateError::ConfigurationsUnknown)?;
        if !model.is_layout_final(self.target) {
            return Err(GenerateError::LayoutNotFinalized {
                target: self.target.name.clone(),
            });
        }

        let generation = Generation {
            config,
            configurations,
        };
        let target = self.target;
        let spec = self.spec;

        if spec.implib && self.import_library_missing(model, generation) {
            tracing::debug!(
                "`{}` has no import library on this platform, nothing to install",
                target.name
            );
            return Ok(Vec::new());
        }

        let mut statements = Vec::new();

        let from_dir = if target.needs_relink_before_install {
            format!("{}/", model.relink_directory(target))
        } else {
            format!("{}/", model.output_directory(target, spec.implib))
        };

        let build = script_reference(
            model,
            generation,
            target,
            Place::Build,
            true,
            NameRole::select(spec.implib, false),
        );
        statements.extend(build.definitions);
        let mut from_file = format!("{from_dir}{}", build.reference);

        let destination = spec.destination.as_str();
        let kind_rule = self.kind_rule(model, ctx);
        if kind_rule.bundle {
            from_file.push_str(".app");
        }

        let install_type = if spec.implib {
            InstallType::StaticLibrary
        } else {
            kind_rule
                .install_type
                .unwrap_or_else(|| InstallType::from(target.kind))
        };
        let optional = spec.optional || spec.implib;

        let mut rule = InstallRule::new(destination, install_type, from_file.as_str());
        rule.optional = optional;
        rule.properties = kind_rule.properties.join(" ");
        if !kind_rule.bundle {
            rule.file_permissions = spec.file_permissions.clone();
        }
        rule.configurations = spec.configurations.clone();
        rule.component = spec.component.clone();
        rule.literal_args = kind_rule.literal_args;
        statements.push(Statement::Install(rule));

        if install_type.is_linked_binary() {
            statements.extend(install_name_patch(
                model,
                generation,
                ctx,
                target,
                spec.implib,
                destination,
                &spec.component,
            ));
        }

        let installed = script_reference(
            model,
            generation,
            target,
            Place::Install,
            false,
            NameRole::select(spec.implib, false),
        );
        let bundle_suffix = if kind_rule.bundle { ".app" } else { "" };
        let quoted_destination = quoted(&format!(
            "$ENV{{DESTDIR}}{destination}/{}{bundle_suffix}",
            installed.reference
        ));

        let post: Vec<Statement> = ranlib_rule(ctx, install_type, &quoted_destination)
            .into_iter()
            .chain(strip_rule(
                ctx,
                install_type,
                kind_rule.bundle,
                &quoted_destination,
                optional,
            ))
            .collect();
        if !post.is_empty() {
            statements.extend(installed.definitions);
            statements.extend(post);
        }

        Ok(statements)
    }

    fn kind_rule<M: BuildModel + ?Sized>(&self, model: &M, ctx: &InstallContext) -> KindRule {
        let target = self.target;
        let mut rule = KindRule::default();

        match target.kind {
            TargetKind::SharedLib => {
                if model.soname_flag(target).is_some() {
                    if let Some(version) = target.property("VERSION") {
                        rule.properties.push(format!("VERSION {version}"));
                    }
                    if let Some(soversion) = target.property("SOVERSION") {
                        rule.properties.push(format!("SOVERSION {soversion}"));
                    }
                }
            }
            TargetKind::Exe => {
                if ctx.executable_versioning {
                    if let Some(version) = target.property("VERSION") {
                        rule.properties.push(format!("VERSION {version}"));
                    }
                }
                if self.is_bundle(ctx) {
                    rule.bundle = true;
                    rule.install_type = Some(InstallType::Directory);
                    rule.literal_args.push("USE_SOURCE_PERMISSIONS".to_string());
                }
            }
            TargetKind::StaticLib | TargetKind::Module => {}
        }

        rule
    }

    fn is_bundle(&self, ctx: &InstallContext) -> bool {
        ctx.apple && self.target.property_as_bool("MACOSX_BUNDLE")
    }

    fn import_library_missing<M: BuildModel + ?Sized>(
        &self,
        model: &M,
        generation: Generation<'_>,
    ) -> bool {
        let role = NameRole::ImportLibrary;
        if generation.is_multi_config() {
            generation
                .configurations
                .iter()
                .all(|c| install_filename(model, self.target, Some(c), role).is_empty())
        } else {
            install_filename(model, self.target, generation.config, role).is_empty()
        }
    }
}
