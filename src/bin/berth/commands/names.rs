//! `berth names` command

use anyhow::{Context, Result};

use crate::cli::NamesArgs;
use berth::core::Project;
use berth::install::NameRole;
use berth::ops::names::{artifact_names, resolve_name};
use berth::util::GlobalContext;

pub fn execute(args: NamesArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.manifest_path(args.manifest.as_deref())?;
    let project = Project::load(&manifest_path)?;

    let config = args.config.as_deref().or(project.build_type());

    if args.all {
        let names = artifact_names(&project, &args.target, config)?;
        let json = serde_json::to_string_pretty(&names).context("failed to serialize names")?;
        println!("{}", json);
        return Ok(());
    }

    let role = NameRole::select(args.implib, args.soname);
    let name = resolve_name(&project, &args.target, config, role)?;

    if name.is_empty() {
        tracing::warn!(
            "`{}` has no {} on {}",
            args.target,
            if args.implib { "import library" } else { "such name" },
            project.os()
        );
    } else {
        println!("{}", name);
    }

    Ok(())
}
