//! `berth tools` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ToolsArgs;
use berth::core::Project;
use berth::util::tools::{resolve_tools, Tool};
use berth::util::GlobalContext;

pub fn execute(args: ToolsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.manifest_path(args.manifest.as_deref())?;
    let project = Project::load(&manifest_path)?;
    let root = manifest_path.parent().unwrap_or(Path::new("."));

    let tools = resolve_tools(project.os(), project.tools(), root, args.detect_tools);

    println!("Tools for {} ({}):", project.name(), project.os());
    println!();

    for tool in Tool::ALL {
        let label = format!("{}:", tool);
        if !tool.used_on(project.os()) {
            println!("  {:<19} not used on {}", label, project.os());
            continue;
        }
        match tools.get(tool) {
            Some(resolved) => println!(
                "  {:<19} {} ({})",
                label,
                resolved.path.display(),
                resolved.source
            ),
            None => println!("  {:<19} not configured", label),
        }
    }

    Ok(())
}
