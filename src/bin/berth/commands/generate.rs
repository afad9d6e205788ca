//! `berth generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use berth::ops::install_script::{generate, GenerateOptions};
use berth::util::GlobalContext;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.manifest_path(args.manifest.as_deref())?;

    let output = args.output.map(|path| {
        if path.is_absolute() {
            path
        } else {
            ctx.cwd().join(path)
        }
    });

    let opts = GenerateOptions {
        config: args.config,
        output,
        plan: args.plan,
        strip: args.strip,
        detect_tools: args.detect_tools,
    };

    let result = generate(&manifest_path, &opts)?;

    match result.output_path {
        Some(path) => eprintln!(
            "     Wrote {} ({} install rules)",
            path.display(),
            result.script.fragments
        ),
        None => println!("{}", result.script.to_json()?),
    }

    Ok(())
}
