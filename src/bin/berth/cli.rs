//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Berth - install script generator for C and C++ build trees
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the install script of a build tree
    Generate(GenerateArgs),

    /// Show the file name an install rule uses for a target
    Names(NamesArgs),

    /// Show the post-install tools that would be used
    Tools(ToolsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to Berth.toml (searched upward from the current directory by default)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Configuration to generate for (defaults to the project build type)
    #[arg(long)]
    pub config: Option<String>,

    /// Where to write the script (defaults to <binary_dir>/cmake_install.cmake)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the install plan as JSON instead of writing the script
    #[arg(long)]
    pub plan: bool,

    /// Strip installed binaries by default
    #[arg(long)]
    pub strip: bool,

    /// Search PATH for tools that are not configured
    #[arg(long)]
    pub detect_tools: bool,
}

#[derive(Args)]
pub struct NamesArgs {
    /// Target to resolve
    pub target: String,

    /// Path to Berth.toml
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Configuration to resolve the name for
    #[arg(long)]
    pub config: Option<String>,

    /// Resolve the import library name
    #[arg(long)]
    pub implib: bool,

    /// Resolve the soname instead of the canonical name
    #[arg(long)]
    pub soname: bool,

    /// Print every name the target produces as JSON
    #[arg(long, conflicts_with_all = ["implib", "soname"])]
    pub all: bool,
}

#[derive(Args)]
pub struct ToolsArgs {
    /// Path to Berth.toml
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Search PATH for tools that are not configured
    #[arg(long)]
    pub detect_tools: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
