//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Drydock - incremental C/C++ preprocessing and header discovery
#[derive(Parser)]
#[command(name = "drydock")]
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
    /// Preprocess sources and discover header inputs
    Preprocess(PreprocessArgs),

    /// Show the header inputs discovered by the last run
    Inputs(InputsArgs),

    /// Remove preprocessed output
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct PreprocessArgs {
    /// Directory containing the sources to preprocess
    #[arg(long, default_value = "src")]
    pub source_dir: PathBuf,

    /// Glob patterns selecting sources, relative to the source directory
    #[arg(long = "sources")]
    pub source_globs: Vec<String>,

    /// Include root directory (repeatable)
    #[arg(short = 'I', long = "include")]
    pub include_roots: Vec<PathBuf>,

    /// Extra compiler option (repeatable)
    #[arg(long = "option")]
    pub compiler_options: Vec<String>,

    /// Root directory for preprocessed output
    #[arg(long, default_value = "target/preprocessed")]
    pub output_dir: PathBuf,

    /// Extra include root appended to every invocation
    #[arg(long)]
    pub header_root: PathBuf,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Emit planned invocations as JSON (no preprocessing)
    #[arg(long)]
    pub plan: bool,

    /// Output format: human or json
    #[arg(long, default_value = "human")]
    pub message_format: String,
}

#[derive(Args)]
pub struct InputsArgs {
    /// Output directory the run wrote to
    #[arg(long, default_value = "target/preprocessed")]
    pub output_dir: PathBuf,

    /// Show only inputs whose content changed since the run
    #[arg(long)]
    pub changed: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Output directory to remove
    #[arg(long, default_value = "target/preprocessed")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
