//! `drydock preprocess` command

use anyhow::Result;

use crate::cli::PreprocessArgs;
use drydock::ops::drydock_preprocess::{preprocess, MessageFormat, PreprocessOptions};

pub fn execute(args: PreprocessArgs, verbose: bool) -> Result<()> {
    let message_format: MessageFormat = args.message_format.parse()?;

    let opts = PreprocessOptions {
        source_dir: args.source_dir,
        source_globs: args.source_globs,
        include_roots: args.include_roots,
        compiler_options: args.compiler_options,
        output_dir: args.output_dir,
        header_root: args.header_root,
        jobs: args.jobs,
        emit_plan: args.plan,
        message_format,
        verbose,
    };

    preprocess(&opts)?;

    Ok(())
}
