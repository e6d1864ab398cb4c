//! `drydock clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use drydock::util::fs::remove_dir_all_if_exists;

pub fn execute(args: CleanArgs) -> Result<()> {
    remove_dir_all_if_exists(&args.output_dir)?;
    eprintln!("     Removed {}", args.output_dir.display());
    Ok(())
}
