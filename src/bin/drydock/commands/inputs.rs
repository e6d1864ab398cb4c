//! `drydock inputs` command

use anyhow::Result;

use crate::cli::InputsArgs;
use drydock::ops::drydock_preprocess::INPUT_STORE_FILE;
use drydock::tracker::InputStore;
use drydock::util::diagnostic::{self, suggestions, Diagnostic};

pub fn execute(args: InputsArgs) -> Result<()> {
    let store_path = args.output_dir.join(INPUT_STORE_FILE);

    if !store_path.exists() {
        diagnostic::emit(
            &Diagnostic::error("no input store found")
                .with_location(&store_path)
                .with_suggestion(suggestions::NO_INPUT_STORE),
            false,
        );
        std::process::exit(1);
    }

    let store = InputStore::load(&store_path)?;

    if args.changed {
        for path in store.changed_inputs()? {
            println!("{}", path.display());
        }
    } else {
        for path in store.inputs.keys() {
            println!("{}", path.display());
        }
    }

    Ok(())
}
