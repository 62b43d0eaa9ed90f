//! Load command implementation.

use crate::cli::LoadArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use fiscal_store::{load_json_into, LoadOutcome};
use std::path::Path;

/// Execute the load command.
pub fn execute_load(args: LoadArgs, config: &Config, formatter: &Formatter) -> Result<LoadOutcome> {
    let input = args.input.unwrap_or_else(|| config.paths.output_file.clone());
    let database = args.database.unwrap_or_else(|| config.paths.database.clone());

    load_into(&input, &database, formatter)
}

/// Load a result file into a database, reporting the outcome on the console.
pub fn load_into(input: &Path, database: &Path, formatter: &Formatter) -> Result<LoadOutcome> {
    let outcome = load_json_into(input, database)?;

    let message = match &outcome {
        LoadOutcome::Inserted(count) => formatter.success(&format!(
            "Inserted {} record(s) into {}",
            count,
            database.display()
        )),
        LoadOutcome::MissingDocument(path) => formatter.error(&format!(
            "Result file '{}' not found. Run the extract command first.",
            path.display()
        )),
        LoadOutcome::EmptyDocument => formatter.warning(&format!(
            "Result file '{}' is empty",
            input.display()
        )),
    };
    println!("{}", message);

    Ok(outcome)
}
