//! Run command implementation: extract, then load.

use crate::cli::RunArgs;
use crate::commands::{execute_extract, load_into};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the run command.
///
/// The load step only runs when this extraction produced records, so a
/// result file left over from an earlier run is never loaded twice.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let output_file = args
        .extract
        .output
        .clone()
        .unwrap_or_else(|| config.paths.output_file.clone());
    let database = args.database.unwrap_or_else(|| config.paths.database.clone());

    let report = execute_extract(args.extract, config, formatter).await?;

    if report.is_empty() {
        println!("{}", formatter.info("Nothing to load"));
        return Ok(());
    }

    load_into(&output_file, &database, formatter)?;
    Ok(())
}
