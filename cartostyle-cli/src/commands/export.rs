//! `export-style` command: tidy a style document for sharing.

use std::path::PathBuf;

use cartostyle::request::export_style;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the export-style command.
pub fn run(input: PathBuf, output: PathBuf) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("export-style");

    let data = runner.read_input(&input)?;
    let export = export_style(&data)?;
    runner.write_output(&output, &export.body)
}
