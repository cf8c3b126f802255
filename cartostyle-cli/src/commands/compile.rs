//! `compile` command: JSON styles and layers to a Mapnik map document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cartostyle::log::TracingLogger;
use cartostyle::model::{
    check_document_text, decode_layers, decode_styles, decode_zooms, DecodeError,
};
use cartostyle::style::StyleCompiler;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the compile command.
#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub style: PathBuf,
    pub zooms: String,
    pub layers: PathBuf,
    pub srs: Option<String>,
    pub bgcolor: Option<String>,
    pub output: Option<PathBuf>,
}

/// Run the compile command.
pub fn run(args: CompileArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("compile");

    let styles = decode_file(&runner, &args.style, decode_styles)?;
    let layers = decode_file(&runner, &args.layers, decode_layers)?;
    let zooms = parse_zooms(&args.zooms)?;

    let render = &runner.config().render;
    let srs = args.srs.as_deref().unwrap_or(&render.srs);
    let background_color = args.bgcolor.as_deref().unwrap_or(&render.background_color);
    for (flag, value) in [("--srs", srs), ("--bgcolor", background_color)] {
        check_document_text(flag, value).map_err(|e| CliError::Argument(e.to_string()))?;
    }

    info!(
        "Compiling {} styles and {} layers over {} zoom breakpoints",
        styles.len(),
        layers.len(),
        zooms.len()
    );
    let document = StyleCompiler::with_logger(Arc::new(TracingLogger)).compile(
        &styles,
        &zooms,
        &layers,
        srs,
        background_color,
    )?;

    match args.output {
        Some(path) => runner.write_output(&path, document.as_str().as_bytes()),
        None => {
            print!("{}", document);
            Ok(())
        }
    }
}

fn decode_file<T>(
    runner: &CliRunner,
    path: &Path,
    decode: fn(&str) -> Result<T, DecodeError>,
) -> Result<T, CliError> {
    let text = runner.read_input(path)?;
    decode(&text).map_err(|error| CliError::Decode {
        path: path.to_path_buf(),
        error,
    })
}

/// Accepts either a JSON array (`[1000,2000]`) or a comma-separated list.
pub(crate) fn parse_zooms(raw: &str) -> Result<Vec<f64>, CliError> {
    let trimmed = raw.trim();
    let json = if trimmed.starts_with('[') {
        trimmed.to_string()
    } else {
        format!("[{}]", trimmed)
    };
    decode_zooms(&json).map_err(|e| CliError::Argument(format!("--zooms: {}", e)))
}
