//! Cartostyle CLI - Command-line interface
//!
//! Compiles JSON map styles into Mapnik map documents, renders them to PNG
//! through the native engine, and manages the user configuration.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::compile::CompileArgs;
use commands::config::ConfigCommands;
use commands::render::RenderArgs;

#[derive(Parser)]
#[command(name = "cartostyle")]
#[command(version = cartostyle::VERSION)]
#[command(about = "Compile JSON map styles and render map tiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile styles and layers into a Mapnik XML map document
    Compile {
        /// JSON file holding the array of styles
        #[arg(long)]
        style: PathBuf,

        /// Scale denominators, as a JSON array or comma-separated list
        #[arg(long)]
        zooms: String,

        /// JSON file holding the array of layers
        #[arg(long)]
        layers: PathBuf,

        /// Map SRS (defaults to [render] srs from config.ini)
        #[arg(long)]
        srs: Option<String>,

        /// Map background colour (defaults to [render] background_color)
        #[arg(long)]
        bgcolor: Option<String>,

        /// Write the document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Render a job file to a PNG image
    Render {
        /// JSON object with the tile request parameters
        #[arg(long)]
        job: PathBuf,

        /// PNG output path
        #[arg(long, short)]
        output: PathBuf,

        /// Render engine shared library (overrides [engine] library)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Fonts and plugins directory (overrides [engine] resource_dir)
        #[arg(long)]
        resource_dir: Option<PathBuf>,

        /// Render the Web Mercator tile z/x/y instead of the job's bounding box
        #[arg(long)]
        tile: Option<String>,

        /// Enable debug-level logging
        #[arg(long)]
        debug: bool,
    },

    /// Pretty-print a style document for download
    ExportStyle {
        /// Style JSON to re-format
        #[arg(long)]
        input: PathBuf,

        /// Output path (conventionally map_style.json)
        #[arg(long, short)]
        output: PathBuf,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            style,
            zooms,
            layers,
            srs,
            bgcolor,
            output,
        } => commands::compile::run(CompileArgs {
            style,
            zooms,
            layers,
            srs,
            bgcolor,
            output,
        }),
        Commands::Render {
            job,
            output,
            library,
            resource_dir,
            tile,
            debug,
        } => commands::render::run(RenderArgs {
            job,
            output,
            library,
            resource_dir,
            tile,
            debug,
        }),
        Commands::ExportStyle { input, output } => commands::export::run(input, output),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
