//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for inspecting
//! and creating `~/.cartostyle/config.ini`.

use cartostyle::config::{config_file_path, ConfigFile};
use clap::Subcommand;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration (file values over defaults)
    Show,

    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init => run_init(),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// List all effective settings.
fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    for (section, entries) in settings_table(&config) {
        println!("[{}]", section);
        for (key, value) in entries {
            if value.is_empty() {
                println!("  {} = (not set)", key);
            } else {
                println!("  {} = {}", key, value);
            }
        }
        println!();
    }

    Ok(())
}

/// Create the configuration file with defaults.
fn run_init() -> Result<(), CliError> {
    let path = config_file_path();
    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}

type Section = (&'static str, Vec<(&'static str, String)>);

fn settings_table(config: &ConfigFile) -> Vec<Section> {
    let engine = &config.engine;
    let render = &config.render;
    vec![
        (
            "engine",
            vec![
                (
                    "library",
                    engine
                        .library
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default(),
                ),
                ("resource_dir", engine.resource_dir.display().to_string()),
                ("row_order", engine.row_order.as_str().to_string()),
                ("reentrant", engine.reentrant.to_string()),
            ],
        ),
        (
            "render",
            vec![
                ("srs", render.srs.clone()),
                ("background_color", render.background_color.clone()),
                ("max_width", render.max_width.to_string()),
                ("max_height", render.max_height.to_string()),
                ("timeout", render.timeout.to_string()),
            ],
        ),
        (
            "logging",
            vec![("file", config.logging.file.display().to_string())],
        ),
    ]
}
