//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use cartostyle::config::ConfigFileError;
use cartostyle::model::DecodeError;
use cartostyle::render::RenderError;
use cartostyle::request::{ErrorKind, ErrorPayload, RequestError};
use cartostyle::style::CompileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    Argument(String),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Failed to write an output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Input file did not decode
    Decode { path: PathBuf, error: DecodeError },
    /// Style compilation failed
    Compile(CompileError),
    /// Render engine could not be loaded
    Engine(RenderError),
    /// The request was answered with an error payload
    Rejected(ErrorPayload),
    /// Request-level failure outside the tile service
    Request(RequestError),
}

impl CliError {
    pub fn file_read(path: &Path, error: std::io::Error) -> Self {
        CliError::FileRead {
            path: path.to_path_buf(),
            error,
        }
    }

    pub fn file_write(path: &Path, error: std::io::Error) -> Self {
        CliError::FileWrite {
            path: path.to_path_buf(),
            error,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Engine(RenderError::EngineLoad { .. }) => {
                eprintln!();
                eprintln!("The render engine is a shared library exporting cartostyle_render_map.");
                eprintln!("Point to it with --library or set [engine] library in config.ini");
                eprintln!("(see 'cartostyle config path').");
            }
            CliError::Rejected(payload) if payload.kind == ErrorKind::UnknownZoomReference => {
                eprintln!();
                eprintln!("Rule minzoom/maxzoom values index into the zoom list;");
                eprintln!("add more zoom breakpoints or lower the rule's zoom index.");
            }
            CliError::Rejected(payload) if payload.kind == ErrorKind::Timeout => {
                eprintln!();
                eprintln!("Raise [render] timeout in config.ini for large maps.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Argument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Decode { path, error } => {
                write!(f, "Failed to decode '{}': {}", path.display(), error)
            }
            CliError::Compile(e) => write!(f, "Failed to compile styles: {}", e),
            CliError::Engine(e) => write!(f, "Render engine unavailable: {}", e),
            CliError::Rejected(payload) => {
                write!(f, "Request failed ({}): {}", payload.kind, payload.message)
            }
            CliError::Request(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::FileRead { error, .. } => Some(error),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Decode { error, .. } => Some(error),
            CliError::Compile(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CompileError> for CliError {
    fn from(e: CompileError) -> Self {
        CliError::Compile(e)
    }
}

impl From<RequestError> for CliError {
    fn from(e: RequestError) -> Self {
        CliError::Request(e)
    }
}
