//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`compile`] - Compile JSON styles and layers into a map document
//! - [`config`] - Configuration management (path, show, init)
//! - [`export`] - Pretty-print a style document for download
//! - [`render`] - Render a job file to a PNG through the native engine

pub mod compile;
pub mod config;
pub mod export;
pub mod render;
