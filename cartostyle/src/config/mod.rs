//! User configuration.
//!
//! `~/.cartostyle/config.ini` holds the render engine location, request
//! defaults and limits, and the log file path.
//!
//! # Example
//!
//! ```
//! use cartostyle::config::ConfigFile;
//! use cartostyle::render::RowOrder;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.engine.row_order, RowOrder::TopDown);
//! assert_eq!(config.render.max_width, 4096);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_LOG_FILE_NAME, DEFAULT_MAX_DIMENSION, DEFAULT_RESOURCE_DIR,
    DEFAULT_SRS, DEFAULT_TIMEOUT_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, EngineSettings, LoggingSettings, RenderSettings};
