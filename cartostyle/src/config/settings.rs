//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

use crate::render::RowOrder;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Native render engine settings
    pub engine: EngineSettings,
    /// Request defaults and limits
    pub render: RenderSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Render engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Path of the shared library exporting `cartostyle_render_map`
    pub library: Option<PathBuf>,
    /// Fonts and datasource plugins root handed to every engine call
    pub resource_dir: PathBuf,
    /// Row order the engine writes pixel rows in
    pub row_order: RowOrder,
    /// Allow concurrent engine calls (only for engines known to be reentrant)
    pub reentrant: bool,
}

/// Render request configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// SRS used when a request does not name one
    pub srs: String,
    /// Background colour used when a request does not name one
    pub background_color: String,
    /// Largest accepted width in pixels
    pub max_width: u32,
    /// Largest accepted height in pixels
    pub max_height: u32,
    /// Seconds a request may spend compiling and rendering
    pub timeout: u64,
}

impl RenderSettings {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
