//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::render::RowOrder;

/// Spherical Web Mercator, as a proj string.
pub const DEFAULT_SRS: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 \
                               +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +no_defs +over";

pub const DEFAULT_BACKGROUND_COLOR: &str = "white";

pub const DEFAULT_RESOURCE_DIR: &str = "./resources";

/// Largest accepted raster edge (pixels).
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LOG_FILE_NAME: &str = "cartostyle.log";

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            srs: DEFAULT_SRS.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            library: None,
            resource_dir: PathBuf::from(DEFAULT_RESOURCE_DIR),
            row_order: RowOrder::default(),
            reentrant: false,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            engine: EngineSettings::default(),
            render: RenderSettings::default(),
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
