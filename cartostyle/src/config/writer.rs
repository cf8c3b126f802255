//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::defaults::*;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let library = config
        .engine
        .library
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[engine]
; Shared library exporting cartostyle_render_map
; Example: library = /usr/local/lib/libcartostyle_engine.so
library = {}
; Fonts and datasource plugins root, passed to the engine on every call
resource_dir = {}
; Order the engine writes pixel rows in:
;   top-down  - first row is the top of the image (default)
;   bottom-up - first row is the bottom of the image
row_order = {}
; Allow concurrent engine calls. Leave false unless the engine is known to be
; reentrant; calls are then serialized process-wide.
reentrant = {}

[render]
; SRS used when a request does not name one (default: spherical Web Mercator)
srs = {}
; Background colour used when a request does not name one (default: {})
background_color = {}
; Largest accepted tile size in pixels (default: {})
max_width = {}
max_height = {}
; Seconds a request may spend compiling and rendering (default: {})
timeout = {}

[logging]
; Log file path
file = {}
"#,
        library,
        path_to_string(&config.engine.resource_dir),
        config.engine.row_order.as_str(),
        config.engine.reentrant,
        config.render.srs,
        DEFAULT_BACKGROUND_COLOR,
        config.render.background_color,
        DEFAULT_MAX_DIMENSION,
        config.render.max_width,
        config.render.max_height,
        DEFAULT_TIMEOUT_SECS,
        config.render.timeout,
        path_to_string(&config.logging.file),
    )
}

/// Render a path, shortening the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
