//! Tile request handling.
//!
//! The transport (HTTP server, CLI, test harness) collects raw parameters
//! into [`TileParams`] and calls [`TileService`]; it gets back a
//! [`TileResponse`] carrying either PNG bytes or an [`ErrorPayload`].

mod error;
mod export;
mod params;
mod service;

pub use error::{ErrorKind, RequestError};
pub use export::{export_style, StyleExport, EXPORT_FILE_NAME};
pub use params::{
    RenderJob, TileParams, PARAM_BGCOLOR, PARAM_HEIGHT, PARAM_LAT0, PARAM_LAT1, PARAM_LAYERS,
    PARAM_LON0, PARAM_LON1, PARAM_SRS, PARAM_STYLE, PARAM_WIDTH, PARAM_ZOOMS,
};
pub use service::{ErrorPayload, HandlerState, TileResponse, TileService};
