//! `render` command: render a job file through the native engine.
//!
//! A job file is a JSON object carrying the same parameters as a tile
//! request (`style`, `zooms`, `layers`, `width`, `height`, `lon0`, ...).
//! `--tile z/x/y` replaces the bounding box with that tile's Web Mercator
//! extent and defaults the size to one 256px tile.

use std::path::PathBuf;

use cartostyle::coord::{BoundingBox, TileCoord, TILE_SIZE};
use cartostyle::request::{
    TileParams, TileResponse, PARAM_HEIGHT, PARAM_LAT0, PARAM_LAT1, PARAM_LON0, PARAM_LON1,
    PARAM_WIDTH,
};
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the render command.
#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub job: PathBuf,
    pub output: PathBuf,
    pub library: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
    pub tile: Option<String>,
    pub debug: bool,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("render");

    let text = runner.read_input(&args.job)?;
    let mut params = TileParams::from_json(&text)?;

    if let Some(spec) = &args.tile {
        let tile: TileCoord = spec
            .parse()
            .map_err(|e| CliError::Argument(format!("--tile: {}", e)))?;
        apply_tile(&mut params, &tile);
        println!("Rendering tile {}", tile);
    }

    let service = runner.create_service(args.library, args.resource_dir)?;
    match service.handle(&params) {
        TileResponse::Image(tile) => runner.write_output(&args.output, &tile.bytes),
        TileResponse::Error(payload) => {
            warn!("Render failed: {}", payload.to_json());
            Err(CliError::Rejected(payload))
        }
    }
}

/// Points `params` at `tile`'s extent in Web Mercator metres.
///
/// An explicit width or height in the job is kept.
pub(crate) fn apply_tile(params: &mut TileParams, tile: &TileCoord) {
    let bbox = BoundingBox::for_tile(tile).to_web_mercator();
    info!("Tile {} covers {}", tile, bbox);

    params.set(PARAM_LON0, bbox.lon0.to_string());
    params.set(PARAM_LAT0, bbox.lat0.to_string());
    params.set(PARAM_LON1, bbox.lon1.to_string());
    params.set(PARAM_LAT1, bbox.lat1.to_string());

    for name in [PARAM_WIDTH, PARAM_HEIGHT] {
        if params.get(name).is_none() {
            params.set(name, TILE_SIZE.to_string());
        }
    }
}
