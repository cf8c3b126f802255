//! Coordinate conversion module
//!
//! Bounding boxes for render requests, plus the slippy-map tile math used to
//! derive a box from a `z/x/y` tile address.

mod types;

pub use types::{
    BoundingBox, CoordError, TileCoord, MAX_LAT, MAX_ZOOM, MIN_LAT, TILE_SIZE,
};

use std::f64::consts::PI;

/// WGS84 semi-major axis in metres, the sphere radius of Web Mercator.
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Converts a global pixel position at `zoom` to longitude/latitude degrees.
///
/// Pixel `(0, 0)` is the north-west corner of the world at that zoom.
#[inline]
pub fn pixel_to_lon_lat(px: f64, py: f64, zoom: u8) -> (f64, f64) {
    let world = f64::from(TILE_SIZE) * 2.0_f64.powi(i32::from(zoom));

    let lon = px / world * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * py / world)).sinh().atan();

    (lon, lat_rad.to_degrees())
}

/// Projects WGS84 degrees to Web Mercator (EPSG:3857) metres.
///
/// Latitude is clamped to the projection's valid range.
#[inline]
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

impl BoundingBox {
    /// Geographic extent of a tile: south-west corner first, then north-east.
    pub fn for_tile(tile: &TileCoord) -> Self {
        let size = f64::from(TILE_SIZE);
        let (lon0, lat0) = pixel_to_lon_lat(
            f64::from(tile.x) * size,
            (f64::from(tile.y) + 1.0) * size,
            tile.zoom,
        );
        let (lon1, lat1) = pixel_to_lon_lat(
            (f64::from(tile.x) + 1.0) * size,
            f64::from(tile.y) * size,
            tile.zoom,
        );
        Self {
            lon0,
            lat0,
            lon1,
            lat1,
        }
    }

    /// Reprojects a WGS84 degree box into Web Mercator metres.
    pub fn to_web_mercator(&self) -> Self {
        let (lon0, lat0) = lon_lat_to_mercator(self.lon0, self.lat0);
        let (lon1, lat1) = lon_lat_to_mercator(self.lon1, self.lat1);
        Self {
            lon0,
            lat0,
            lon1,
            lat1,
        }
    }
}
