//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Deepest zoom level accepted for tile addressing
pub const MAX_ZOOM: u8 = 22;

/// Tile edge length in pixels for slippy-map addressing
pub const TILE_SIZE: u32 = 256;

/// Tile address in the Web Mercator / slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (0-22)
    pub zoom: u8,
    /// Column, 0 at the antimeridian (west)
    pub x: u32,
    /// Row, 0 at the north edge
    pub y: u32,
}

impl TileCoord {
    /// Creates a tile address, checking it exists at its zoom level.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let tiles = 1u64 << zoom;
        if u64::from(x) >= tiles || u64::from(y) >= tiles {
            return Err(CoordError::TileOutOfRange { zoom, x, y });
        }
        Ok(Self { zoom, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Parses the `z/x/y` form used in tile URLs.
impl FromStr for TileCoord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordError::InvalidTileSpec(s.to_string());
        let mut parts = s.trim().split('/');
        let (Some(z), Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let zoom = z.parse().map_err(|_| invalid())?;
        let x = x.parse().map_err(|_| invalid())?;
        let y = y.parse().map_err(|_| invalid())?;
        TileCoord::new(zoom, x, y)
    }
}

/// An axis-aligned extent, `(lon0, lat0)` to `(lon1, lat1)`, in the units of
/// whatever SRS the map document uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lon0: f64,
    pub lat0: f64,
    pub lon1: f64,
    pub lat1: f64,
}

impl BoundingBox {
    /// Creates a box, rejecting non-finite values and zero-area extents.
    pub fn new(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Result<Self, CoordError> {
        if let Some(bad) = [lon0, lat0, lon1, lat1].into_iter().find(|v| !v.is_finite()) {
            return Err(CoordError::NonFinite(bad));
        }
        if lon0 == lon1 || lat0 == lat1 {
            return Err(CoordError::DegenerateBox);
        }
        Ok(Self {
            lon0,
            lat0,
            lon1,
            lat1,
        })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.lon0, self.lat0, self.lon1, self.lat1
        )
    }
}

/// Errors that can occur during coordinate handling.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level is outside valid range (0 to 22)
    InvalidZoom(u8),
    /// Column or row does not exist at the tile's zoom level
    TileOutOfRange { zoom: u8, x: u32, y: u32 },
    /// Tile address is not of the form `z/x/y`
    InvalidTileSpec(String),
    /// A bounding box coordinate is NaN or infinite
    NonFinite(f64),
    /// Bounding box has zero width or height
    DegenerateBox,
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between 0 and {})",
                    zoom, MAX_ZOOM
                )
            }
            CoordError::TileOutOfRange { zoom, x, y } => {
                write!(f, "Tile {}/{}/{} does not exist at zoom {}", zoom, x, y, zoom)
            }
            CoordError::InvalidTileSpec(spec) => {
                write!(f, "Invalid tile address: '{}' (expected z/x/y)", spec)
            }
            CoordError::NonFinite(value) => {
                write!(f, "Invalid bounding box coordinate: {}", value)
            }
            CoordError::DegenerateBox => write!(f, "Bounding box has zero width or height"),
        }
    }
}

impl std::error::Error for CoordError {}
