//! Tile rendering.
//!
//! - [`TileRenderer`]: compiled document + bbox + size → encoded tile
//! - [`RenderEngine`]: the engine seam, [`NativeRenderEngine`] in production
//! - [`PixelBuffer`]: the owned RGBA8 region an engine fills
//! - [`TileEncoder`]: image → bytes, [`PngTileEncoder`] by default
//!
//! Calls into engines that do not report themselves reentrant are
//! serialized behind one process-wide lock.

mod bridge;
mod buffer;
mod encoder;
mod engine;
mod error;
mod native;

pub use bridge::{RenderRequest, TileRenderer};
pub use buffer::{PixelBuffer, RowOrder, BYTES_PER_PIXEL};
pub use encoder::{EncodedTile, PngTileEncoder, TileEncoder, PNG_SIGNATURE};
pub use engine::{EngineCall, RenderEngine};
pub use error::RenderError;
pub use native::{NativeRenderEngine, RENDER_SYMBOL};
