//! Tile render bridge.
//!
//! Packages a compiled document, a bounding box and a raster size into one
//! engine call, then encodes the filled buffer.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use parking_lot::{const_mutex, Mutex};

use crate::coord::BoundingBox;
use crate::log::{Logger, NoOpLogger};
use crate::style::CompiledDocument;
use crate::{log_debug, log_error};

use super::buffer::{PixelBuffer, RowOrder};
use super::encoder::{EncodedTile, PngTileEncoder, TileEncoder};
use super::engine::{EngineCall, RenderEngine};
use super::error::RenderError;

/// Held for the duration of every call into a non-reentrant engine.
static ENGINE_GATE: Mutex<()> = const_mutex(());

/// Raster parameters of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub width: u32,
    pub height: u32,
    /// Extent in the map document's SRS
    pub bbox: BoundingBox,
    pub background_color: String,
    pub srs: String,
}

/// Drives a [`RenderEngine`] and a [`TileEncoder`].
pub struct TileRenderer {
    engine: Arc<dyn RenderEngine>,
    encoder: Arc<dyn TileEncoder>,
    row_order: RowOrder,
    logger: Arc<dyn Logger>,
}

impl TileRenderer {
    /// Creates a renderer producing PNG tiles from top-down buffers.
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            encoder: Arc::new(PngTileEncoder),
            row_order: RowOrder::default(),
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn TileEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Row order the engine writes in.
    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Renders `document` and encodes the result.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidDimensions`] for an unusable raster size
    /// - [`RenderError::EngineFailure`] if the engine reports failure
    /// - [`RenderError::Encoding`] if the filled buffer cannot be encoded
    pub fn render(
        &self,
        document: CompiledDocument,
        resource_dir: &Path,
        request: &RenderRequest,
    ) -> Result<EncodedTile, RenderError> {
        let image = self.rasterize(document, resource_dir, request)?;
        self.encode(&image)
    }

    /// Runs the engine and returns the top-down image.
    ///
    /// The pixel buffer lives only inside this call and is released on every
    /// return path.
    pub fn rasterize(
        &self,
        document: CompiledDocument,
        resource_dir: &Path,
        request: &RenderRequest,
    ) -> Result<RgbaImage, RenderError> {
        let mut buffer = PixelBuffer::new(request.width, request.height)?;
        let call = EngineCall {
            resource_dir,
            document: document.as_str(),
            width: request.width,
            height: request.height,
            bbox: request.bbox,
        };

        log_debug!(
            self.logger,
            "Rendering {}x{} ({} byte buffer) over {} in '{}' on engine '{}'",
            request.width,
            request.height,
            buffer.len(),
            request.bbox,
            request.srs,
            self.engine.name()
        );

        let started = Instant::now();
        if let Err(e) = call_engine(self.engine.as_ref(), &call, &mut buffer) {
            log_error!(self.logger, "Render failed after {:?}: {}", started.elapsed(), e);
            return Err(e);
        }
        log_debug!(self.logger, "Engine finished in {:?}", started.elapsed());

        buffer.into_image(self.row_order)
    }

    pub fn encode(&self, image: &RgbaImage) -> Result<EncodedTile, RenderError> {
        let tile = self.encoder.encode(image)?;
        log_debug!(
            self.logger,
            "Encoded {} tile: {} bytes",
            self.encoder.name(),
            tile.len()
        );
        Ok(tile)
    }
}

/// Calls the engine, serializing non-reentrant engines process-wide.
fn call_engine(
    engine: &dyn RenderEngine,
    call: &EngineCall<'_>,
    buffer: &mut PixelBuffer,
) -> Result<(), RenderError> {
    let _gate = (!engine.is_reentrant()).then(|| ENGINE_GATE.lock());
    engine.render(call, buffer)
}
