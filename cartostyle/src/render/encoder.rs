//! Tile encoding.
//!
//! ```
//! use cartostyle::render::{PngTileEncoder, TileEncoder};
//! use image::RgbaImage;
//!
//! let encoder = PngTileEncoder;
//! let tile = encoder.encode(&RgbaImage::new(4, 4)).unwrap();
//!
//! assert_eq!(tile.content_type, "image/png");
//! assert_eq!(&tile.bytes[..4], b"\x89PNG");
//! ```

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};

use super::error::RenderError;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// An encoded image plus its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl EncodedTile {
    /// Length in bytes, as sent in `Content-Length`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for tile encoding strategies.
///
/// Implementations must be thread-safe (`Send + Sync`); one encoder serves
/// every request.
pub trait TileEncoder: Send + Sync {
    /// Encode a top-down RGBA image.
    ///
    /// # Errors
    ///
    /// [`RenderError::Encoding`] if the image cannot be written in this
    /// format.
    fn encode(&self, image: &RgbaImage) -> Result<EncodedTile, RenderError>;

    /// Media type of the encoded bytes, e.g. `image/png`.
    fn content_type(&self) -> &'static str;

    /// Human-readable format name.
    fn name(&self) -> &str;
}

impl<T: TileEncoder + ?Sized> TileEncoder for Arc<T> {
    fn encode(&self, image: &RgbaImage) -> Result<EncodedTile, RenderError> {
        (**self).encode(image)
    }

    fn content_type(&self) -> &'static str {
        (**self).content_type()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Encodes tiles as PNG via the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngTileEncoder;

impl TileEncoder for PngTileEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<EncodedTile, RenderError> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| RenderError::Encoding {
                format: self.name().to_string(),
                message: e.to_string(),
            })?;
        Ok(EncodedTile {
            bytes,
            content_type: self.content_type(),
        })
    }

    fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn name(&self) -> &str {
        "PNG"
    }
}
