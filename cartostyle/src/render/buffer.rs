//! Owned RGBA8 pixel region filled by the render engine.

use image::{imageops, RgbaImage};

use super::error::RenderError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Row order in which an engine writes pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// First row in the buffer is the top of the image
    #[default]
    TopDown,
    /// First row in the buffer is the bottom of the image
    BottomUp,
}

impl RowOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowOrder::TopDown => "top-down",
            RowOrder::BottomUp => "bottom-up",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "top-down" | "topdown" => Some(RowOrder::TopDown),
            "bottom-up" | "bottomup" => Some(RowOrder::BottomUp),
            _ => None,
        }
    }
}

/// Exactly `width * height * 4` bytes, row-major RGBA8.
///
/// The buffer is owned by one render call and freed when it goes out of
/// scope, whether the call succeeds or not.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed buffer.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidDimensions`] for a zero dimension or a size that
    /// does not fit in memory.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let len = Self::byte_len(width, height)
            .filter(|&len| len > 0)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// `width * height * 4`, or `None` on overflow.
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The writable region handed to the engine.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Converts the filled buffer into an image in top-down row order.
    pub fn into_image(self, order: RowOrder) -> Result<RgbaImage, RenderError> {
        let (width, height) = (self.width, self.height);
        let mut image = RgbaImage::from_raw(width, height, self.data)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        if order == RowOrder::BottomUp {
            imageops::flip_vertical_in_place(&mut image);
        }
        Ok(image)
    }
}
