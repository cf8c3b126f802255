//! The render engine seam.
//!
//! [`RenderEngine`] is the one boundary between the bridge and whatever
//! actually rasterizes a map document. Production uses
//! [`NativeRenderEngine`](super::NativeRenderEngine); tests substitute
//! in-process mocks.

use std::path::Path;
use std::sync::Arc;

use crate::coord::BoundingBox;

use super::buffer::PixelBuffer;
use super::error::RenderError;

/// Arguments of one engine invocation.
#[derive(Debug, Clone, Copy)]
pub struct EngineCall<'a> {
    /// Root of the engine's fonts and datasource plugins
    pub resource_dir: &'a Path,
    /// Compiled map document text
    pub document: &'a str,
    pub width: u32,
    pub height: u32,
    pub bbox: BoundingBox,
}

/// A component that rasterizes map documents into RGBA8 buffers.
///
/// Implementations must be `Send + Sync`: one engine is shared by every
/// request in the process.
///
/// # Implementors
///
/// - [`NativeRenderEngine`](super::NativeRenderEngine) - shared library
///   reached through the C entry point `cartostyle_render_map`
pub trait RenderEngine: Send + Sync {
    /// Renders `call.document` over `call.bbox`, filling `buffer`.
    ///
    /// `buffer` is exactly `width * height * 4` bytes. On error its contents
    /// are unspecified and must not be used.
    fn render(&self, call: &EngineCall<'_>, buffer: &mut PixelBuffer) -> Result<(), RenderError>;

    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether concurrent calls into this engine are safe.
    ///
    /// Non-reentrant engines are serialized behind a process-wide gate.
    fn is_reentrant(&self) -> bool {
        false
    }
}

impl<T: RenderEngine + ?Sized> RenderEngine for Arc<T> {
    fn render(&self, call: &EngineCall<'_>, buffer: &mut PixelBuffer) -> Result<(), RenderError> {
        (**self).render(call, buffer)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_reentrant(&self) -> bool {
        (**self).is_reentrant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills every pixel with one colour.
    struct SolidEngine([u8; 4]);

    impl RenderEngine for SolidEngine {
        fn render(&self, _call: &EngineCall<'_>, buffer: &mut PixelBuffer) -> Result<(), RenderError> {
            for px in buffer.as_mut_bytes().chunks_exact_mut(4) {
                px.copy_from_slice(&self.0);
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "solid"
        }
    }

    #[test]
    fn test_default_is_not_reentrant() {
        assert!(!SolidEngine([0; 4]).is_reentrant());
    }

    #[test]
    fn test_arc_delegates() {
        let engine: Arc<dyn RenderEngine> = Arc::new(SolidEngine([1, 2, 3, 4]));
        let wrapped = Arc::new(engine);
        let mut buffer = PixelBuffer::new(2, 2).unwrap();
        let call = EngineCall {
            resource_dir: Path::new("resources"),
            document: "<Map/>",
            width: 2,
            height: 2,
            bbox: BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap(),
        };

        wrapped.render(&call, &mut buffer).unwrap();

        assert_eq!(wrapped.name(), "solid");
        assert_eq!(&buffer.as_bytes()[..4], &[1, 2, 3, 4]);
        assert_eq!(&buffer.as_bytes()[12..], &[1, 2, 3, 4]);
    }
}
