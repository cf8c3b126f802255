//! Shared-library render engine.
//!
//! The engine library exports one C function:
//!
//! ```c
//! int cartostyle_render_map(const char *resource_dir, const char *map_document,
//!                           int width, int height,
//!                           double lon0, double lat0, double lon1, double lat1,
//!                           unsigned char *out, size_t out_len);
//! ```
//!
//! It returns `0` after writing `width * height` RGBA8 pixels into `out`, and
//! any other value on failure. The resource directory carries the engine's
//! fonts and datasource plugins and is passed on every call; nothing here
//! touches the process working directory.

use std::ffi::{c_char, c_double, c_int, c_uchar, CString};
use std::path::{Path, PathBuf};

use libloading::Library;

use super::buffer::PixelBuffer;
use super::engine::{EngineCall, RenderEngine};
use super::error::RenderError;

/// Exported entry point name.
pub const RENDER_SYMBOL: &[u8] = b"cartostyle_render_map";

type RenderMapFn = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    c_int,
    c_int,
    c_double,
    c_double,
    c_double,
    c_double,
    *mut c_uchar,
    usize,
) -> c_int;

/// Render engine backed by a dynamically loaded native library.
///
/// Load it once at startup and share it (`Arc`) across requests; the library
/// stays mapped for as long as this value lives.
pub struct NativeRenderEngine {
    render_map: RenderMapFn,
    path: PathBuf,
    reentrant: bool,
    // Keeps `render_map` valid. Declared last so it is dropped last.
    _library: Library,
}

impl NativeRenderEngine {
    /// Loads the library at `path` and resolves the entry point.
    ///
    /// # Errors
    ///
    /// [`RenderError::EngineLoad`] if the library cannot be opened or does
    /// not export `cartostyle_render_map`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref().to_path_buf();
        let load_error = |e: libloading::Error| RenderError::EngineLoad {
            path: path.clone(),
            message: e.to_string(),
        };

        // SAFETY: loading runs the library's initializers; the engine library
        // is trusted configuration, not request input.
        let library = unsafe { Library::new(&path) }.map_err(load_error)?;
        // SAFETY: the symbol is declared with the signature documented above.
        let render_map = unsafe { library.get::<RenderMapFn>(RENDER_SYMBOL) }
            .map(|symbol| *symbol)
            .map_err(load_error)?;

        Ok(Self {
            render_map,
            path,
            reentrant: false,
            _library: library,
        })
    }

    /// Marks the engine as safe to call from several threads at once.
    ///
    /// Only set this for engines known to be reentrant; the default
    /// serializes every call.
    pub fn with_reentrant(mut self, reentrant: bool) -> Self {
        self.reentrant = reentrant;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for NativeRenderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRenderEngine")
            .field("path", &self.path)
            .field("reentrant", &self.reentrant)
            .finish()
    }
}

fn c_text(engine: &str, what: &str, text: &str) -> Result<CString, RenderError> {
    CString::new(text).map_err(|_| {
        RenderError::engine_failure(engine, format!("{} contains an interior NUL byte", what))
    })
}

/// Converts `path` without loss; on Unix the raw bytes are passed through.
fn c_path(engine: &str, path: &Path) -> Result<CString, RenderError> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes()
    };
    #[cfg(not(unix))]
    let bytes = path
        .to_str()
        .ok_or_else(|| {
            RenderError::engine_failure(engine, "resource directory is not valid UTF-8")
        })?
        .as_bytes();

    CString::new(bytes).map_err(|_| {
        RenderError::engine_failure(engine, "resource directory contains an interior NUL byte")
    })
}

fn c_dimension(value: u32, width: u32, height: u32) -> Result<c_int, RenderError> {
    c_int::try_from(value).map_err(|_| RenderError::InvalidDimensions { width, height })
}

impl RenderEngine for NativeRenderEngine {
    fn render(&self, call: &EngineCall<'_>, buffer: &mut PixelBuffer) -> Result<(), RenderError> {
        let name = self.name();
        let resource_dir = c_path(name, call.resource_dir)?;
        let document = c_text(name, "map document", call.document)?;
        let width = c_dimension(call.width, call.width, call.height)?;
        let height = c_dimension(call.height, call.width, call.height)?;

        if PixelBuffer::byte_len(call.width, call.height) != Some(buffer.len()) {
            return Err(RenderError::InvalidDimensions {
                width: call.width,
                height: call.height,
            });
        }

        let out = buffer.as_mut_bytes();
        // SAFETY: both strings are NUL-terminated and outlive the call; `out`
        // is exactly `out.len()` writable bytes, checked against the request
        // size above.
        let code = unsafe {
            (self.render_map)(
                resource_dir.as_ptr(),
                document.as_ptr(),
                width,
                height,
                call.bbox.lon0,
                call.bbox.lat0,
                call.bbox.lon1,
                call.bbox.lat1,
                out.as_mut_ptr(),
                out.len(),
            )
        };

        if code == 0 {
            Ok(())
        } else {
            Err(RenderError::engine_failure(
                name,
                format!("{} returned code {}", self.path.display(), code),
            ))
        }
    }

    fn name(&self) -> &str {
        "native"
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }
}
