//! Cartostyle - JSON map styles to rendered tiles
//!
//! This library compiles a JSON description of map layers, drawing styles
//! and per-zoom visibility rules into a Mapnik-style XML map document, and
//! renders that document through a native engine into PNG tiles.
//!
//! # High-Level API
//!
//! For most use cases, the [`request`] module provides a simplified facade:
//!
//! ```ignore
//! use cartostyle::config::ConfigFile;
//! use cartostyle::render::{NativeRenderEngine, TileRenderer};
//! use cartostyle::request::{TileParams, TileService};
//! use std::sync::Arc;
//!
//! let config = ConfigFile::load()?;
//! let engine = NativeRenderEngine::load("/usr/local/lib/libcartostyle_engine.so")?;
//! let renderer = TileRenderer::new(Arc::new(engine));
//! let service = TileService::new(renderer, config.engine.resource_dir, config.render);
//!
//! let response = service.handle(&TileParams::from_query(query_pairs));
//! ```
//!
//! The compiler can also be used on its own:
//!
//! ```
//! use cartostyle::model::{decode_layers, decode_styles};
//! use cartostyle::style::StyleCompiler;
//!
//! let styles = decode_styles(r##"[{"name": "water", "rules": [{"maxzoom": 0,
//!     "symbolizers": [{"type": "polygon", "params": [["fill", "#99b3cc"]]}]}]}]"##).unwrap();
//! let layers = decode_layers(r#"[{"name": "coast", "style": "water", "srs": "+init=epsg:4326",
//!     "source": {"kind": "file", "type": "shape", "path": "coast.shp"}}]"#).unwrap();
//!
//! let document = StyleCompiler::new()
//!     .compile(&styles, &[1000.0, 2000.0], &layers, "+init=epsg:4326", "white")
//!     .unwrap();
//! assert!(document.as_str().contains("&maxscale_zoom0;"));
//! ```

pub mod config;
pub mod coord;
pub mod log;
pub mod logging;
pub mod model;
pub mod render;
pub mod request;
pub mod style;

/// Version of the cartostyle library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
