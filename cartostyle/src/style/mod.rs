//! Style compilation.
//!
//! - [`ScaleThresholds`]: named per-zoom scale thresholds
//! - [`emit`]: one symbolizer as a document fragment
//! - [`StyleCompiler`]: the complete map document

mod compiler;
mod error;
mod symbolizer;
mod thresholds;
mod writer;

pub use compiler::{CompiledDocument, StyleCompiler};
pub use error::CompileError;
pub use symbolizer::emit;
pub use thresholds::{ScaleThreshold, ScaleThresholds, ThresholdKind};
