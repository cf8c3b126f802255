//! Map data model.
//!
//! Typed styles, rules, symbolizers and layers, plus the decoding step that
//! turns request JSON into them. Unknown symbolizer or datasource kinds are
//! rejected here, so the compiler only ever sees shapes it can emit.

mod decode;
mod types;

use thiserror::Error;

pub use decode::{check_document_text, decode_layers, decode_styles, decode_zooms};
pub use types::{
    DatabaseSource, FileSource, Layer, LayerSource, LayerStatus, Rule, Style, Symbolizer,
    SymbolizerKind,
};

/// Errors raised while decoding request JSON into the model.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Syntax error or a value of the wrong shape
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON carrying an unusable value
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("unsupported symbolizer kind '{0}'")]
    UnsupportedSymbolizerKind(String),

    #[error("layer '{layer}' has unknown source kind '{kind}'")]
    UnknownLayerSourceKind { layer: String, kind: String },
}
