//! Error types for style compilation.

use thiserror::Error;

use super::thresholds::ThresholdKind;
use crate::model::SymbolizerKind;

/// Errors that stop a map document from being compiled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A rule's `minzoom`/`maxzoom` has no matching threshold in the table
    /// built from the request's zoom list.
    #[error(
        "style '{style}' rule {rule} references {kind}_zoom{zoom}, \
         which the zoom list does not define"
    )]
    UnknownZoomReference {
        style: String,
        rule: usize,
        kind: ThresholdKind,
        zoom: usize,
    },

    #[error("{symbolizer} symbolizer parameter '{name}' is not a valid attribute name")]
    InvalidParameterName {
        symbolizer: SymbolizerKind,
        name: String,
    },

    /// An attribute-style symbolizer names the same parameter twice.
    #[error("{symbolizer} symbolizer parameter '{name}' is given more than once")]
    DuplicateParameterName {
        symbolizer: SymbolizerKind,
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_zoom_reference_message() {
        let err = CompileError::UnknownZoomReference {
            style: "water".to_string(),
            rule: 2,
            kind: ThresholdKind::MinScale,
            zoom: 7,
        };
        assert_eq!(
            err.to_string(),
            "style 'water' rule 2 references minscale_zoom7, which the zoom list does not define"
        );
    }

    #[test]
    fn test_invalid_parameter_name_message() {
        let err = CompileError::InvalidParameterName {
            symbolizer: SymbolizerKind::PolygonPattern,
            name: "file name".to_string(),
        };
        assert!(err.to_string().contains("polygon-pattern"));
        assert!(err.to_string().contains("'file name'"));
    }

    #[test]
    fn test_duplicate_parameter_name_message() {
        let err = CompileError::DuplicateParameterName {
            symbolizer: SymbolizerKind::Text,
            name: "size".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "text symbolizer parameter 'size' is given more than once"
        );
    }
}
