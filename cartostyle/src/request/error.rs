//! Request-level errors and the error kinds reported to clients.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::model::DecodeError;
use crate::render::RenderError;
use crate::style::CompileError;

/// Error category reported in an error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Unparsable JSON, or a missing or unusable parameter
    MalformedInput,
    UnknownZoomReference,
    UnknownLayerSourceKind,
    UnsupportedSymbolizerKind,
    RenderEngineFailure,
    EncodingFailure,
    /// The request exceeded its time budget
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::UnknownZoomReference => "UnknownZoomReference",
            ErrorKind::UnknownLayerSourceKind => "UnknownLayerSourceKind",
            ErrorKind::UnsupportedSymbolizerKind => "UnsupportedSymbolizerKind",
            ErrorKind::RenderEngineFailure => "RenderEngineFailure",
            ErrorKind::EncodingFailure => "EncodingFailure",
            ErrorKind::Timeout => "Timeout",
        }
    }

    /// HTTP status a transport should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::MalformedInput
            | ErrorKind::UnknownZoomReference
            | ErrorKind::UnknownLayerSourceKind
            | ErrorKind::UnsupportedSymbolizerKind => 400,
            ErrorKind::RenderEngineFailure | ErrorKind::EncodingFailure => 500,
            ErrorKind::Timeout => 504,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can end a tile request early.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("parameter '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("render task aborted: {0}")]
    Aborted(String),
}

impl RequestError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        RequestError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(name: &str, source: DecodeError) -> Self {
        RequestError::Decode {
            name: name.to_string(),
            source,
        }
    }

    /// The client-facing category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::MissingParameter(_) | RequestError::InvalidParameter { .. } => {
                ErrorKind::MalformedInput
            }
            RequestError::Decode { source, .. } => match source {
                DecodeError::Json(_) | DecodeError::Invalid { .. } => ErrorKind::MalformedInput,
                DecodeError::UnsupportedSymbolizerKind(_) => ErrorKind::UnsupportedSymbolizerKind,
                DecodeError::UnknownLayerSourceKind { .. } => ErrorKind::UnknownLayerSourceKind,
            },
            RequestError::Compile(e) => match e {
                CompileError::UnknownZoomReference { .. } => ErrorKind::UnknownZoomReference,
                CompileError::InvalidParameterName { .. }
                | CompileError::DuplicateParameterName { .. } => ErrorKind::MalformedInput,
            },
            RequestError::Render(e) => match e {
                RenderError::InvalidDimensions { .. } => ErrorKind::MalformedInput,
                RenderError::EngineLoad { .. } | RenderError::EngineFailure { .. } => {
                    ErrorKind::RenderEngineFailure
                }
                RenderError::Encoding { .. } => ErrorKind::EncodingFailure,
            },
            RequestError::Timeout(_) => ErrorKind::Timeout,
            RequestError::Aborted(_) => ErrorKind::RenderEngineFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode_styles;
    use crate::style::ThresholdKind;

    #[test]
    fn test_decode_errors_keep_their_kind() {
        let err = decode_styles(r#"[{"name":"s","rules":[{"symbolizers":[{"type":"shield"}]}]}]"#)
            .unwrap_err();
        assert_eq!(
            RequestError::decode("style", err).kind(),
            ErrorKind::UnsupportedSymbolizerKind
        );

        let err = decode_styles("not json").unwrap_err();
        let err = RequestError::decode("style", err);
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().starts_with("parameter 'style': malformed JSON"));
    }

    #[test]
    fn test_compile_error_kind() {
        let err: RequestError = CompileError::UnknownZoomReference {
            style: "s".to_string(),
            rule: 0,
            kind: ThresholdKind::MaxScale,
            zoom: 4,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::UnknownZoomReference);
        assert_eq!(err.kind().http_status(), 400);
    }

    #[test]
    fn test_duplicate_parameter_name_is_malformed_input() {
        let err: RequestError = CompileError::DuplicateParameterName {
            symbolizer: crate::model::SymbolizerKind::Text,
            name: "size".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.kind().http_status(), 400);
    }

    #[test]
    fn test_render_error_kinds() {
        let failure: RequestError = RenderError::engine_failure("native", "code 3").into();
        assert_eq!(failure.kind(), ErrorKind::RenderEngineFailure);
        assert_eq!(failure.kind().http_status(), 500);

        let encoding: RequestError = RenderError::Encoding {
            format: "PNG".to_string(),
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(encoding.kind(), ErrorKind::EncodingFailure);
    }

    #[test]
    fn test_parameter_errors_are_malformed_input() {
        assert_eq!(
            RequestError::MissingParameter("width".to_string()).kind(),
            ErrorKind::MalformedInput
        );
        assert_eq!(
            RequestError::invalid("height", "must be positive").kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn test_timeout_kind() {
        let err = RequestError::Timeout(Duration::from_secs(30));
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.kind().http_status(), 504);
        assert_eq!(err.to_string(), "request timed out after 30s");
    }

    #[test]
    fn test_kind_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::UnknownLayerSourceKind).unwrap(),
            "\"UnknownLayerSourceKind\""
        );
        assert_eq!(ErrorKind::EncodingFailure.to_string(), "EncodingFailure");
    }
}
