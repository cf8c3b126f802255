//! Style download.
//!
//! Clients post their style JSON back to get it as a tidy, downloadable
//! file.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use super::error::RequestError;

/// File name suggested to the browser.
pub const EXPORT_FILE_NAME: &str = "map_style.json";

const EXPORT_INDENT: &[u8] = b"   ";

/// A style document ready to send as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleExport {
    pub body: Vec<u8>,
}

impl StyleExport {
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "Content-Disposition",
                format!("attachment; filename={}", EXPORT_FILE_NAME),
            ),
            ("Content-Type", "application/json".to_string()),
            ("Content-Length", self.len().to_string()),
        ]
    }
}

/// Re-parses `data` and pretty-prints it with three-space indentation.
///
/// Key order is kept as submitted.
pub fn export_style(data: &str) -> Result<StyleExport, RequestError> {
    let value: Value =
        serde_json::from_str(data).map_err(|e| RequestError::decode("data", e.into()))?;

    let mut body = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(EXPORT_INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|e| RequestError::decode("data", e.into()))?;

    Ok(StyleExport { body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ErrorKind;

    #[test]
    fn test_three_space_indent() {
        let export = export_style(r#"[{"name":"water","rules":[]}]"#).unwrap();
        assert_eq!(
            String::from_utf8(export.body).unwrap(),
            "[\n   {\n      \"name\": \"water\",\n      \"rules\": []\n   }\n]"
        );
    }

    #[test]
    fn test_key_order_preserved() {
        let export = export_style(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
        let text = String::from_utf8(export.body).unwrap();

        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        let mid = text.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_attachment_headers() {
        let export = export_style("[]").unwrap();
        let headers = export.headers();

        assert_eq!(
            headers[0],
            ("Content-Disposition", "attachment; filename=map_style.json".to_string())
        );
        assert_eq!(headers[1], ("Content-Type", "application/json".to_string()));
        assert_eq!(headers[2], ("Content-Length", export.len().to_string()));
        assert_eq!(export.body, b"[]");
    }

    #[test]
    fn test_invalid_json_is_malformed_input() {
        let err = export_style("{\"name\":").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
}
