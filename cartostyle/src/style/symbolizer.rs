//! Symbolizer emission.
//!
//! Polygon and line symbolizers are wrapper elements with one
//! `<CssParameter>` child per parameter; polygon-pattern and text symbolizers
//! are single self-closing elements carrying the parameters as attributes.

use std::collections::HashSet;

use crate::model::{Symbolizer, SymbolizerKind};

use super::error::CompileError;
use super::writer::{attributes, esc, XmlWriter};

/// How a symbolizer's parameters are laid out in the document.
enum Layout {
    CssParameters,
    Attributes,
}

fn element_name(kind: SymbolizerKind) -> &'static str {
    match kind {
        SymbolizerKind::Polygon => "PolygonSymbolizer",
        SymbolizerKind::PolygonPattern => "PolygonPatternSymbolizer",
        SymbolizerKind::Line => "LineSymbolizer",
        SymbolizerKind::Text => "TextSymbolizer",
    }
}

fn layout(kind: SymbolizerKind) -> Layout {
    match kind {
        SymbolizerKind::Polygon | SymbolizerKind::Line => Layout::CssParameters,
        SymbolizerKind::PolygonPattern | SymbolizerKind::Text => Layout::Attributes,
    }
}

/// XML 1.0 `NameStartChar`, without the namespace separator `:`.
fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | '_'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// XML 1.0 `NameChar`, without `:`.
fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Whether `name` can stand as an XML attribute name.
fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// Checks attribute-style parameter names: each must be a valid XML name
/// and appear once.
fn check_attribute_names(symbolizer: &Symbolizer) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for (name, _) in symbolizer.params() {
        if !is_attribute_name(name) {
            return Err(CompileError::InvalidParameterName {
                symbolizer: symbolizer.kind(),
                name: name.clone(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(CompileError::DuplicateParameterName {
                symbolizer: symbolizer.kind(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

/// Emits one symbolizer as a standalone document fragment.
///
/// # Errors
///
/// [`CompileError::InvalidParameterName`] when an attribute-style
/// symbolizer carries a parameter name that cannot be an attribute, and
/// [`CompileError::DuplicateParameterName`] when it repeats one.
pub fn emit(symbolizer: &Symbolizer) -> Result<String, CompileError> {
    let mut w = XmlWriter::new();
    write_symbolizer(&mut w, symbolizer)?;
    Ok(w.finish())
}

pub(crate) fn write_symbolizer(
    w: &mut XmlWriter,
    symbolizer: &Symbolizer,
) -> Result<(), CompileError> {
    let element = element_name(symbolizer.kind());
    let params = symbolizer.params();

    match layout(symbolizer.kind()) {
        Layout::CssParameters if params.is_empty() => w.line(&format!("<{}/>", element)),
        Layout::CssParameters => {
            w.open(&format!("<{}>", element));
            for (name, value) in params {
                w.line(&format!(
                    "<CssParameter name=\"{}\">{}</CssParameter>",
                    esc(name),
                    esc(value)
                ));
            }
            w.close(&format!("</{}>", element));
        }
        Layout::Attributes if params.is_empty() => w.line(&format!("<{}/>", element)),
        Layout::Attributes => {
            check_attribute_names(symbolizer)?;
            let attrs = attributes(params.iter().map(|(n, v)| (n.as_str(), v.as_str())));
            w.line(&format!("<{} {}/>", element, attrs));
        }
    }
    Ok(())
}
