//! Indenting line writer for the map document.

use std::borrow::Cow;

use quick_xml::escape::escape;

const INDENT: &str = "  ";

/// Accumulates document lines at the current nesting depth.
#[derive(Debug, Default)]
pub(crate) struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth.
    pub(crate) fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes an opening tag and nests subsequent lines under it.
    pub(crate) fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    /// Leaves one level of nesting and writes the closing tag.
    pub(crate) fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Escapes `& < > " '` for use in attribute values and element content.
///
/// Tab, line feed and carriage return become character references so that
/// attribute-value and line-end normalization leave them intact.
pub(crate) fn esc(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// `name="value"` pairs joined by spaces, values escaped.
pub(crate) fn attributes<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, esc(value)))
        .collect::<Vec<_>>()
        .join(" ")
}
