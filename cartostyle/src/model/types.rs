//! Typed map data model.
//!
//! Everything here is request-scoped: built from decoded parameters, handed
//! to the compiler, then dropped.

use std::fmt;
use std::str::FromStr;

use super::DecodeError;

/// Drawing instruction family of a [`Symbolizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolizerKind {
    /// Area fill (`PolygonSymbolizer`)
    Polygon,
    /// Area fill from an image pattern (`PolygonPatternSymbolizer`)
    PolygonPattern,
    /// Stroke (`LineSymbolizer`)
    Line,
    /// Label (`TextSymbolizer`)
    Text,
}

impl SymbolizerKind {
    /// Name used in style JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolizerKind::Polygon => "polygon",
            SymbolizerKind::PolygonPattern => "polygon-pattern",
            SymbolizerKind::Line => "line",
            SymbolizerKind::Text => "text",
        }
    }
}

impl fmt::Display for SymbolizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolizerKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polygon" => Ok(SymbolizerKind::Polygon),
            "polygon-pattern" => Ok(SymbolizerKind::PolygonPattern),
            "line" => Ok(SymbolizerKind::Line),
            "text" => Ok(SymbolizerKind::Text),
            other => Err(DecodeError::UnsupportedSymbolizerKind(other.to_string())),
        }
    }
}

/// One drawing instruction attached to a rule.
///
/// Parameters keep their insertion order so that compiled documents are
/// reproducible byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbolizer {
    kind: SymbolizerKind,
    params: Vec<(String, String)>,
}

impl Symbolizer {
    pub fn new<N, V>(kind: SymbolizerKind, params: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            kind,
            params: params
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub fn kind(&self) -> SymbolizerKind {
        self.kind
    }

    /// Ordered `(name, value)` pairs.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// A filter plus optional zoom window and the symbolizers drawn when it
/// matches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rule {
    pub filter: Option<String>,
    /// Index into the min-scale threshold table
    pub minzoom: Option<usize>,
    /// Index into the max-scale threshold table
    pub maxzoom: Option<usize>,
    pub symbolizers: Vec<Symbolizer>,
}

impl Rule {
    pub fn new(symbolizers: Vec<Symbolizer>) -> Self {
        Self {
            symbolizers,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_minzoom(mut self, zoom: usize) -> Self {
        self.minzoom = Some(zoom);
        self
    }

    pub fn with_maxzoom(mut self, zoom: usize) -> Self {
        self.maxzoom = Some(zoom);
        self
    }
}

/// A named, ordered list of rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Style {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

/// Whether the engine draws a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerStatus {
    #[default]
    Enabled,
    Disabled,
}

impl LayerStatus {
    /// Value of the `status` attribute in the map document.
    pub fn as_attr(&self) -> &'static str {
        match self {
            LayerStatus::Enabled => "on",
            LayerStatus::Disabled => "off",
        }
    }
}

/// Connection parameters of a database-backed layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSource {
    /// Datasource plugin, e.g. `postgis`
    pub source_type: String,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub estimate_extent: bool,
    /// Table name or a parenthesised sub-query
    pub table: String,
}

/// A layer read from a file on the engine host.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSource {
    /// Datasource plugin, e.g. `shape` or `gdal`
    pub source_type: String,
    pub path: String,
}

/// Where a layer's features come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSource {
    Database(DatabaseSource),
    File(FileSource),
}

impl LayerSource {
    pub fn file(source_type: impl Into<String>, path: impl Into<String>) -> Self {
        LayerSource::File(FileSource {
            source_type: source_type.into(),
            path: path.into(),
        })
    }
}

/// A drawable layer: datasource plus the style used to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    /// Name of the [`Style`] applied to this layer
    pub style_id: String,
    pub srs: String,
    pub status: LayerStatus,
    pub source: LayerSource,
}

impl Layer {
    pub fn new(
        name: impl Into<String>,
        style_id: impl Into<String>,
        srs: impl Into<String>,
        source: LayerSource,
    ) -> Self {
        Self {
            name: name.into(),
            style_id: style_id.into(),
            srs: srs.into(),
            status: LayerStatus::Enabled,
            source,
        }
    }

    pub fn with_status(mut self, status: LayerStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolizer_kind_from_str() {
        assert_eq!(
            "polygon-pattern".parse::<SymbolizerKind>().unwrap(),
            SymbolizerKind::PolygonPattern
        );
        assert_eq!("text".parse::<SymbolizerKind>().unwrap(), SymbolizerKind::Text);
    }

    #[test]
    fn test_symbolizer_kind_rejects_unknown() {
        let err = "marker".parse::<SymbolizerKind>().unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedSymbolizerKind(ref k) if k == "marker"));
    }

    #[test]
    fn test_symbolizer_kind_display_roundtrips() {
        for kind in [
            SymbolizerKind::Polygon,
            SymbolizerKind::PolygonPattern,
            SymbolizerKind::Line,
            SymbolizerKind::Text,
        ] {
            assert_eq!(kind.to_string().parse::<SymbolizerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_symbolizer_keeps_param_order() {
        let sym = Symbolizer::new(
            SymbolizerKind::Line,
            [("stroke", "#000"), ("stroke-width", "2"), ("opacity", "0.5")],
        );
        let names: Vec<&str> = sym.params().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["stroke", "stroke-width", "opacity"]);
    }

    #[test]
    fn test_rule_builder() {
        let rule = Rule::new(vec![])
            .with_filter("[type] = 'lake'")
            .with_maxzoom(2)
            .with_minzoom(1);
        assert_eq!(rule.filter.as_deref(), Some("[type] = 'lake'"));
        assert_eq!(rule.maxzoom, Some(2));
        assert_eq!(rule.minzoom, Some(1));
    }

    #[test]
    fn test_layer_status_attr() {
        assert_eq!(LayerStatus::Enabled.as_attr(), "on");
        assert_eq!(LayerStatus::Disabled.as_attr(), "off");
        assert_eq!(LayerStatus::default(), LayerStatus::Enabled);
    }

    #[test]
    fn test_layer_defaults_to_enabled() {
        let layer = Layer::new("roads", "road-style", "+init=epsg:3857", LayerSource::file("shape", "roads.shp"));
        assert_eq!(layer.status, LayerStatus::Enabled);
        let layer = layer.with_status(LayerStatus::Disabled);
        assert_eq!(layer.status, LayerStatus::Disabled);
    }
}
