//! Map document compiler.
//!
//! Turns styles, zoom thresholds and layers into one Mapnik-style XML map
//! document. Compilation has no shared state: identical inputs produce a
//! byte-identical document.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::log::{Logger, NoOpLogger};
use crate::model::{Layer, LayerSource, Rule, Style};
use crate::{log_debug, log_warn};

use super::error::CompileError;
use super::symbolizer::write_symbolizer;
use super::thresholds::{ScaleThresholds, ThresholdKind};
use super::writer::{attributes, esc, XmlWriter};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// A compiled map document, ready to hand to the render bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    text: String,
}

impl CompiledDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for CompiledDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compiles request data into map documents.
pub struct StyleCompiler {
    logger: Arc<dyn Logger>,
}

impl Default for StyleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleCompiler {
    /// Creates a compiler that does not log.
    pub fn new() -> Self {
        Self {
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Compiles a complete map document.
    ///
    /// The document declares one entity per zoom threshold, then lists every
    /// layer followed by every style.
    ///
    /// # Errors
    ///
    /// - [`CompileError::UnknownZoomReference`] if a rule's `minzoom` or
    ///   `maxzoom` is missing from the threshold table built from `zooms`
    /// - [`CompileError::InvalidParameterName`] from symbolizer emission
    pub fn compile(
        &self,
        styles: &[Style],
        zooms: &[f64],
        layers: &[Layer],
        srs: &str,
        background_color: &str,
    ) -> Result<CompiledDocument, CompileError> {
        let started = Instant::now();
        let thresholds = ScaleThresholds::build(zooms);

        let mut w = XmlWriter::new();
        w.line(XML_DECLARATION);
        thresholds.write_declarations(&mut w);

        w.open(&format!(
            "<Map {}>",
            attributes([("srs", srs), ("background-color", background_color)])
        ));
        for layer in layers {
            if !styles.iter().any(|s| s.name == layer.style_id) {
                log_warn!(
                    self.logger,
                    "Layer '{}' uses style '{}', which is not defined in this request",
                    layer.name,
                    layer.style_id
                );
            }
            write_layer(&mut w, layer);
        }
        for style in styles {
            write_style(&mut w, style, &thresholds)?;
        }
        w.close("</Map>");

        let text = w.finish();
        log_debug!(
            self.logger,
            "Compiled map document: {} layers, {} styles, {} thresholds, {} bytes in {:?}",
            layers.len(),
            styles.len(),
            thresholds.len(),
            text.len(),
            started.elapsed()
        );

        Ok(CompiledDocument { text })
    }
}

fn write_layer(w: &mut XmlWriter, layer: &Layer) {
    w.open(&format!(
        "<Layer {}>",
        attributes([
            ("name", layer.name.as_str()),
            ("status", layer.status.as_attr()),
            ("srs", layer.srs.as_str()),
        ])
    ));
    w.line(&format!("<StyleName>{}</StyleName>", esc(&layer.style_id)));

    w.open("<Datasource>");
    for (name, value) in datasource_parameters(&layer.source) {
        w.line(&format!(
            "<Parameter name=\"{}\">{}</Parameter>",
            name,
            esc(&value)
        ));
    }
    w.close("</Datasource>");
    w.close("</Layer>");
}

/// Datasource parameters in document order.
fn datasource_parameters(source: &LayerSource) -> Vec<(&'static str, String)> {
    match source {
        LayerSource::Database(db) => vec![
            ("type", db.source_type.clone()),
            ("host", db.host.clone()),
            ("port", db.port.to_string()),
            ("dbname", db.dbname.clone()),
            ("user", db.user.clone()),
            ("password", db.password.clone()),
            ("estimate_extent", db.estimate_extent.to_string()),
            ("table", db.table.clone()),
        ],
        LayerSource::File(file) => vec![
            ("type", file.source_type.clone()),
            ("file", file.path.clone()),
        ],
    }
}

fn write_style(
    w: &mut XmlWriter,
    style: &Style,
    thresholds: &ScaleThresholds,
) -> Result<(), CompileError> {
    w.open(&format!("<Style {}>", attributes([("name", style.name.as_str())])));
    for (index, rule) in style.rules.iter().enumerate() {
        write_rule(w, style, index, rule, thresholds)?;
    }
    w.close("</Style>");
    Ok(())
}

fn write_rule(
    w: &mut XmlWriter,
    style: &Style,
    index: usize,
    rule: &Rule,
    thresholds: &ScaleThresholds,
) -> Result<(), CompileError> {
    w.open("<Rule>");
    if let Some(filter) = &rule.filter {
        w.line(&format!("<Filter>{}</Filter>", esc(filter)));
    }

    // Max before min, always.
    let references = [
        (ThresholdKind::MaxScale, rule.maxzoom),
        (ThresholdKind::MinScale, rule.minzoom),
    ];
    for (kind, zoom) in references {
        let Some(zoom) = zoom else { continue };
        let threshold =
            thresholds
                .get(kind, zoom)
                .ok_or_else(|| CompileError::UnknownZoomReference {
                    style: style.name.clone(),
                    rule: index,
                    kind,
                    zoom,
                })?;
        w.line(&threshold.reference());
    }

    for symbolizer in &rule.symbolizers {
        write_symbolizer(w, symbolizer)?;
    }
    w.close("</Rule>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayerStatus, Symbolizer, SymbolizerKind};

    const MERCATOR: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 \
                            +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +no_defs +over";

    fn water_style(rule: Rule) -> Style {
        Style::new("water", vec![rule])
    }

    fn fill_rule() -> Rule {
        Rule::new(vec![Symbolizer::new(
            SymbolizerKind::Polygon,
            [("fill", "#ff0000")],
        )])
    }

    fn coast_layer() -> Layer {
        Layer::new(
            "coast",
            "water",
            "+init=epsg:4326",
            LayerSource::file("shape", "data/coast.shp"),
        )
    }

    fn compile(styles: &[Style], zooms: &[f64], layers: &[Layer]) -> Result<String, CompileError> {
        StyleCompiler::new()
            .compile(styles, zooms, layers, MERCATOR, "white")
            .map(CompiledDocument::into_string)
    }

    #[test]
    fn test_full_document_layout() {
        let doc = compile(
            &[water_style(fill_rule().with_maxzoom(0))],
            &[1000.0, 2000.0, 3000.0],
            &[coast_layer()],
        )
        .unwrap();

        let expected = format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <!DOCTYPE Map [\n\
             <!ENTITY maxscale_zoom0 \"<MaxScaleDenominator>1000</MaxScaleDenominator>\">\n\
             <!ENTITY maxscale_zoom1 \"<MaxScaleDenominator>2000</MaxScaleDenominator>\">\n\
             <!ENTITY minscale_zoom1 \"<MinScaleDenominator>3000</MinScaleDenominator>\">\n\
             ]>\n\
             <Map srs=\"{}\" background-color=\"white\">\n\
             \x20 <Layer name=\"coast\" status=\"on\" srs=\"+init=epsg:4326\">\n\
             \x20   <StyleName>water</StyleName>\n\
             \x20   <Datasource>\n\
             \x20     <Parameter name=\"type\">shape</Parameter>\n\
             \x20     <Parameter name=\"file\">data/coast.shp</Parameter>\n\
             \x20   </Datasource>\n\
             \x20 </Layer>\n\
             \x20 <Style name=\"water\">\n\
             \x20   <Rule>\n\
             \x20     &maxscale_zoom0;\n\
             \x20     <PolygonSymbolizer>\n\
             \x20       <CssParameter name=\"fill\">#ff0000</CssParameter>\n\
             \x20     </PolygonSymbolizer>\n\
             \x20   </Rule>\n\
             \x20 </Style>\n\
             </Map>\n",
            MERCATOR
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let styles = [water_style(
            fill_rule()
                .with_filter("[natural] = 'water'")
                .with_maxzoom(1)
                .with_minzoom(1),
        )];
        let zooms = [1000.0, 2000.0, 3000.0];
        let layers = [coast_layer()];

        let first = compile(&styles, &zooms, &layers).unwrap();
        for _ in 0..5 {
            assert_eq!(compile(&styles, &zooms, &layers).unwrap(), first);
        }
    }

    #[test]
    fn test_max_reference_precedes_min_reference() {
        let doc = compile(
            &[water_style(fill_rule().with_minzoom(1).with_maxzoom(1))],
            &[1000.0, 2000.0, 3000.0],
            &[],
        )
        .unwrap();

        let max = doc.find("&maxscale_zoom1;").unwrap();
        let min = doc.find("&minscale_zoom1;").unwrap();
        assert!(max < min);
    }

    #[test]
    fn test_filter_present_only_when_set() {
        let doc = compile(
            &[
                water_style(fill_rule().with_filter("[area] > 100 and [name] <> ''")),
                Style::new("plain", vec![fill_rule()]),
            ],
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(doc.matches("<Filter>").count(), 1);
        assert!(doc.contains("<Filter>[area] &gt; 100 and [name] &lt;&gt; &apos;&apos;</Filter>"));
    }

    #[test]
    fn test_unknown_max_zoom_reference() {
        let err = compile(
            &[water_style(fill_rule().with_maxzoom(2))],
            &[1000.0, 2000.0, 3000.0],
            &[],
        )
        .unwrap_err();

        assert_eq!(
            err,
            CompileError::UnknownZoomReference {
                style: "water".to_string(),
                rule: 0,
                kind: ThresholdKind::MaxScale,
                zoom: 2,
            }
        );
    }

    #[test]
    fn test_min_zoom_zero_is_never_defined() {
        let err = compile(
            &[water_style(fill_rule().with_minzoom(0))],
            &[1000.0, 2000.0, 3000.0],
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnknownZoomReference {
                kind: ThresholdKind::MinScale,
                zoom: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_short_zoom_lists_reject_any_reference() {
        for zooms in [&[][..], &[1000.0][..]] {
            let doc = compile(&[water_style(fill_rule())], zooms, &[]).unwrap();
            assert!(!doc.contains("<!DOCTYPE"));

            assert!(compile(&[water_style(fill_rule().with_maxzoom(0))], zooms, &[]).is_err());
            assert!(compile(&[water_style(fill_rule().with_minzoom(0))], zooms, &[]).is_err());
        }
    }

    #[test]
    fn test_database_parameters_in_order() {
        let layer = Layer::new(
            "roads",
            "road-style",
            "+init=epsg:3857",
            LayerSource::Database(crate::model::DatabaseSource {
                source_type: "postgis".to_string(),
                host: "localhost".to_string(),
                port: 5432,
                dbname: "osm".to_string(),
                user: "gis".to_string(),
                password: "p&ss".to_string(),
                estimate_extent: false,
                table: "(select * from roads where kind <> 'path') as r".to_string(),
            }),
        )
        .with_status(LayerStatus::Disabled);

        let doc = compile(&[], &[], &[layer]).unwrap();

        assert!(doc.contains("<Layer name=\"roads\" status=\"off\" srs=\"+init=epsg:3857\">"));
        let order = [
            "\"type\">postgis<",
            "\"host\">localhost<",
            "\"port\">5432<",
            "\"dbname\">osm<",
            "\"user\">gis<",
            "\"password\">p&amp;ss<",
            "\"estimate_extent\">false<",
            "\"table\">(select * from roads where kind &lt;&gt; &apos;path&apos;) as r<",
        ];
        let positions: Vec<usize> = order.iter().map(|p| doc.find(p).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_layers_before_styles_in_input_order() {
        let layers = [
            coast_layer(),
            Layer::new("lakes", "water", "x", LayerSource::file("shape", "lakes.shp")),
        ];
        let styles = [
            Style::new("water", vec![fill_rule()]),
            Style::new("land", vec![fill_rule()]),
        ];
        let doc = compile(&styles, &[], &layers).unwrap();

        let coast = doc.find("<Layer name=\"coast\"").unwrap();
        let lakes = doc.find("<Layer name=\"lakes\"").unwrap();
        let water = doc.find("<Style name=\"water\"").unwrap();
        let land = doc.find("<Style name=\"land\"").unwrap();
        assert!(coast < lakes && lakes < water && water < land);
    }

    #[test]
    fn test_symbolizer_error_propagates() {
        let rule = Rule::new(vec![Symbolizer::new(
            SymbolizerKind::Text,
            [("bad name", "x")],
        )]);
        let err = compile(&[water_style(rule)], &[], &[]).unwrap_err();
        assert!(matches!(err, CompileError::InvalidParameterName { .. }));
    }

    #[test]
    fn test_document_accessors() {
        let doc = StyleCompiler::default()
            .compile(&[], &[], &[], "+init=epsg:4326", "#fff")
            .unwrap();
        assert_eq!(doc.len(), doc.as_str().len());
        assert!(!doc.is_empty());
        assert_eq!(doc.to_string(), doc.as_str());
    }
}
