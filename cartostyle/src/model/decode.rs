//! JSON → typed model decoding.
//!
//! Request parameters arrive as JSON text. They are first deserialized into
//! the private `*Def` shapes below, then converted into the typed model.
//! Shape problems surface as [`DecodeError::Json`] / [`DecodeError::Invalid`];
//! unknown symbolizer and datasource kinds get their own variants so callers
//! can report them precisely.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::{
    DatabaseSource, FileSource, Layer, LayerSource, LayerStatus, Rule, Style, Symbolizer,
    SymbolizerKind,
};
use super::DecodeError;

/// PostgreSQL's default port, used when a database layer omits `port`.
const DEFAULT_DATABASE_PORT: u16 = 5432;

#[derive(Deserialize)]
struct StyleDef {
    name: String,
    #[serde(default)]
    rules: Vec<RuleDef>,
}

#[derive(Deserialize)]
struct RuleDef {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    minzoom: Option<usize>,
    #[serde(default)]
    maxzoom: Option<usize>,
    #[serde(default)]
    symbolizers: Vec<SymbolizerDef>,
}

#[derive(Deserialize)]
struct SymbolizerDef {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    params: ParamsDef,
}

/// Either `[["fill", "#f00"], ...]` or `{"fill": "#f00", ...}`.
///
/// Object key order is the document order (`preserve_order`).
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamsDef {
    Pairs(Vec<(String, Value)>),
    Object(Map<String, Value>),
}

impl Default for ParamsDef {
    fn default() -> Self {
        ParamsDef::Pairs(Vec::new())
    }
}

#[derive(Deserialize)]
struct LayerDef {
    name: String,
    #[serde(alias = "styleId", alias = "style_id")]
    style: String,
    srs: String,
    #[serde(default)]
    status: Option<StatusDef>,
    source: SourceDef,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusDef {
    Flag(bool),
    Text(String),
}

#[derive(Deserialize)]
struct SourceDef {
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct DatabaseDef {
    #[serde(rename = "type")]
    source_type: String,
    host: String,
    #[serde(default)]
    port: Option<PortDef>,
    dbname: String,
    user: String,
    #[serde(default)]
    password: String,
    #[serde(default, alias = "estimateExtent")]
    estimate_extent: bool,
    table: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortDef {
    Number(u16),
    Text(String),
}

#[derive(Deserialize)]
struct FileDef {
    #[serde(rename = "type")]
    source_type: String,
    #[serde(alias = "file")]
    path: String,
}

/// Decode the `style` parameter: a JSON array of styles.
pub fn decode_styles(json: &str) -> Result<Vec<Style>, DecodeError> {
    let defs: Vec<StyleDef> = serde_json::from_str(json)?;
    defs.into_iter().map(style_from_def).collect()
}

/// Decode the `layers` parameter: a JSON array of layers.
pub fn decode_layers(json: &str) -> Result<Vec<Layer>, DecodeError> {
    let defs: Vec<LayerDef> = serde_json::from_str(json)?;
    defs.into_iter().map(layer_from_def).collect()
}

/// Decode the `zooms` parameter: a JSON array of scale denominators.
pub fn decode_zooms(json: &str) -> Result<Vec<f64>, DecodeError> {
    let zooms: Vec<f64> = serde_json::from_str(json)?;
    if let Some(bad) = zooms.iter().find(|z| !z.is_finite() || **z < 0.0) {
        return Err(DecodeError::Invalid {
            field: "zooms".to_string(),
            reason: format!("scale denominator {} must be a non-negative number", bad),
        });
    }
    Ok(zooms)
}

/// Rejects characters XML 1.0 cannot carry, escaped or not: C0 controls
/// other than tab, LF and CR, and the noncharacters U+FFFE and U+FFFF.
pub fn check_document_text(field: &str, value: &str) -> Result<(), DecodeError> {
    let illegal = value.chars().find(|&c| {
        matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}')
            || matches!(c, '\u{FFFE}' | '\u{FFFF}')
    });
    match illegal {
        Some(c) => Err(DecodeError::Invalid {
            field: field.to_string(),
            reason: format!("contains U+{:04X}, which XML documents cannot carry", u32::from(c)),
        }),
        None => Ok(()),
    }
}

fn style_from_def(def: StyleDef) -> Result<Style, DecodeError> {
    check_document_text("style name", &def.name)?;
    let rules = def
        .rules
        .into_iter()
        .map(rule_from_def)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Style::new(def.name, rules))
}

fn rule_from_def(def: RuleDef) -> Result<Rule, DecodeError> {
    let symbolizers = def
        .symbolizers
        .into_iter()
        .map(symbolizer_from_def)
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(filter) = &def.filter {
        check_document_text("rule filter", filter)?;
    }
    Ok(Rule {
        filter: def.filter,
        minzoom: def.minzoom,
        maxzoom: def.maxzoom,
        symbolizers,
    })
}

fn symbolizer_from_def(def: SymbolizerDef) -> Result<Symbolizer, DecodeError> {
    let kind: SymbolizerKind = def.kind.parse()?;
    let raw: Vec<(String, Value)> = match def.params {
        ParamsDef::Pairs(pairs) => pairs,
        ParamsDef::Object(map) => map.into_iter().collect(),
    };
    let params = raw
        .into_iter()
        .map(|(name, value)| {
            let text = scalar_text(&value).ok_or_else(|| DecodeError::Invalid {
                field: format!("{} symbolizer parameter '{}'", kind, name),
                reason: "value must be a string, number or boolean".to_string(),
            })?;
            let field = format!("{} symbolizer parameter", kind);
            check_document_text(&field, &name)?;
            check_document_text(&field, &text)?;
            Ok((name, text))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    Ok(Symbolizer::new(kind, params))
}

fn layer_from_def(def: LayerDef) -> Result<Layer, DecodeError> {
    check_document_text("layer name", &def.name)?;
    check_document_text(&format!("layer '{}' style", def.name), &def.style)?;
    check_document_text(&format!("layer '{}' srs", def.name), &def.srs)?;
    let status = match def.status {
        None => LayerStatus::Enabled,
        Some(StatusDef::Flag(true)) => LayerStatus::Enabled,
        Some(StatusDef::Flag(false)) => LayerStatus::Disabled,
        Some(StatusDef::Text(text)) => match text.to_lowercase().as_str() {
            "on" | "enabled" => LayerStatus::Enabled,
            "off" | "disabled" => LayerStatus::Disabled,
            _ => {
                return Err(DecodeError::Invalid {
                    field: format!("layer '{}' status", def.name),
                    reason: format!("'{}' is not one of on, off, enabled, disabled", text),
                })
            }
        },
    };
    let source = source_from_def(&def.name, def.source)?;
    Ok(Layer::new(def.name, def.style, def.srs, source).with_status(status))
}

fn source_from_def(layer: &str, def: SourceDef) -> Result<LayerSource, DecodeError> {
    for (key, value) in &def.fields {
        if let Value::String(text) = value {
            check_document_text(&format!("layer '{}' source {}", layer, key), text)?;
        }
    }
    let fields = Value::Object(def.fields);
    match def.kind.as_str() {
        "database" => {
            let db: DatabaseDef = serde_json::from_value(fields)?;
            let port = match db.port {
                None => DEFAULT_DATABASE_PORT,
                Some(PortDef::Number(port)) => port,
                Some(PortDef::Text(text)) => {
                    text.trim().parse().map_err(|_| DecodeError::Invalid {
                        field: format!("layer '{}' port", layer),
                        reason: format!("'{}' is not a valid port number", text),
                    })?
                }
            };
            Ok(LayerSource::Database(DatabaseSource {
                source_type: db.source_type,
                host: db.host,
                port,
                dbname: db.dbname,
                user: db.user,
                password: db.password,
                estimate_extent: db.estimate_extent,
                table: db.table,
            }))
        }
        "file" => {
            let file: FileDef = serde_json::from_value(fields)?;
            Ok(LayerSource::File(FileSource {
                source_type: file.source_type,
                path: file.path,
            }))
        }
        other => Err(DecodeError::UnknownLayerSourceKind {
            layer: layer.to_string(),
            kind: other.to_string(),
        }),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
