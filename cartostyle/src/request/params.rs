//! Request parameter decoding.
//!
//! The transport hands over raw `(name, value)` pairs; [`TileParams::decode`]
//! turns them into a typed [`RenderJob`] or a `MalformedInput`-class error.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::RenderSettings;
use crate::coord::BoundingBox;
use crate::model::{
    check_document_text, decode_layers, decode_styles, decode_zooms, Layer, Style,
};
use crate::render::RenderRequest;

use super::error::RequestError;

pub const PARAM_STYLE: &str = "style";
pub const PARAM_ZOOMS: &str = "zooms";
pub const PARAM_LAYERS: &str = "layers";
pub const PARAM_SRS: &str = "srs";
pub const PARAM_BGCOLOR: &str = "bgcolor";
pub const PARAM_WIDTH: &str = "width";
pub const PARAM_HEIGHT: &str = "height";
pub const PARAM_LON0: &str = "lon0";
pub const PARAM_LAT0: &str = "lat0";
pub const PARAM_LON1: &str = "lon1";
pub const PARAM_LAT1: &str = "lat1";

/// Raw request parameters, by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileParams {
    values: BTreeMap<String, String>,
}

impl TileParams {
    /// Collects already URL-decoded query pairs. A repeated name keeps its
    /// last value.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reads parameters from a JSON object.
    ///
    /// String members are taken verbatim; any other member (for example an
    /// inline `style` array) is re-serialized to its JSON text.
    pub fn from_json(text: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| RequestError::decode("job", e.into()))?;
        let Value::Object(members) = value else {
            return Err(RequestError::invalid("job", "expected a JSON object"));
        };
        Ok(Self::from_query(members.into_iter().map(|(k, v)| {
            let text = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, text)
        })))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    fn required(&self, name: &str) -> Result<&str, RequestError> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RequestError::MissingParameter(name.to_string()))
    }

    fn coordinate(&self, name: &str) -> Result<f64, RequestError> {
        let raw = self.required(name)?;
        raw.parse::<f64>()
            .map_err(|_| RequestError::invalid(name, format!("'{}' is not a number", raw)))
    }

    fn dimension(&self, name: &str, max: u32) -> Result<u32, RequestError> {
        let raw = self.required(name)?;
        let value: u32 = raw
            .parse()
            .map_err(|_| RequestError::invalid(name, format!("'{}' is not a positive integer", raw)))?;
        if value == 0 {
            return Err(RequestError::invalid(name, "must be greater than zero"));
        }
        if value > max {
            return Err(RequestError::invalid(
                name,
                format!("{} exceeds the limit of {}", value, max),
            ));
        }
        Ok(value)
    }

    /// Decodes every parameter into a [`RenderJob`].
    ///
    /// `srs` and `bgcolor` fall back to `settings`; everything else is
    /// required. `width`/`height` are capped by the configured maxima.
    pub fn decode(&self, settings: &RenderSettings) -> Result<RenderJob, RequestError> {
        let styles = decode_styles(self.required(PARAM_STYLE)?)
            .map_err(|e| RequestError::decode(PARAM_STYLE, e))?;
        if styles.is_empty() {
            return Err(RequestError::invalid(PARAM_STYLE, "at least one style is required"));
        }

        let zooms = decode_zooms(self.required(PARAM_ZOOMS)?)
            .map_err(|e| RequestError::decode(PARAM_ZOOMS, e))?;

        let layers = decode_layers(self.required(PARAM_LAYERS)?)
            .map_err(|e| RequestError::decode(PARAM_LAYERS, e))?;
        if layers.is_empty() {
            return Err(RequestError::invalid(PARAM_LAYERS, "at least one layer is required"));
        }

        let srs = self
            .get(PARAM_SRS)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(settings.srs.as_str())
            .to_string();
        let background_color = self
            .get(PARAM_BGCOLOR)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(settings.background_color.as_str())
            .to_string();
        for (name, value) in [(PARAM_SRS, &srs), (PARAM_BGCOLOR, &background_color)] {
            check_document_text(name, value).map_err(|e| RequestError::decode(name, e))?;
        }

        let width = self.dimension(PARAM_WIDTH, settings.max_width)?;
        let height = self.dimension(PARAM_HEIGHT, settings.max_height)?;

        let bbox = BoundingBox::new(
            self.coordinate(PARAM_LON0)?,
            self.coordinate(PARAM_LAT0)?,
            self.coordinate(PARAM_LON1)?,
            self.coordinate(PARAM_LAT1)?,
        )
        .map_err(|e| RequestError::invalid("bbox", e.to_string()))?;

        Ok(RenderJob {
            styles,
            zooms,
            layers,
            srs,
            background_color,
            width,
            height,
            bbox,
        })
    }
}

/// A fully decoded render request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub styles: Vec<Style>,
    pub zooms: Vec<f64>,
    pub layers: Vec<Layer>,
    pub srs: String,
    pub background_color: String,
    pub width: u32,
    pub height: u32,
    pub bbox: BoundingBox,
}

impl RenderJob {
    /// Raster parameters for the render bridge.
    pub fn render_request(&self) -> RenderRequest {
        RenderRequest {
            width: self.width,
            height: self.height,
            bbox: self.bbox,
            background_color: self.background_color.clone(),
            srs: self.srs.clone(),
        }
    }
}
