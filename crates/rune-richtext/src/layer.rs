//! The text layer record the host application stores and the editor
//! writes document content back into.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{parse_lines, Color, Document, Line, SpanMeta};
use crate::error::{DocumentError, Result};
use crate::layout::{
    Boundary, HorizontalAlign, LayoutConfig, TextDirection, VerticalAlign, WrapDirection,
    WrapGranularity,
};

/// How the layer rectangle relates to its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Fixed rectangle; text wraps at its edge.
    Box,
    /// The rectangle follows the text and nothing wraps.
    #[default]
    Dynamic,
}

/// Layout parameters stored on a text layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerParams {
    pub boundary: BoundaryMode,
    pub text_direction: TextDirection,
    pub wrap_direction: WrapDirection,
    pub wrap: WrapGranularity,
    pub halign: HorizontalAlign,
    pub valign: VerticalAlign,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            boundary: BoundaryMode::Dynamic,
            text_direction: TextDirection::Ltr,
            wrap_direction: TextDirection::Ttb,
            wrap: WrapGranularity::Letter,
            halign: HorizontalAlign::Left,
            valign: VerticalAlign::Top,
        }
    }
}

impl LayerParams {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            text_direction: self.text_direction,
            wrap_direction: self.wrap_direction,
            wrap: self.wrap,
            halign: self.halign,
            valign: self.valign,
        }
        .normalized()
    }
}

/// A text layer: position and size on the canvas, layout parameters and
/// the persisted line/span data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLayer {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub params: LayerParams,
    pub data: Vec<Line>,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::new(0.0, 0.0, &SpanMeta::default())
    }
}

/// Layer fields as found on disk, before the legacy check.
#[derive(Deserialize)]
struct RawLayer {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    params: Map<String, Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl TextLayer {
    /// A fresh layer at `(x, y)` holding one empty span styled with the
    /// new-text defaults.
    pub fn new(x: f32, y: f32, defaults: &SpanMeta) -> Self {
        Self {
            x,
            y,
            width: 0.0,
            height: 0.0,
            params: LayerParams::default(),
            data: vec![Line::from_text("", defaults.clone().canonical())],
        }
    }

    /// Boundary the layout engine works in.
    pub fn boundary(&self) -> Boundary {
        let auto = self.params.boundary == BoundaryMode::Dynamic;
        Boundary {
            width: self.width,
            height: self.height,
            auto_width: auto,
            auto_height: auto,
        }
    }

    pub fn document(&self) -> Document {
        Document::from_lines(self.data.clone())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a layer in the current format or the legacy single-style one.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawLayer = serde_json::from_value(value)?;
        if raw.params.contains_key("text") {
            return Self::from_legacy(raw);
        }

        let params: LayerParams = serde_json::from_value(Value::Object(raw.params))?;
        let data = match raw.data {
            None => vec![Line::default()],
            Some(Value::Array(raw_lines)) => {
                let document = Document::try_from_lines(parse_lines(&raw_lines)?)?;
                document.lines().to_vec()
            }
            Some(_) => return Err(DocumentError::MissingLines),
        };
        Ok(Self {
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            params,
            data,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One span per text line carrying the layer-wide style.
    fn from_legacy(raw: RawLayer) -> Result<Self> {
        let params = &raw.params;
        let text = legacy_str(params, "text")?.unwrap_or_default();
        let stroke = legacy_bool(params, "stroke")?.unwrap_or(false);
        let color = match &raw.color {
            Some(color) => Some(color.clone()),
            None => legacy_str(params, "color")?,
        };
        let color = color
            .map(|color| {
                color.parse::<Color>().map_err(|error| DocumentError::InvalidParam {
                    name: "color".to_string(),
                    reason: error.to_string(),
                })
            })
            .transpose()?;

        let mut meta = SpanMeta {
            family: legacy_str(params, "family")?,
            size: legacy_f32(params, "size")?,
            bold: legacy_bool(params, "bold")?,
            italic: legacy_bool(params, "italic")?,
            ..Default::default()
        };
        if stroke {
            meta.fill_color = Some(Color::TRANSPARENT);
            meta.stroke_color = Some(color.unwrap_or(Color::TRANSPARENT));
            meta.stroke_size = legacy_f32(params, "stroke_size")?;
        } else {
            meta.fill_color = color;
            meta.stroke_color = Some(Color::TRANSPARENT);
            meta.stroke_size = Some(0.0);
        }
        meta.canonicalize();

        let halign = match legacy_str(params, "align")? {
            Some(align) => align
                .parse::<HorizontalAlign>()
                .map_err(|error| DocumentError::InvalidParam {
                    name: "align".to_string(),
                    reason: error.to_string(),
                })?,
            None => HorizontalAlign::Left,
        };

        let data = text
            .split('\n')
            .map(|line| Line::from_text(line.trim_end_matches('\r'), meta.clone()))
            .collect();
        tracing::debug!("converted legacy text layer");

        Ok(Self {
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            params: LayerParams {
                boundary: BoundaryMode::Box,
                text_direction: TextDirection::Ltr,
                wrap_direction: TextDirection::Ttb,
                wrap: WrapGranularity::Word,
                halign,
                valign: VerticalAlign::Top,
            },
            data,
        })
    }
}

/// A legacy parameter, either stored bare or as `{ "value": ... }`.
fn legacy_param<'a>(params: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    match params.get(name)? {
        Value::Null => None,
        Value::Object(object) => object.get("value").filter(|value| !value.is_null()),
        value => Some(value),
    }
}

fn invalid(name: &str, expected: &str) -> DocumentError {
    DocumentError::InvalidParam {
        name: name.to_string(),
        reason: format!("expected {expected}"),
    }
}

fn legacy_str(params: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    legacy_param(params, name)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(name, "a string"))
        })
        .transpose()
}

fn legacy_f32(params: &Map<String, Value>, name: &str) -> Result<Option<f32>> {
    legacy_param(params, name)
        .map(|value| {
            let number = match value {
                Value::Number(number) => number.as_f64().map(|n| n as f32),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            };
            number.ok_or_else(|| invalid(name, "a number"))
        })
        .transpose()
}

fn legacy_bool(params: &Map<String, Value>, name: &str) -> Result<Option<bool>> {
    legacy_param(params, name)
        .map(|value| value.as_bool().ok_or_else(|| invalid(name, "a boolean")))
        .transpose()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::{Span, DEFAULT_FILL_COLOR};

    #[test]
    fn test_new_layer_defaults() {
        let layer = TextLayer::new(5.0, 6.0, &SpanMeta::default());
        assert_eq!(layer.params.boundary, BoundaryMode::Dynamic);
        assert_eq!(layer.params.wrap, WrapGranularity::Letter);
        assert_eq!(layer.params.wrap_direction, TextDirection::Ttb);
        assert_eq!(layer.data, vec![Line::default()]);
        assert!(layer.boundary().auto_width);
    }

    #[test]
    fn test_new_layer_drops_default_style() {
        let defaults = SpanMeta {
            family: Some("Arial".to_string()),
            size: Some(24.0),
            ..Default::default()
        };
        let layer = TextLayer::new(0.0, 0.0, &defaults);
        let meta = &layer.data[0].spans()[0].meta;
        assert_eq!(meta.family, None);
        assert_eq!(meta.size, Some(24.0));
    }

    #[test]
    fn test_load_current_format() {
        let layer = TextLayer::from_value(json!({
            "x": 10, "y": 20, "width": 200, "height": 50,
            "params": {"boundary": "box", "wrap": "word", "halign": "center"},
            "data": [[{"text": "Hi", "meta": {"bold": true}}], [{"text": ""}]],
        }))
        .unwrap();
        assert_eq!(layer.x, 10.0);
        assert_eq!(layer.params.boundary, BoundaryMode::Box);
        assert_eq!(layer.params.halign, HorizontalAlign::Center);
        assert_eq!(layer.params.valign, VerticalAlign::Top);
        assert_eq!(layer.data.len(), 2);
        assert_eq!(layer.data[0].spans()[0].meta.bold, Some(true));
        assert_eq!(layer.boundary(), Boundary::fixed(200.0, 50.0));
    }

    #[test]
    fn test_malformed_data_is_rejected() {
        let error = TextLayer::from_value(json!({"data": [[{"text": 5}]]})).unwrap_err();
        assert!(matches!(error, DocumentError::InvalidSpan { line: 0, span: 0, .. }));

        let error = TextLayer::from_value(json!({"data": [[]]})).unwrap_err();
        assert!(matches!(error, DocumentError::EmptyLine { line: 0 }));

        let error = TextLayer::from_value(json!({"data": "text"})).unwrap_err();
        assert!(matches!(error, DocumentError::MissingLines));

        assert!(TextLayer::from_json("{").is_err());
    }

    #[test]
    fn test_legacy_import() {
        let layer = TextLayer::from_value(json!({
            "x": 1, "y": 2, "width": 300, "height": 100,
            "color": "#ff0000",
            "params": {
                "text": "Hello\nWorld",
                "family": {"value": "Verdana"},
                "size": 24,
                "bold": true,
                "italic": false,
                "stroke": false,
                "stroke_size": 3,
                "align": {"value": "Right"},
            },
        }))
        .unwrap();

        assert_eq!(layer.params.boundary, BoundaryMode::Box);
        assert_eq!(layer.params.wrap, WrapGranularity::Word);
        assert_eq!(layer.params.halign, HorizontalAlign::Right);
        assert_eq!(layer.params.valign, VerticalAlign::Top);
        assert_eq!(layer.data.len(), 2);

        let expected = SpanMeta {
            family: Some("Verdana".to_string()),
            size: Some(24.0),
            bold: Some(true),
            fill_color: Some(Color::rgb(0xff, 0, 0)),
            stroke_color: Some(Color::TRANSPARENT),
            ..Default::default()
        };
        assert_eq!(layer.data[0].spans(), &[Span::new("Hello", expected.clone())]);
        assert_eq!(layer.data[1].spans(), &[Span::new("World", expected)]);
    }

    #[test]
    fn test_legacy_stroke_import() {
        let layer = TextLayer::from_value(json!({
            "color": "#0000ff",
            "params": {"text": "Outline", "stroke": true, "stroke_size": 2},
        }))
        .unwrap();
        let meta = &layer.data[0].spans()[0].meta;
        assert_eq!(meta.fill_color, Some(Color::TRANSPARENT));
        assert_eq!(meta.stroke_color, Some(Color::rgb(0, 0, 0xff)));
        assert_eq!(meta.stroke_size, Some(2.0));
        assert_eq!(layer.params.halign, HorizontalAlign::Left);
        assert_ne!(meta.resolve().fill_color, DEFAULT_FILL_COLOR);
    }

    #[test]
    fn test_legacy_bad_param() {
        let error = TextLayer::from_value(json!({
            "params": {"text": "x", "size": true},
        }))
        .unwrap_err();
        assert!(matches!(error, DocumentError::InvalidParam { ref name, .. } if name == "size"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut layer = TextLayer::new(3.0, 4.0, &SpanMeta::default());
        layer.data = vec![Line::from_text(
            "abc",
            SpanMeta {
                underline: Some(true),
                ..Default::default()
            },
        )];
        let json = layer.to_json().unwrap();
        assert!(json.contains(r#""boundary":"dynamic""#));
        let loaded = TextLayer::from_json(&json).unwrap();
        assert_eq!(loaded, layer);
    }
}
