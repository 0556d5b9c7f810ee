use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;

pub const DEFAULT_SIZE: f32 = 40.0;
pub const DEFAULT_FAMILY: &str = "Arial";
pub const DEFAULT_KERNING: f32 = 0.0;
pub const DEFAULT_FILL_COLOR: Color = Color::rgb(0x00, 0x88, 0x00);
pub const DEFAULT_STROKE_SIZE: f32 = 0.0;
pub const DEFAULT_STROKE_COLOR: Color = Color::rgb(0x00, 0x00, 0x00);

/// An sRGB color with alpha, persisted as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent white, used to switch off fill or stroke.
    pub const TRANSPARENT: Color = Color::rgba(0xff, 0xff, 0xff, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let parsed = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(0xff)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (byte(0), byte(2), byte(4), Ok(0xff)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(err()),
        };
        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Color { r, g, b, a }),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// The formatting keys a span can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Size,
    Family,
    Kerning,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    FillColor,
    StrokeSize,
    StrokeColor,
}

impl StyleKey {
    pub const ALL: [StyleKey; 10] = [
        StyleKey::Size,
        StyleKey::Family,
        StyleKey::Kerning,
        StyleKey::Bold,
        StyleKey::Italic,
        StyleKey::Underline,
        StyleKey::Strikethrough,
        StyleKey::FillColor,
        StyleKey::StrokeSize,
        StyleKey::StrokeColor,
    ];

    /// Name of the key in the persisted form.
    pub fn name(self) -> &'static str {
        match self {
            StyleKey::Size => "size",
            StyleKey::Family => "family",
            StyleKey::Kerning => "kerning",
            StyleKey::Bold => "bold",
            StyleKey::Italic => "italic",
            StyleKey::Underline => "underline",
            StyleKey::Strikethrough => "strikethrough",
            StyleKey::FillColor => "fill_color",
            StyleKey::StrokeSize => "stroke_size",
            StyleKey::StrokeColor => "stroke_color",
        }
    }
}

/// Per-span formatting. `None` means "inherit the default".
///
/// The same type doubles as a patch: every `Some` field of a patch is
/// written onto the target by [`SpanMeta::apply`]. Stored values equal
/// to the default are dropped so defaults are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kerning: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
}

fn strip_default<T: PartialEq>(slot: &mut Option<T>, default: T) {
    if slot.as_ref() == Some(&default) {
        *slot = None;
    }
}

fn patch<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

impl SpanMeta {
    pub fn is_empty(&self) -> bool {
        StyleKey::ALL.iter().all(|&key| !self.has(key))
    }

    pub fn has(&self, key: StyleKey) -> bool {
        match key {
            StyleKey::Size => self.size.is_some(),
            StyleKey::Family => self.family.is_some(),
            StyleKey::Kerning => self.kerning.is_some(),
            StyleKey::Bold => self.bold.is_some(),
            StyleKey::Italic => self.italic.is_some(),
            StyleKey::Underline => self.underline.is_some(),
            StyleKey::Strikethrough => self.strikethrough.is_some(),
            StyleKey::FillColor => self.fill_color.is_some(),
            StyleKey::StrokeSize => self.stroke_size.is_some(),
            StyleKey::StrokeColor => self.stroke_color.is_some(),
        }
    }

    /// Drop every value that equals its default.
    pub fn canonicalize(&mut self) {
        strip_default(&mut self.size, DEFAULT_SIZE);
        if self.family.as_deref() == Some(DEFAULT_FAMILY) {
            self.family = None;
        }
        strip_default(&mut self.kerning, DEFAULT_KERNING);
        strip_default(&mut self.bold, false);
        strip_default(&mut self.italic, false);
        strip_default(&mut self.underline, false);
        strip_default(&mut self.strikethrough, false);
        strip_default(&mut self.fill_color, DEFAULT_FILL_COLOR);
        strip_default(&mut self.stroke_size, DEFAULT_STROKE_SIZE);
        strip_default(&mut self.stroke_color, DEFAULT_STROKE_COLOR);
    }

    pub fn canonical(mut self) -> Self {
        self.canonicalize();
        self
    }

    /// Write every key present in `other` onto `self`, keeping values
    /// that equal the default.
    pub fn overlay(&mut self, other: &SpanMeta) {
        patch(&mut self.size, &other.size);
        patch(&mut self.family, &other.family);
        patch(&mut self.kerning, &other.kerning);
        patch(&mut self.bold, &other.bold);
        patch(&mut self.italic, &other.italic);
        patch(&mut self.underline, &other.underline);
        patch(&mut self.strikethrough, &other.strikethrough);
        patch(&mut self.fill_color, &other.fill_color);
        patch(&mut self.stroke_size, &other.stroke_size);
        patch(&mut self.stroke_color, &other.stroke_color);
    }

    /// Write every key present in `other` onto `self`.
    pub fn apply(&mut self, other: &SpanMeta) {
        self.overlay(other);
        self.canonicalize();
    }

    pub fn merged(&self, other: &SpanMeta) -> SpanMeta {
        let mut merged = self.clone();
        merged.apply(other);
        merged
    }

    /// Display values with defaults filled in.
    pub fn resolve(&self) -> ResolvedStyle {
        ResolvedStyle {
            size: self.size.unwrap_or(DEFAULT_SIZE),
            family: self
                .family
                .clone()
                .unwrap_or_else(|| DEFAULT_FAMILY.to_string()),
            kerning: self.kerning.unwrap_or(DEFAULT_KERNING),
            bold: self.bold.unwrap_or(false),
            italic: self.italic.unwrap_or(false),
            underline: self.underline.unwrap_or(false),
            strikethrough: self.strikethrough.unwrap_or(false),
            fill_color: self.fill_color.unwrap_or(DEFAULT_FILL_COLOR),
            stroke_size: self.stroke_size.unwrap_or(DEFAULT_STROKE_SIZE),
            stroke_color: self.stroke_color.unwrap_or(DEFAULT_STROKE_COLOR),
        }
    }
}

/// Every style key with its effective value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub size: f32,
    pub family: String,
    pub kerning: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub fill_color: Color,
    pub stroke_size: f32,
    pub stroke_color: Color,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        SpanMeta::default().resolve()
    }
}

/// Distinct values in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSet<T> {
    values: Vec<T>,
}

impl<T> Default for ValueSet<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T: PartialEq> ValueSet<T> {
    pub fn insert(&mut self, value: T) {
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Exactly one value, i.e. the range is uniform for this key.
    pub fn is_uniform(&self) -> bool {
        self.values.len() == 1
    }

    /// The value when uniform.
    pub fn single(&self) -> Option<&T> {
        if self.is_uniform() { self.values.first() } else { None }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Formatting found across a range: one value set per style key.
///
/// A key with more than one value has mixed formatting and should be
/// shown as indeterminate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaSummary {
    pub size: ValueSet<f32>,
    pub family: ValueSet<String>,
    pub kerning: ValueSet<f32>,
    pub bold: ValueSet<bool>,
    pub italic: ValueSet<bool>,
    pub underline: ValueSet<bool>,
    pub strikethrough: ValueSet<bool>,
    pub fill_color: ValueSet<Color>,
    pub stroke_size: ValueSet<f32>,
    pub stroke_color: ValueSet<Color>,
}

impl MetaSummary {
    pub fn add(&mut self, style: ResolvedStyle) {
        self.size.insert(style.size);
        self.family.insert(style.family);
        self.kerning.insert(style.kerning);
        self.bold.insert(style.bold);
        self.italic.insert(style.italic);
        self.underline.insert(style.underline);
        self.strikethrough.insert(style.strikethrough);
        self.fill_color.insert(style.fill_color);
        self.stroke_size.insert(style.stroke_size);
        self.stroke_color.insert(style.stroke_color);
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Number of distinct values seen for `key`.
    pub fn count(&self, key: StyleKey) -> usize {
        match key {
            StyleKey::Size => self.size.len(),
            StyleKey::Family => self.family.len(),
            StyleKey::Kerning => self.kerning.len(),
            StyleKey::Bold => self.bold.len(),
            StyleKey::Italic => self.italic.len(),
            StyleKey::Underline => self.underline.len(),
            StyleKey::Strikethrough => self.strikethrough.len(),
            StyleKey::FillColor => self.fill_color.len(),
            StyleKey::StrokeSize => self.stroke_size.len(),
            StyleKey::StrokeColor => self.stroke_color.len(),
        }
    }

    pub fn is_uniform(&self, key: StyleKey) -> bool {
        self.count(key) == 1
    }

    /// Keys with mixed values.
    pub fn mixed_keys(&self) -> Vec<StyleKey> {
        StyleKey::ALL
            .into_iter()
            .filter(|&key| self.count(key) > 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_forms() {
        assert_eq!("#008800".parse::<Color>().unwrap(), DEFAULT_FILL_COLOR);
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::rgb(255, 255, 255));
        assert_eq!("#ffffff00".parse::<Color>().unwrap(), Color::TRANSPARENT);
        assert_eq!("#0f08".parse::<Color>().unwrap(), Color::rgba(0, 255, 0, 0x88));
        assert!("008800".parse::<Color>().is_err());
        assert!("#00880".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::rgb(0xAB, 0, 0x10).to_string(), "#ab0010");
        assert_eq!(Color::TRANSPARENT.to_string(), "#ffffff00");
    }

    #[test]
    fn test_meta_omits_defaults_when_serialized() {
        let meta = SpanMeta {
            bold: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"bold":true}"#
        );
        assert_eq!(serde_json::to_string(&SpanMeta::default()).unwrap(), "{}");
    }

    #[test]
    fn test_meta_deserializes_colors_and_ignores_unknown_keys() {
        let meta: SpanMeta =
            serde_json::from_str(r##"{"fill_color":"#ff0000","size":12,"shadow":true}"##).unwrap();
        assert_eq!(meta.fill_color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(meta.size, Some(12.0));
    }

    #[test]
    fn test_apply_canonicalizes_defaults() {
        let mut meta = SpanMeta {
            bold: Some(true),
            size: Some(12.0),
            ..Default::default()
        };
        meta.apply(&SpanMeta {
            bold: Some(false),
            family: Some("Arial".into()),
            ..Default::default()
        });
        assert_eq!(meta.bold, None);
        assert_eq!(meta.family, None);
        assert_eq!(meta.size, Some(12.0));
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let style = SpanMeta::default().resolve();
        assert_eq!(style.size, 40.0);
        assert_eq!(style.family, "Arial");
        assert_eq!(style.fill_color, Color::rgb(0, 0x88, 0));
        assert_eq!(style.stroke_color, Color::rgb(0, 0, 0));
        assert!(!style.bold);
    }

    #[test]
    fn test_has_and_is_empty() {
        let meta = SpanMeta {
            italic: Some(true),
            ..Default::default()
        };
        assert!(meta.has(StyleKey::Italic));
        assert!(!meta.has(StyleKey::Bold));
        assert!(!meta.is_empty());
        assert!(SpanMeta::default().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = MetaSummary::default();
        summary.add(SpanMeta::default().resolve());
        summary.add(
            SpanMeta {
                bold: Some(true),
                ..Default::default()
            }
            .resolve(),
        );
        assert_eq!(summary.count(StyleKey::Bold), 2);
        assert!(summary.is_uniform(StyleKey::Size));
        assert_eq!(summary.mixed_keys(), vec![StyleKey::Bold]);
        assert_eq!(summary.family.single().map(String::as_str), Some("Arial"));
    }
}
