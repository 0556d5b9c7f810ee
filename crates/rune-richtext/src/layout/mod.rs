//! Layout engine: wraps document lines into rows inside a boundary,
//! aligns them and maps between document positions and pixels.
//!
//! All offsets are computed in "logical" flow/wrap coordinates first
//! (0 = where the text direction starts) and mirrored into pixels for
//! right-to-left and bottom-to-top directions at query time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseOptionError;

pub mod geometry;
pub mod row;
pub mod text_layout;

pub use geometry::{CursorRect, Point, Rect, SelectionRect};
pub use row::{RowMetrics, WrappedRow};
pub use text_layout::{PlacedGlyph, TextLayout};

/// Direction in which characters follow each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
    Ttb,
    Btt,
}

impl TextDirection {
    /// True for top-to-bottom and bottom-to-top.
    pub fn is_vertical(self) -> bool {
        matches!(self, TextDirection::Ttb | TextDirection::Btt)
    }

    /// True when pixel coordinates run against the direction.
    pub fn is_negative(self) -> bool {
        matches!(self, TextDirection::Rtl | TextDirection::Btt)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
            TextDirection::Ttb => "ttb",
            TextDirection::Btt => "btt",
        }
    }
}

impl FromStr for TextDirection {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ltr" => Ok(TextDirection::Ltr),
            "rtl" => Ok(TextDirection::Rtl),
            "ttb" => Ok(TextDirection::Ttb),
            "btt" => Ok(TextDirection::Btt),
            _ => Err(ParseOptionError {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Direction in which successive rows stack. Uses the same four values as
/// [`TextDirection`].
pub type WrapDirection = TextDirection;

/// Where a row may be broken when it overflows the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapGranularity {
    /// Only after a space or hyphen; overlong words overflow.
    Word,
    /// After a space or hyphen when possible, otherwise mid-word.
    #[default]
    Letter,
}

impl FromStr for WrapGranularity {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(WrapGranularity::Word),
            "letter" => Ok(WrapGranularity::Letter),
            _ => Err(ParseOptionError {
                kind: "wrap granularity",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for HorizontalAlign {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(HorizontalAlign::Left),
            "center" => Ok(HorizontalAlign::Center),
            "right" => Ok(HorizontalAlign::Right),
            _ => Err(ParseOptionError {
                kind: "horizontal alignment",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl FromStr for VerticalAlign {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(VerticalAlign::Top),
            "middle" => Ok(VerticalAlign::Middle),
            "bottom" => Ok(VerticalAlign::Bottom),
            _ => Err(ParseOptionError {
                kind: "vertical alignment",
                value: s.to_string(),
            }),
        }
    }
}

/// Alignment along one axis, relative to the direction of that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAlign {
    Start,
    Center,
    End,
}

impl AxisAlign {
    /// Offset that places content of `size` inside `extent`.
    pub fn shift(self, extent: f32, size: f32) -> f32 {
        match self {
            AxisAlign::Start => 0.0,
            AxisAlign::Center => (extent - size) / 2.0,
            AxisAlign::End => extent - size,
        }
    }

    fn from_horizontal(align: HorizontalAlign, negative: bool) -> Self {
        match (align, negative) {
            (HorizontalAlign::Center, _) => AxisAlign::Center,
            (HorizontalAlign::Left, false) | (HorizontalAlign::Right, true) => AxisAlign::Start,
            (HorizontalAlign::Right, false) | (HorizontalAlign::Left, true) => AxisAlign::End,
        }
    }

    fn from_vertical(align: VerticalAlign, negative: bool) -> Self {
        match (align, negative) {
            (VerticalAlign::Middle, _) => AxisAlign::Center,
            (VerticalAlign::Top, false) | (VerticalAlign::Bottom, true) => AxisAlign::Start,
            (VerticalAlign::Bottom, false) | (VerticalAlign::Top, true) => AxisAlign::End,
        }
    }
}

/// Per-layer layout options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub text_direction: TextDirection,
    pub wrap_direction: WrapDirection,
    pub wrap: WrapGranularity,
    pub halign: HorizontalAlign,
    pub valign: VerticalAlign,
}

impl LayoutConfig {
    /// Replace a wrap direction lying on the flow axis with the natural
    /// perpendicular one.
    pub fn normalized(mut self) -> Self {
        if self.wrap_direction.is_vertical() == self.text_direction.is_vertical() {
            self.wrap_direction = if self.text_direction.is_vertical() {
                TextDirection::Ltr
            } else {
                TextDirection::Ttb
            };
        }
        self
    }

    pub fn is_vertical(&self) -> bool {
        self.text_direction.is_vertical()
    }

    /// Alignment of each row along the flow axis.
    pub fn flow_align(&self) -> AxisAlign {
        let negative = self.text_direction.is_negative();
        if self.is_vertical() {
            AxisAlign::from_vertical(self.valign, negative)
        } else {
            AxisAlign::from_horizontal(self.halign, negative)
        }
    }

    /// Alignment of the block of rows along the wrap axis.
    pub fn wrap_align(&self) -> AxisAlign {
        let negative = self.wrap_direction.is_negative();
        if self.is_vertical() {
            AxisAlign::from_horizontal(self.halign, negative)
        } else {
            AxisAlign::from_vertical(self.valign, negative)
        }
    }
}

/// The content rectangle text is laid out in. Each axis is either fixed
/// or sizes itself to the content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub width: f32,
    pub height: f32,
    pub auto_width: bool,
    pub auto_height: bool,
}

impl Boundary {
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            auto_width: false,
            auto_height: false,
        }
    }

    /// Both axes follow the content.
    pub fn auto() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            auto_width: true,
            auto_height: true,
        }
    }

    /// Maximum row extent along the flow axis, `None` when that axis sizes
    /// itself.
    pub fn flow_limit(&self, vertical: bool) -> Option<f32> {
        if vertical {
            (!self.auto_height).then_some(self.height)
        } else {
            (!self.auto_width).then_some(self.width)
        }
    }

    /// Fixed extent of the wrap axis, `None` when that axis sizes itself.
    pub fn wrap_limit(&self, vertical: bool) -> Option<f32> {
        if vertical {
            (!self.auto_width).then_some(self.width)
        } else {
            (!self.auto_height).then_some(self.height)
        }
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::auto()
    }
}
