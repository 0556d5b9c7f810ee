//! rune-richtext: rich-text document engine for text layers.
//!
//! - `document`: span-structured lines and their mutation primitives
//! - `selection`: anchor/head selection and caret motions
//! - `layout`: wrapping, alignment, geometry and hit testing
//! - `font`: font metrics with asynchronous family loading
//! - `editor`: composition root bound to one text layer

pub mod document;
pub mod editor;
pub mod error;
pub mod font;
pub mod layer;
pub mod layout;
pub mod selection;
pub mod unicode;

pub use document::{
    Color, Document, Line, MetaSummary, ResolvedStyle, Span, SpanMeta, StyleKey, TextPosition,
    ValueSet, WordDirection,
};
pub use editor::{CaretBlink, Editor, EditorCommand, EditorOptions};
pub use error::{DocumentError, ParseColorError, ParseOptionError, Result};
pub use font::{
    FontError, FontEvent, FontMetrics, FontMetricsProvider, FontState, RatioMetrics,
    PRELOADED_FAMILIES,
};
pub use layer::{BoundaryMode, LayerParams, TextLayer};
pub use layout::{
    Boundary, CursorRect, HorizontalAlign, LayoutConfig, PlacedGlyph, Point, Rect, SelectionRect,
    TextDirection, TextLayout, VerticalAlign, WrapDirection, WrapGranularity, WrappedRow,
};
pub use selection::{ActiveEnd, Selection};
