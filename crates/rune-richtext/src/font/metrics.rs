/// Font-level metrics in font units.
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    /// Units per em.
    pub units_per_em: u16,
    /// Advance of a representative lowercase glyph, used as the average
    /// character width.
    pub average_advance: f32,
}

impl FaceMetrics {
    /// Calculate line height (ascent + descent + line_gap).
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }

    /// Scale to pixel metrics, where `font_size` is in logical pixels
    /// (px per em).
    ///
    /// The baseline sits half the leading below the top of the line box,
    /// plus the ascent.
    pub fn scale_to_pixels(&self, font_size: f32) -> FontMetrics {
        let scale = if self.units_per_em != 0 {
            font_size / self.units_per_em as f32
        } else {
            1.0
        };
        FontMetrics {
            width: self.average_advance * scale,
            height: self.line_height() * scale,
            baseline: (self.ascent + self.line_gap * 0.5) * scale,
        }
    }
}

/// Pixel metrics for one family at one size.
///
/// Layout treats every character as one average-width cell along a
/// horizontal flow axis and one full line height along a vertical one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Average advance width of a single character.
    pub width: f32,
    /// Full line height.
    pub height: f32,
    /// Distance from the top of the line box to the baseline.
    pub baseline: f32,
}

impl FontMetrics {
    pub fn new(width: f32, height: f32, baseline: f32) -> Self {
        Self {
            width,
            height,
            baseline,
        }
    }

    /// Size of one character along the flow axis.
    pub fn advance(&self, vertical: bool) -> f32 {
        if vertical { self.height } else { self.width }
    }

    /// Size of one row along the wrap axis.
    pub fn row_extent(&self, vertical: bool) -> f32 {
        if vertical { self.width } else { self.height }
    }
}
