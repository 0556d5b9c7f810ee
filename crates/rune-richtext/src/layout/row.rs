use crate::document::Span;

/// Placement of one row along the wrap axis, in logical coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowMetrics {
    /// Distance from the start of the wrap axis to the row's leading edge.
    pub offset: f32,
    /// Extent of the row along the wrap axis (line height for horizontal
    /// text, column width for vertical text).
    pub size: f32,
    /// Distance from the leading edge to the baseline. Zero for vertical
    /// text.
    pub baseline: f32,
}

impl RowMetrics {
    pub fn end(&self) -> f32 {
        self.offset + self.size
    }
}

/// One visually wrapped piece of a document line.
#[derive(Debug, Clone)]
pub struct WrappedRow {
    pub(crate) line: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) spans: Vec<Span>,
    /// `end - start + 1` monotonically increasing flow-axis offsets, one
    /// per character boundary, alignment already applied.
    pub(crate) offsets: Vec<f32>,
    pub(crate) trailing_space: bool,
    pub(crate) trailing_break: bool,
    pub(crate) metrics: RowMetrics,
}

impl WrappedRow {
    /// Document line this row belongs to.
    pub fn line(&self) -> usize {
        self.line
    }

    /// First character of the row, as a character index into its line.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last character of the row.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The spans shown on this row, cut at the row edges.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn metrics(&self) -> RowMetrics {
        self.metrics
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// True when the row's last character is a word-wrap break character,
    /// a space or a hyphen.
    pub fn ends_with_break(&self) -> bool {
        self.trailing_break
    }

    /// Flow-axis offset of a character boundary, clamped to the row.
    pub fn offset_at(&self, character: usize) -> f32 {
        let index = character.clamp(self.start, self.end) - self.start;
        self.offsets[index.min(self.offsets.len() - 1)]
    }

    /// Flow-axis extent including a trailing space.
    pub fn extent(&self) -> f32 {
        self.offsets.last().copied().unwrap_or(0.0) - self.offsets[0]
    }

    /// Flow-axis extent that alignment works with: a trailing space is
    /// not counted.
    pub fn visible_extent(&self) -> f32 {
        let mut last = self.offsets.len() - 1;
        if self.trailing_space && last > 0 {
            last -= 1;
        }
        self.offsets[last] - self.offsets[0]
    }

    pub(crate) fn shift(&mut self, delta: f32) {
        for offset in &mut self.offsets {
            *offset += delta;
        }
    }
}
