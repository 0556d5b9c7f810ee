use std::ops::Range;

use crate::document::{Document, Line, ResolvedStyle, Span, TextPosition};
use crate::font::{FontMetrics, FontMetricsProvider};
use crate::layout::{
    Boundary, CursorRect, LayoutConfig, Rect, RowMetrics, SelectionRect, WrapGranularity,
    WrappedRow,
};
use crate::unicode::char_slice;

/// Width of the caret bar across the flow axis.
const CARET_THICKNESS: f32 = 1.0;

/// One measured character of a line before wrapping.
#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    advance: f32,
}

fn is_break_char(ch: char) -> bool {
    ch == ' ' || ch == '-'
}

/// A character placed on the page, for the painter.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    /// Position of the boundary before the character.
    pub position: TextPosition,
    /// Cell occupied by the character.
    pub rect: Rect,
    /// Wrap-axis pixel coordinate of the row's baseline.
    pub baseline: f32,
    pub style: ResolvedStyle,
}

/// Complete layout of a document inside a boundary.
///
/// Built in one pass by [`TextLayout::compute`] and never edited
/// afterwards; any change to the document, the boundary or the
/// configuration calls for a fresh layout.
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub(crate) config: LayoutConfig,
    pub(crate) rows: Vec<WrappedRow>,
    /// Range into `rows` for every document line.
    pub(crate) line_rows: Vec<Range<usize>>,
    /// Flow-axis extent rows are aligned and mirrored against.
    pub(crate) flow_extent: f32,
    /// Wrap-axis extent rows are aligned and mirrored against.
    pub(crate) wrap_extent: f32,
    content_flow: f32,
    content_wrap: f32,
}

impl TextLayout {
    /// Wrap, measure and align every line of `document`.
    pub fn compute(
        document: &Document,
        boundary: Boundary,
        config: LayoutConfig,
        fonts: &mut FontMetricsProvider,
    ) -> Self {
        let config = config.normalized();
        let vertical = config.is_vertical();
        let flow_limit = boundary.flow_limit(vertical);

        let mut rows = Vec::new();
        let mut line_rows = Vec::with_capacity(document.line_count());
        for (index, line) in document.lines().iter().enumerate() {
            let first = rows.len();
            Self::wrap_line(index, line, flow_limit, config.wrap, vertical, fonts, &mut rows);
            line_rows.push(first..rows.len());
        }

        let content_flow = rows.iter().map(WrappedRow::extent).fold(0.0, f32::max);

        // Alignment along the flow axis, against the boundary when fixed.
        let align = config.flow_align();
        let align_extent = flow_limit.unwrap_or(content_flow);
        for row in &mut rows {
            let shift = align.shift(align_extent, row.visible_extent());
            if shift > 0.0 {
                row.shift(shift);
            }
        }

        let mut wrap_offset = 0.0;
        for row in &mut rows {
            row.metrics = Self::row_metrics(row.spans(), vertical, fonts, wrap_offset);
            wrap_offset += row.metrics.size;
        }
        let content_wrap = wrap_offset;

        let wrap_limit = boundary.wrap_limit(vertical);
        if let Some(limit) = wrap_limit {
            let shift = config.wrap_align().shift(limit, content_wrap);
            if shift > 0.0 {
                for row in &mut rows {
                    row.metrics.offset += shift;
                }
            }
        }

        let flow_extent = flow_limit.map_or(content_flow, |limit| limit.max(content_flow));
        let wrap_extent = wrap_limit.map_or(content_wrap, |limit| limit.max(content_wrap));

        tracing::debug!(
            lines = document.line_count(),
            rows = rows.len(),
            content_flow,
            content_wrap,
            "computed text layout"
        );

        Self {
            config,
            rows,
            line_rows,
            flow_extent,
            wrap_extent,
            content_flow,
            content_wrap,
        }
    }

    fn measure(line: &Line, vertical: bool, fonts: &mut FontMetricsProvider) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(line.len());
        for span in line.spans() {
            let style = span.meta.resolve();
            let metrics = fonts.metrics(&style.family, style.size);
            let advance = metrics.advance(vertical) + style.kerning;
            cells.extend(span.text.chars().map(|ch| Cell { ch, advance }));
        }
        cells
    }

    fn wrap_line(
        index: usize,
        line: &Line,
        flow_limit: Option<f32>,
        granularity: WrapGranularity,
        vertical: bool,
        fonts: &mut FontMetricsProvider,
        rows: &mut Vec<WrappedRow>,
    ) {
        let cells = Self::measure(line, vertical, fonts);
        let count = cells.len();
        let first_row = rows.len();

        let mut row_start = 0;
        let mut offsets = vec![0.0];
        let mut advance = 0.0;
        let mut i = 0;
        while i < count {
            let cell = cells[i];
            let next = advance + cell.advance;
            let overflows = flow_limit.is_some_and(|limit| next > limit) && !is_break_char(cell.ch);
            if overflows {
                if let Some(j) = (row_start..i).rev().find(|&j| is_break_char(cells[j].ch)) {
                    // Break right after the last space or hyphen on this row
                    // and lay out everything after it again.
                    offsets.truncate(j + 2 - row_start);
                    rows.push(Self::row(index, line, &cells, row_start, j + 1, offsets));
                    row_start = j + 1;
                    i = row_start;
                    offsets = vec![0.0];
                    advance = 0.0;
                    continue;
                }
                if granularity == WrapGranularity::Letter {
                    if i == row_start {
                        // A row never stays empty.
                        offsets.push(next);
                        i += 1;
                    }
                    rows.push(Self::row(index, line, &cells, row_start, i, offsets));
                    row_start = i;
                    offsets = vec![0.0];
                    advance = 0.0;
                    continue;
                }
            }
            advance = next;
            offsets.push(advance);
            i += 1;
        }
        if row_start < count || rows.len() == first_row {
            rows.push(Self::row(index, line, &cells, row_start, count, offsets));
        }
    }

    fn row(
        line_index: usize,
        line: &Line,
        cells: &[Cell],
        start: usize,
        end: usize,
        offsets: Vec<f32>,
    ) -> WrappedRow {
        WrappedRow {
            line: line_index,
            start,
            end,
            spans: slice_spans(line, start, end),
            trailing_space: end > start && cells[end - 1].ch == ' ',
            trailing_break: end > start && is_break_char(cells[end - 1].ch),
            offsets,
            metrics: RowMetrics::default(),
        }
    }

    /// Size and baseline of a row: those of its largest span.
    fn row_metrics(
        spans: &[Span],
        vertical: bool,
        fonts: &mut FontMetricsProvider,
        offset: f32,
    ) -> RowMetrics {
        let mut metrics = RowMetrics {
            offset,
            size: 0.0,
            baseline: 0.0,
        };
        for span in spans {
            let style = span.meta.resolve();
            let font: FontMetrics = fonts.metrics(&style.family, style.size);
            let size = font.row_extent(vertical);
            if size > metrics.size {
                metrics.size = size;
                metrics.baseline = if vertical { 0.0 } else { font.baseline };
            }
        }
        metrics
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// All rows, in document order.
    pub fn rows(&self) -> &[WrappedRow] {
        &self.rows
    }

    /// Rows of one document line; empty for a line outside the layout.
    pub fn line_rows(&self, line: usize) -> &[WrappedRow] {
        self.line_rows
            .get(line)
            .map(|range| &self.rows[range.clone()])
            .unwrap_or(&[])
    }

    pub fn line_count(&self) -> usize {
        self.line_rows.len()
    }

    /// Content bounding size `(width, height)` in whole pixels, at least
    /// 1 on each axis.
    pub fn size(&self) -> (f32, f32) {
        let flow = self.content_flow.round().max(1.0);
        let wrap = self.content_wrap.round().max(1.0);
        if self.config.is_vertical() {
            (wrap, flow)
        } else {
            (flow, wrap)
        }
    }

    /// Index into [`rows`](Self::rows) of the row that displays the caret
    /// at `position`.
    ///
    /// A position on a soft-wrap boundary belongs to the row it starts.
    pub fn row_index_for(&self, position: TextPosition) -> usize {
        let line = position.line.min(self.line_rows.len().saturating_sub(1));
        let Some(range) = self.line_rows.get(line) else {
            return 0;
        };
        range
            .clone()
            .find(|&index| position.character < self.rows[index].end)
            .unwrap_or_else(|| range.end.saturating_sub(1))
    }

    /// Where the caret is drawn for `position`.
    pub fn cursor_rect(&self, position: TextPosition) -> CursorRect {
        let Some(row) = self.rows.get(self.row_index_for(position)) else {
            return CursorRect::new(0.0, 0.0, CARET_THICKNESS, 0.0);
        };
        let flow = self.flow_pixel(row.offset_at(position.character));
        let (wrap, size) = self.wrap_pixels(row.metrics);
        if self.config.is_vertical() {
            CursorRect::new(wrap, flow, size, CARET_THICKNESS)
        } else {
            CursorRect::new(flow, wrap, CARET_THICKNESS, size)
        }
    }

    /// Highlight rectangles between two positions, one per row that has
    /// selected characters.
    pub fn selection_rects(&self, a: TextPosition, b: TextPosition) -> Vec<SelectionRect> {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let mut rects = Vec::new();
        for row in &self.rows {
            if row.line < start.line || row.line > end.line {
                continue;
            }
            let from = if row.line == start.line {
                start.character.max(row.start)
            } else {
                row.start
            };
            let to = if row.line == end.line {
                end.character.min(row.end)
            } else {
                row.end
            };
            if from < to {
                let rect = self.cell_rect(row, from, to);
                rects.push(SelectionRect::new(rect.x, rect.y, rect.width, rect.height));
            }
        }
        rects
    }

    /// Every character with its cell and resolved style.
    pub fn glyphs(&self) -> Vec<PlacedGlyph> {
        let mut glyphs = Vec::new();
        for row in &self.rows {
            let (wrap, _) = self.wrap_pixels(row.metrics);
            let baseline = wrap + row.metrics.baseline;
            let mut character = row.start;
            for span in row.spans() {
                let style = span.meta.resolve();
                for ch in span.text.chars() {
                    glyphs.push(PlacedGlyph {
                        ch,
                        position: TextPosition::new(row.line, character),
                        rect: self.cell_rect(row, character, character + 1),
                        baseline,
                        style: style.clone(),
                    });
                    character += 1;
                }
            }
        }
        glyphs
    }

    /// Pixel rectangle covering characters `[from, to)` of `row`.
    fn cell_rect(&self, row: &WrappedRow, from: usize, to: usize) -> Rect {
        let a = self.flow_pixel(row.offset_at(from));
        let b = self.flow_pixel(row.offset_at(to));
        let (flow, flow_size) = (a.min(b), (b - a).abs());
        let (wrap, wrap_size) = self.wrap_pixels(row.metrics);
        if self.config.is_vertical() {
            Rect::new(wrap, flow, wrap_size, flow_size)
        } else {
            Rect::new(flow, wrap, flow_size, wrap_size)
        }
    }

    /// Logical flow offset to pixel coordinate.
    pub(crate) fn flow_pixel(&self, offset: f32) -> f32 {
        if self.config.text_direction.is_negative() {
            self.flow_extent - offset
        } else {
            offset
        }
    }

    /// Leading pixel edge and size of a row on the wrap axis.
    pub(crate) fn wrap_pixels(&self, metrics: RowMetrics) -> (f32, f32) {
        if self.config.wrap_direction.is_negative() {
            (self.wrap_extent - metrics.end(), metrics.size)
        } else {
            (metrics.offset, metrics.size)
        }
    }
}

/// The spans of `line` cut to characters `[start, end)`. An empty range
/// keeps the styling of the span it sits in.
fn slice_spans(line: &Line, start: usize, end: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    for (span_start, span_end, span) in line.span_bounds() {
        let from = start.max(span_start);
        let to = end.min(span_end);
        if from < to {
            spans.push(Span::new(
                char_slice(&span.text, from - span_start, to - span_start),
                span.meta.clone(),
            ));
        }
    }
    if spans.is_empty() {
        spans.push(Span::new("", line.meta_at(start).clone()));
    }
    spans
}
