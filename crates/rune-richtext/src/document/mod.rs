//! Span-structured text content and its mutation primitives.

pub mod position;
pub mod span;
pub mod style;

use core::fmt;

use serde::Serialize;

pub use position::{TextPosition, WordDirection};
pub use span::{Line, Span};
pub use style::{
    Color, MetaSummary, ResolvedStyle, SpanMeta, StyleKey, ValueSet, DEFAULT_FAMILY,
    DEFAULT_FILL_COLOR, DEFAULT_KERNING, DEFAULT_SIZE, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_SIZE,
};

use crate::error::{DocumentError, Result};
use crate::unicode::{char_count, char_slice, next_grapheme_boundary, prev_grapheme_boundary};

type ChangeListener = Box<dyn FnMut(&[Line])>;

/// Multi-line rich text.
///
/// Positions passed to any operation are clamped to the document rather
/// than rejected. Every operation that changes content bumps
/// [`revision`](Self::revision) and calls the change listener exactly once.
pub struct Document {
    lines: Vec<Line>,
    queued_meta: Option<SpanMeta>,
    revision: u64,
    listener: Option<ChangeListener>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    lines: &'a [Line],
}

impl Default for Document {
    fn default() -> Self {
        Self::from_lines(Vec::new())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.lines)
            .field("queued_meta", &self.queued_meta)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from lines, normalizing each one. No lines means one empty line.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let mut lines = lines;
        if lines.is_empty() {
            lines.push(Line::default());
        }
        for line in &mut lines {
            line.normalize();
        }
        Self {
            lines,
            queued_meta: None,
            revision: 0,
            listener: None,
        }
    }

    /// Build from untrusted lines, rejecting structurally invalid input.
    pub fn try_from_lines(lines: Vec<Line>) -> Result<Self> {
        for (line_index, line) in lines.iter().enumerate() {
            if line.raw_span_count() == 0 {
                return Err(DocumentError::EmptyLine { line: line_index });
            }
            if let Some(span) = line.spans().iter().position(|s| s.text.contains(&['\n', '\r'][..])) {
                return Err(DocumentError::LineBreakInSpan {
                    line: line_index,
                    span,
                });
            }
        }
        Ok(Self::from_lines(lines))
    }

    /// Load the persisted `{"lines": [[{text, meta}, ...], ...]}` form.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &serde_json::Value) -> Result<Self> {
        let raw_lines = value
            .get("lines")
            .and_then(serde_json::Value::as_array)
            .ok_or(DocumentError::MissingLines)?;
        Self::try_from_lines(parse_lines(raw_lines)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&Snapshot { lines: &self.lines })?)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, line: usize) -> Option<&Line> {
        self.lines.get(line)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_character_count(&self, line: usize) -> usize {
        self.lines.get(line).map(Line::len).unwrap_or(0)
    }

    pub fn line_text(&self, line: usize) -> String {
        self.lines.get(line).map(Line::text).unwrap_or_default()
    }

    /// Whole document text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain text strictly between two positions.
    pub fn text_between(&self, a: TextPosition, b: TextPosition) -> String {
        let (start, end) = self.ordered(a, b);
        let mut out = String::new();
        for line in start.line..=end.line {
            let text = self.line_text(line);
            let from = if line == start.line { start.character } else { 0 };
            let to = if line == end.line {
                end.character
            } else {
                char_count(&text)
            };
            if line > start.line {
                out.push('\n');
            }
            out.push_str(char_slice(&text, from, to));
        }
        out
    }

    /// Clamp a position into the document.
    pub fn clamp(&self, position: TextPosition) -> TextPosition {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let character = position.character.min(self.line_character_count(line));
        TextPosition { line, character }
    }

    /// Clamp both positions and put them in document order.
    pub fn ordered(&self, a: TextPosition, b: TextPosition) -> (TextPosition, TextPosition) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if b < a { (b, a) } else { (a, b) }
    }

    pub fn start(&self) -> TextPosition {
        TextPosition::new(0, 0)
    }

    pub fn end(&self) -> TextPosition {
        let line = self.lines.len().saturating_sub(1);
        TextPosition::new(line, self.line_character_count(line))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register the callback that receives the full line structure after
    /// every change.
    pub fn set_listener(&mut self, listener: impl FnMut(&[Line]) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    fn changed(&mut self) {
        self.revision += 1;
        if let Some(listener) = &mut self.listener {
            listener(&self.lines);
        }
    }

    /// Replace the whole content.
    pub fn set_lines(&mut self, lines: Vec<Line>) {
        let listener = self.listener.take();
        *self = Self {
            revision: self.revision,
            listener,
            ..Self::from_lines(lines)
        };
        self.changed();
    }

    /// Formatting to apply to the next inserted text. Keys accumulate
    /// until an insert consumes them.
    pub fn queue_meta(&mut self, meta: &SpanMeta) {
        self.queued_meta
            .get_or_insert_with(SpanMeta::default)
            .overlay(meta);
    }

    pub fn queued_meta(&self) -> Option<&SpanMeta> {
        self.queued_meta.as_ref()
    }

    pub fn clear_queued_meta(&mut self) {
        self.queued_meta = None;
    }

    /// Position of the next word boundary from `at`.
    ///
    /// Words are delimited by spaces. At a line edge the search continues
    /// on the adjacent line unless `no_jump` is set, in which case `at` is
    /// returned. With `no_jump`, a space right next to `at` in the search
    /// direction also stops the search.
    pub fn word_boundary(
        &self,
        at: TextPosition,
        direction: WordDirection,
        no_jump: bool,
    ) -> TextPosition {
        let at = self.clamp(at);
        match direction {
            WordDirection::Forward => {
                let (mut line, mut from) = (at.line, at.character);
                if from == self.line_character_count(line) && line + 1 < self.line_count() {
                    if no_jump {
                        return at;
                    }
                    line += 1;
                    from = 0;
                }
                let chars: Vec<char> = self.line_text(line).chars().collect();
                let rest = &chars[from..];
                if no_jump && rest.first() == Some(&' ') {
                    return at;
                }
                let end = rest
                    .iter()
                    .skip(1)
                    .position(|&c| c == ' ')
                    .map(|i| from + i + 1)
                    .unwrap_or(chars.len());
                TextPosition::new(line, end)
            }
            WordDirection::Backward => {
                let (mut line, mut to) = (at.line, at.character);
                if to == 0 && line > 0 {
                    if no_jump {
                        return at;
                    }
                    line -= 1;
                    to = self.line_character_count(line);
                }
                let chars: Vec<char> = self.line_text(line).chars().collect();
                let before = &chars[..to];
                if no_jump && before.last() == Some(&' ') {
                    return at;
                }
                // The character right before `at` is skipped so a caret
                // sitting after a space still moves to the previous word.
                let start = before
                    .len()
                    .checked_sub(1)
                    .and_then(|n| before[..n].iter().rposition(|&c| c == ' '))
                    .map(|j| j + 1)
                    .unwrap_or(0);
                TextPosition::new(line, start)
            }
        }
    }

    /// Insert `text` at `at` and return the caret position after it.
    ///
    /// The inserted text takes the formatting of the span it continues,
    /// overridden by any queued formatting, which is then cleared. Line
    /// breaks split the line; every new line starts with that formatting.
    pub fn insert_text(&mut self, text: &str, at: TextPosition) -> TextPosition {
        let at = self.clamp(at);
        if text.is_empty() {
            return at;
        }
        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut meta = self.lines[at.line].meta_at(at.character).clone();
        if let Some(queued) = self.queued_meta.take() {
            meta.apply(&queued);
        }

        let line = std::mem::take(&mut self.lines[at.line]);
        let (mut head, tail) = line.into_halves(at.character);
        let segments: Vec<&str> = text.split('\n').collect();
        let last = segments.len() - 1;

        let caret = if last == 0 {
            head.push(Span::new(segments[0], meta));
            head.extend(tail);
            self.lines[at.line] = Line::new(head);
            TextPosition::new(at.line, at.character + char_count(segments[0]))
        } else {
            head.push(Span::new(segments[0], meta.clone()));
            let mut replacement = Vec::with_capacity(segments.len());
            replacement.push(Line::new(head));
            for segment in &segments[1..last] {
                replacement.push(Line::from_text(*segment, meta.clone()));
            }
            let mut final_spans = vec![Span::new(segments[last], meta)];
            final_spans.extend(tail);
            replacement.push(Line::new(final_spans));
            self.lines.splice(at.line..=at.line, replacement);
            TextPosition::new(at.line + last, char_count(segments[last]))
        };

        self.normalize(at.line, caret.line);
        self.changed();
        caret
    }

    /// Remove everything between two positions (in either order) and
    /// return the start position.
    ///
    /// Lines strictly between the two are dropped; the cut edges are
    /// joined into one line. Deleting an empty range changes nothing.
    pub fn delete_range(&mut self, a: TextPosition, b: TextPosition) -> TextPosition {
        let (start, end) = self.ordered(a, b);
        if start == end {
            return start;
        }

        let start_meta = self.lines[start.line].meta_at(start.character).clone();
        let (head, _) = self.lines[start.line].clone().into_halves(start.character);
        let (_, tail) = self.lines[end.line].clone().into_halves(end.character);

        let mut spans = head;
        spans.extend(tail);
        if spans.iter().all(|span| span.text.is_empty()) {
            spans = vec![Span::new(String::new(), start_meta)];
        }

        self.lines
            .splice(start.line..=end.line, std::iter::once(Line::new(spans)));
        self.normalize(start.line, start.line);
        self.changed();
        start
    }

    /// Delete one grapheme before (`forward == false`) or after `at`,
    /// joining lines at a line edge. Returns the new caret position.
    pub fn delete_character(&mut self, forward: bool, at: TextPosition) -> TextPosition {
        let at = self.clamp(at);
        let text = self.line_text(at.line);
        if forward {
            if let Some(next) = next_grapheme_boundary(&text, at.character) {
                self.delete_range(at, TextPosition::new(at.line, next))
            } else if at.line + 1 < self.line_count() {
                self.delete_range(at, TextPosition::new(at.line + 1, 0))
            } else {
                at
            }
        } else if let Some(prev) = prev_grapheme_boundary(&text, at.character) {
            self.delete_range(TextPosition::new(at.line, prev), at)
        } else if at.line > 0 {
            let previous = at.line - 1;
            let end = TextPosition::new(previous, self.line_character_count(previous));
            self.delete_range(end, at)
        } else {
            at
        }
    }

    /// Distinct formatting values across a range.
    ///
    /// For a caret, every span whose range touches the caret counts, so a
    /// caret between two differently styled spans reports both. For a
    /// real range, spans overlapping it count, as do empty lines it
    /// passes through.
    pub fn meta_range(&self, a: TextPosition, b: TextPosition) -> MetaSummary {
        let (start, end) = self.ordered(a, b);
        let mut summary = MetaSummary::default();
        if start != end {
            for line_index in start.line..=end.line {
                let line = &self.lines[line_index];
                let (from, to) = self.line_window(line_index, start, end);
                let passes_empty = line.is_empty() && line_index < end.line;
                for (span_start, span_end, span) in line.span_bounds() {
                    if passes_empty || span_start.max(from) < span_end.min(to) {
                        summary.add(span.meta.resolve());
                    }
                }
            }
        }
        if summary.is_empty() {
            let line = &self.lines[start.line];
            for (span_start, span_end, span) in line.span_bounds() {
                if span_start <= start.character && start.character <= span_end {
                    summary.add(span.meta.resolve());
                }
            }
        }
        if summary.is_empty() {
            summary.add(ResolvedStyle::default());
        }
        summary
    }

    /// Apply formatting to every character in a range.
    pub fn set_meta_range(&mut self, a: TextPosition, b: TextPosition, meta: &SpanMeta) {
        let (start, end) = self.ordered(a, b);
        if start == end || meta.is_empty() {
            return;
        }
        for line_index in start.line..=end.line {
            let (from, to) = self.line_window(line_index, start, end);
            let line = &mut self.lines[line_index];
            line.ensure_boundary(from);
            line.ensure_boundary(to);
            line.restyle(from, to, meta, line_index < end.line);
        }
        self.normalize(start.line, end.line);
        self.changed();
    }

    /// Character window of `line_index` covered by `[start, end]`.
    fn line_window(&self, line_index: usize, start: TextPosition, end: TextPosition) -> (usize, usize) {
        let from = if line_index == start.line {
            start.character
        } else {
            0
        };
        let to = if line_index == end.line {
            end.character
        } else {
            self.line_character_count(line_index)
        };
        (from, to)
    }

    /// Normalize lines `start_line..=end_line` (clamped).
    pub fn normalize(&mut self, start_line: usize, end_line: usize) {
        let last = self.lines.len().saturating_sub(1);
        let (start_line, end_line) = (start_line.min(last), end_line.min(last));
        for line in &mut self.lines[start_line..=end_line] {
            line.normalize();
        }
    }

    pub fn normalize_all(&mut self) {
        for line in &mut self.lines {
            line.normalize();
        }
    }
}

/// Structural validation of raw JSON lines.
pub(crate) fn parse_lines(raw_lines: &[serde_json::Value]) -> Result<Vec<Line>> {
    let mut lines = Vec::with_capacity(raw_lines.len());
    for (line_index, raw_line) in raw_lines.iter().enumerate() {
        let raw_spans = raw_line
            .as_array()
            .ok_or(DocumentError::InvalidLine { line: line_index })?;
        if raw_spans.is_empty() {
            return Err(DocumentError::EmptyLine { line: line_index });
        }
        let mut spans = Vec::with_capacity(raw_spans.len());
        for (span_index, raw_span) in raw_spans.iter().enumerate() {
            let span: Span = serde_json::from_value(raw_span.clone()).map_err(|error| {
                DocumentError::InvalidSpan {
                    line: line_index,
                    span: span_index,
                    reason: error.to_string(),
                }
            })?;
            spans.push(span);
        }
        lines.push(Line::new(spans));
    }
    Ok(lines)
}
