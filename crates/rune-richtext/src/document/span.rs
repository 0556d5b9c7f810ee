use serde::{Deserialize, Serialize};

use crate::document::SpanMeta;
use crate::unicode::{byte_offset, char_count};

static NO_META: SpanMeta = SpanMeta {
    size: None,
    family: None,
    kerning: None,
    bold: None,
    italic: None,
    underline: None,
    strikethrough: None,
    fill_color: None,
    stroke_size: None,
    stroke_color: None,
};

/// A run of text sharing one set of formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub meta: SpanMeta,
}

impl Span {
    pub fn new(text: impl Into<String>, meta: SpanMeta) -> Self {
        Self {
            text: text.into(),
            meta,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanMeta::default())
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        char_count(&self.text)
    }
}

/// One document line: an ordered list of spans, never empty.
///
/// Serializes as a bare array of spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line {
    spans: Vec<Span>,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            spans: vec![Span::default()],
        }
    }
}

impl Line {
    /// Build a line from spans. An empty list becomes a single empty span.
    pub fn new(spans: Vec<Span>) -> Self {
        if spans.is_empty() {
            return Self::default();
        }
        Self { spans }
    }

    pub fn from_text(text: impl Into<String>, meta: SpanMeta) -> Self {
        Self {
            spans: vec![Span::new(text, meta)],
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub(crate) fn raw_span_count(&self) -> usize {
        self.spans.len()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.spans.iter().map(Span::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }

    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// Every span with its `[start, end)` character range.
    pub fn span_bounds(&self) -> impl Iterator<Item = (usize, usize, &Span)> + '_ {
        self.spans.iter().scan(0usize, |start, span| {
            let begin = *start;
            *start += span.char_len();
            Some((begin, *start, span))
        })
    }

    /// Formatting of the span a character typed at `ch` continues:
    /// the span ending at or containing `ch`, or the first span at 0.
    pub fn meta_at(&self, ch: usize) -> &SpanMeta {
        self.span_bounds()
            .find(|&(start, end, _)| (ch > start || ch == 0) && ch <= end)
            .map(|(_, _, span)| span)
            .or(self.spans.last())
            .map(|span| &span.meta)
            .unwrap_or(&NO_META)
    }

    /// Split into the spans before and after `ch`.
    ///
    /// A span is only cut when `ch` falls strictly inside it, so no
    /// zero-length fragment is ever produced. Either half may be empty.
    pub(crate) fn into_halves(self, ch: usize) -> (Vec<Span>, Vec<Span>) {
        let mut head = self.spans;
        let mut start = 0;
        for index in 0..head.len() {
            let len = head[index].char_len();
            if ch <= start {
                let tail = head.split_off(index);
                return (head, tail);
            }
            if ch < start + len {
                let mut tail = head.split_off(index + 1);
                let span = &mut head[index];
                let rest = span.text.split_off(byte_offset(&span.text, ch - start));
                tail.insert(0, Span::new(rest, span.meta.clone()));
                return (head, tail);
            }
            start += len;
        }
        (head, Vec::new())
    }

    /// Make sure a span boundary exists at `ch`.
    pub(crate) fn ensure_boundary(&mut self, ch: usize) {
        let inside = self
            .span_bounds()
            .position(|(start, end, _)| start < ch && ch < end);
        if let Some(index) = inside {
            let start: usize = self.spans[..index].iter().map(Span::char_len).sum();
            let span = &mut self.spans[index];
            let rest = span.text.split_off(byte_offset(&span.text, ch - start));
            let meta = span.meta.clone();
            self.spans.insert(index + 1, Span::new(rest, meta));
        }
    }

    /// Apply `patch` to every non-empty span lying inside `[from, to)`.
    /// With `include_empty`, a line without text is restyled as well.
    pub(crate) fn restyle(&mut self, from: usize, to: usize, patch: &SpanMeta, include_empty: bool) {
        if include_empty && self.is_empty() {
            for span in &mut self.spans {
                span.meta.apply(patch);
            }
            return;
        }
        let mut start = 0;
        for span in &mut self.spans {
            let end = start + span.char_len();
            if start >= from && end <= to && start < end {
                span.meta.apply(patch);
            }
            start = end;
        }
    }

    /// Merge neighbours with identical formatting and drop empty spans,
    /// keeping one empty span when the line has no text at all.
    ///
    /// Idempotent.
    pub fn normalize(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        let fallback = spans.first().map(|span| span.meta.clone()).unwrap_or_default();
        let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
        for mut span in spans {
            if span.text.is_empty() {
                continue;
            }
            span.meta.canonicalize();
            match merged.last_mut() {
                Some(last) if last.meta == span.meta => last.text.push_str(&span.text),
                _ => merged.push(span),
            }
        }
        if merged.is_empty() {
            merged.push(Span::new(String::new(), fallback.canonical()));
        }
        self.spans = merged;
    }
}
