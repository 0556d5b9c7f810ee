use core::cmp::Ordering;

use crate::document::{Document, TextPosition, WordDirection};
use crate::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Which endpoint of a [`Selection`] follows the pointer or keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveEnd {
    Start,
    #[default]
    End,
}

/// A text selection over document positions.
///
/// The endpoints are always stored in document order (`start <= end`);
/// `active` records which of them moves when the selection is extended.
/// An empty selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    start: TextPosition,
    end: TextPosition,
    active: ActiveEnd,
    visible: bool,
    cursor_visible: bool,
}

impl Selection {
    /// A caret at the start of the document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> TextPosition {
        self.start
    }

    pub fn end(&self) -> TextPosition {
        self.end
    }

    pub fn range(&self) -> (TextPosition, TextPosition) {
        (self.start, self.end)
    }

    pub fn active_end(&self) -> ActiveEnd {
        self.active
    }

    /// The endpoint opposite the active one.
    pub fn anchor(&self) -> TextPosition {
        match self.active {
            ActiveEnd::Start => self.end,
            ActiveEnd::End => self.start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Compare two positions by line, then character.
    pub fn compare(a: TextPosition, b: TextPosition) -> Ordering {
        a.cmp(&b)
    }

    /// The active endpoint.
    pub fn position(&self) -> TextPosition {
        match self.active {
            ActiveEnd::Start => self.start,
            ActiveEnd::End => self.end,
        }
    }

    /// Move the active endpoint to `position` (clamped).
    ///
    /// Without `extend` the selection collapses to a caret there. With
    /// `extend` only the active endpoint moves; when it passes the other
    /// endpoint the two swap and the other side becomes active.
    pub fn set_position(&mut self, document: &Document, position: TextPosition, extend: bool) {
        let position = document.clamp(position);
        if !extend {
            self.start = position;
            self.end = position;
            self.active = ActiveEnd::End;
            return;
        }

        match self.active {
            ActiveEnd::Start => self.start = position,
            ActiveEnd::End => self.end = position,
        }
        if self.start > self.end {
            core::mem::swap(&mut self.start, &mut self.end);
            self.active = match self.active {
                ActiveEnd::Start => ActiveEnd::End,
                ActiveEnd::End => ActiveEnd::Start,
            };
        }
    }

    /// Select from `anchor` to `head`, leaving `head` active.
    pub fn set_range(&mut self, document: &Document, anchor: TextPosition, head: TextPosition) {
        self.set_position(document, anchor, false);
        self.set_position(document, head, true);
    }

    /// Re-clamp after the document changed underneath the selection.
    pub fn clamp_to(&mut self, document: &Document) {
        self.start = document.clamp(self.start);
        self.end = document.clamp(self.end);
    }

    /// Selected text, lines joined with `\n`.
    pub fn text(&self, document: &Document) -> String {
        document.text_between(self.start, self.end)
    }

    pub fn collapse_to_start(&mut self) {
        self.end = self.start;
        self.active = ActiveEnd::End;
    }

    pub fn collapse_to_end(&mut self) {
        self.start = self.end;
        self.active = ActiveEnd::End;
    }

    pub fn select_all(&mut self, document: &Document) {
        self.set_range(document, document.start(), document.end());
    }

    /// Select the word around `position` without crossing lines.
    pub fn select_word_at(&mut self, document: &Document, position: TextPosition) {
        let start = document.word_boundary(position, WordDirection::Backward, true);
        let end = document.word_boundary(position, WordDirection::Forward, true);
        self.set_range(document, start, end);
    }

    pub fn move_line_start(&mut self, document: &Document, extend: bool) {
        let position = self.position();
        self.set_position(document, TextPosition::new(position.line, 0), extend);
    }

    pub fn move_line_end(&mut self, document: &Document, extend: bool) {
        let position = self.position();
        let end = document.line_character_count(position.line);
        self.set_position(document, TextPosition::new(position.line, end), extend);
    }

    /// Step back one grapheme, wrapping to the end of the previous line.
    pub fn move_character_prev(&mut self, document: &Document, extend: bool) {
        let position = self.position();
        let text = document.line_text(position.line);
        let target = match prev_grapheme_boundary(&text, position.character) {
            Some(character) => TextPosition::new(position.line, character),
            None if position.line > 0 => {
                let line = position.line - 1;
                TextPosition::new(line, document.line_character_count(line))
            }
            None => position,
        };
        self.set_position(document, target, extend);
    }

    /// Step forward one grapheme, wrapping to the start of the next line.
    pub fn move_character_next(&mut self, document: &Document, extend: bool) {
        let position = self.position();
        let text = document.line_text(position.line);
        let target = match next_grapheme_boundary(&text, position.character) {
            Some(character) => TextPosition::new(position.line, character),
            None if position.line + 1 < document.line_count() => {
                TextPosition::new(position.line + 1, 0)
            }
            None => position,
        };
        self.set_position(document, target, extend);
    }

    pub fn move_word_prev(&mut self, document: &Document, extend: bool) {
        let target = document.word_boundary(self.position(), WordDirection::Backward, false);
        self.set_position(document, target, extend);
    }

    pub fn move_word_next(&mut self, document: &Document, extend: bool) {
        let target = document.word_boundary(self.position(), WordDirection::Forward, false);
        self.set_position(document, target, extend);
    }

    /// Move to the previous line, keeping the character column (clamped).
    pub fn move_line_prev(&mut self, document: &Document, extend: bool) {
        let position = self.position();
        let target = TextPosition::new(position.line.saturating_sub(1), position.character);
        self.set_position(document, target, extend);
    }

    /// Move to the next line, keeping the character column (clamped).
    pub fn move_line_next(&mut self, document: &Document, extend: bool) {
        let position = self.position();
        let target = TextPosition::new(position.line + 1, position.character);
        self.set_position(document, target, extend);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }
}
