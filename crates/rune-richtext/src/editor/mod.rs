//! The editor ties one document, its selection and a cached layout to a
//! text layer, and exposes the operations input handlers call.

mod blink;
mod command;

pub use blink::CaretBlink;
pub use command::EditorCommand;

use crate::document::{Document, Line, MetaSummary, SpanMeta, TextPosition};
use crate::font::{FontEvent, FontMetricsProvider};
use crate::layer::{BoundaryMode, LayerParams, TextLayer};
use crate::layout::{Boundary, CursorRect, LayoutConfig, Point, SelectionRect, TextLayout};
use crate::selection::Selection;

/// Tunables for an [`Editor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorOptions {
    /// Seconds between caret blink toggles.
    pub blink_interval: f32,
    /// Smallest width/height a dynamically sized layer shrinks to.
    pub min_box_size: f32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            blink_interval: 0.5,
            min_box_size: 9.0,
        }
    }
}

/// Everything a cached layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutStamp {
    revision: u64,
    font_generation: u64,
    boundary: Boundary,
    config: LayoutConfig,
}

impl LayoutStamp {
    fn new(document: &Document, layer: &TextLayer, fonts: &FontMetricsProvider) -> Self {
        let mut boundary = layer.boundary();
        // Auto axes are recomputed from content and never feed back in.
        if boundary.auto_width {
            boundary.width = 0.0;
        }
        if boundary.auto_height {
            boundary.height = 0.0;
        }
        Self {
            revision: document.revision(),
            font_generation: fonts.generation(),
            boundary,
            config: layer.params.layout_config(),
        }
    }
}

#[derive(Debug)]
struct CachedLayout {
    stamp: LayoutStamp,
    layout: TextLayout,
}

/// Rich-text editor bound to one [`TextLayer`].
///
/// Content changes are written back into the layer's `data` after every
/// operation. Layout is recomputed lazily on the next geometry query
/// whenever the document, the layer boundary, the layout parameters or
/// the set of loaded fonts changed.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    selection: Selection,
    layer: TextLayer,
    options: EditorOptions,
    blink: CaretBlink,
    cached: Option<CachedLayout>,
    synced_revision: u64,
    pointer_selecting: bool,
    needs_redraw: bool,
}

impl Editor {
    pub fn new(layer: TextLayer, options: EditorOptions) -> Self {
        let document = layer.document();
        let synced_revision = document.revision();
        let mut layer = layer;
        layer.data = document.lines().to_vec();
        Self {
            document,
            selection: Selection::new(),
            layer,
            options,
            blink: CaretBlink::new(options.blink_interval),
            cached: None,
            synced_revision,
            pointer_selecting: false,
            needs_redraw: true,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn layer(&self) -> &TextLayer {
        &self.layer
    }

    pub fn into_layer(self) -> TextLayer {
        self.layer
    }

    pub fn options(&self) -> EditorOptions {
        self.options
    }

    /// Called with the full line structure after every content change.
    pub fn set_change_listener(&mut self, listener: impl FnMut(&[Line]) + 'static) {
        self.document.set_listener(listener);
    }

    /// Replace the layer's layout parameters.
    pub fn set_params(&mut self, params: LayerParams) {
        if self.layer.params != params {
            self.layer.params = params;
            self.needs_redraw = true;
        }
    }

    /// Move or resize the layer rectangle.
    pub fn set_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.layer.x = x;
        self.layer.y = y;
        self.layer.width = width;
        self.layer.height = height;
        self.needs_redraw = true;
    }

    /// Write content changes back into the layer and schedule a redraw.
    fn commit(&mut self) {
        if self.document.revision() != self.synced_revision {
            self.layer.data = self.document.lines().to_vec();
            self.synced_revision = self.document.revision();
        }
        self.selection.clamp_to(&self.document);
        self.blink.reset();
        self.needs_redraw = true;
    }

    /// Place the caret, optionally extending the selection.
    pub fn set_cursor(&mut self, position: TextPosition, extend: bool) {
        self.selection.set_position(&self.document, position, extend);
        self.commit();
    }

    pub fn insert_at_cursor(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.delete_selection();
        let caret = self.document.insert_text(text, self.selection.position());
        self.selection.set_position(&self.document, caret, false);
        self.commit();
    }

    /// Delete the selection, or one grapheme before or after the caret.
    pub fn delete_at_cursor(&mut self, forward: bool) {
        if self.delete_selection() {
            return;
        }
        let caret = self
            .document
            .delete_character(forward, self.selection.position());
        self.selection.set_position(&self.document, caret, false);
        self.commit();
    }

    /// Remove the selected text. Returns false when nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let (start, end) = self.selection.range();
        let caret = self.document.delete_range(start, end);
        self.selection.set_position(&self.document, caret, false);
        self.commit();
        true
    }

    /// Apply `meta` to the selected text; nothing happens for a caret.
    pub fn set_format_over_selection(&mut self, meta: &SpanMeta) {
        if self.selection.is_empty() {
            return;
        }
        let (start, end) = self.selection.range();
        self.document.clear_queued_meta();
        self.document.set_meta_range(start, end, meta);
        self.commit();
    }

    /// Remember `meta` for the next typed text.
    pub fn queue_format_for_next_input(&mut self, meta: &SpanMeta) {
        self.document.queue_meta(meta);
        self.needs_redraw = true;
    }

    /// Format the selection, or queue the format when the selection is a
    /// caret.
    pub fn apply_format(&mut self, meta: &SpanMeta) {
        if self.selection.is_empty() {
            self.queue_format_for_next_input(meta);
        } else {
            self.set_format_over_selection(meta);
        }
    }

    /// Formatting across the selection, with queued formatting layered on
    /// top for a caret.
    pub fn current_format_summary(&self) -> MetaSummary {
        let (start, end) = self.selection.range();
        match self.document.queued_meta() {
            Some(queued) if self.selection.is_empty() => {
                let base = self
                    .document
                    .line(start.line)
                    .map_or_else(SpanMeta::default, |line| line.meta_at(start.character).clone());
                let mut summary = MetaSummary::default();
                summary.add(base.merged(queued).resolve());
                summary
            }
            _ => self.document.meta_range(start, end),
        }
    }

    /// Pointer pressed at a layer-local point: place the caret there.
    pub fn begin_pointer_selection(&mut self, point: Point, fonts: &mut FontMetricsProvider) {
        let position = self.layout(fonts).position_from_point(point);
        self.pointer_selecting = true;
        self.set_cursor(position, false);
    }

    /// Pointer dragged: move the active end of the selection.
    pub fn extend_pointer_selection(&mut self, point: Point, fonts: &mut FontMetricsProvider) {
        let position = self.layout(fonts).position_from_point(point);
        self.set_cursor(position, true);
    }

    /// Pointer released. A drag that selected text discards queued
    /// formatting.
    pub fn end_pointer_selection(&mut self) {
        self.pointer_selecting = false;
        if !self.selection.is_empty() {
            self.document.clear_queued_meta();
        }
    }

    pub fn is_pointer_selecting(&self) -> bool {
        self.pointer_selecting
    }

    /// Select the word around the caret, staying on its line.
    pub fn select_word_at_cursor(&mut self) {
        let position = self.selection.position();
        self.selection.select_word_at(&self.document, position);
        self.commit();
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.document);
        self.commit();
    }

    pub fn copy_text(&self) -> String {
        self.selection.text(&self.document)
    }

    pub fn cut_text(&mut self) -> String {
        let text = self.copy_text();
        self.delete_selection();
        text
    }

    /// Run a key command. Copy and cut return the clipboard text.
    pub fn execute(&mut self, command: EditorCommand) -> Option<String> {
        match command {
            EditorCommand::Insert(text) => self.insert_at_cursor(&text),
            EditorCommand::Backspace => self.delete_at_cursor(false),
            EditorCommand::Delete => self.delete_at_cursor(true),
            EditorCommand::SelectAll => self.select_all(),
            EditorCommand::Copy => return Some(self.copy_text()),
            EditorCommand::Cut => return Some(self.cut_text()),
            motion => {
                self.move_caret(motion);
                self.commit();
            }
        }
        None
    }

    fn move_caret(&mut self, command: EditorCommand) {
        let document = &self.document;
        let selection = &mut self.selection;
        match command {
            EditorCommand::Home { extend } => selection.move_line_start(document, extend),
            EditorCommand::End { extend } => selection.move_line_end(document, extend),
            EditorCommand::Left { extend, by_word } => {
                if !extend && !selection.is_empty() {
                    selection.collapse_to_start();
                } else if by_word {
                    selection.move_word_prev(document, extend);
                } else {
                    selection.move_character_prev(document, extend);
                }
            }
            EditorCommand::Right { extend, by_word } => {
                if !extend && !selection.is_empty() {
                    selection.collapse_to_end();
                } else if by_word {
                    selection.move_word_next(document, extend);
                } else {
                    selection.move_character_next(document, extend);
                }
            }
            EditorCommand::Up { extend } => selection.move_line_prev(document, extend),
            EditorCommand::Down { extend } => selection.move_line_next(document, extend),
            _ => {}
        }
    }

    /// Current layout, recomputed first if anything it depends on changed.
    ///
    /// Dynamic layers are resized to the text here; a fixed layer grows
    /// along the wrap axis when its rows no longer fit.
    pub fn layout(&mut self, fonts: &mut FontMetricsProvider) -> &TextLayout {
        let stamp = LayoutStamp::new(&self.document, &self.layer, fonts);
        let cached = match self.cached.take() {
            Some(cached) if cached.stamp == stamp => cached,
            _ => {
                self.needs_redraw = true;
                compute_layout(&self.document, &mut self.layer, &self.options, fonts)
            }
        };
        &self.cached.insert(cached).layout
    }

    pub fn cursor_geometry(&mut self, fonts: &mut FontMetricsProvider) -> CursorRect {
        let position = self.selection.position();
        self.layout(fonts).cursor_rect(position)
    }

    pub fn selection_geometry(&mut self, fonts: &mut FontMetricsProvider) -> Vec<SelectionRect> {
        let (start, end) = self.selection.range();
        self.layout(fonts).selection_rects(start, end)
    }

    /// Collect finished font loads. Any event invalidates the layout.
    pub fn poll_fonts(&mut self, fonts: &mut FontMetricsProvider) -> Vec<FontEvent> {
        let events = fonts.poll_loads();
        if !events.is_empty() {
            self.cached = None;
            self.needs_redraw = true;
        }
        events
    }

    /// Focus starts the caret blink timer; blur stops it.
    pub fn set_focused(&mut self, focused: bool) {
        self.selection.set_visible(focused);
        self.selection.set_cursor_visible(focused);
        self.blink.set_focused(focused);
        self.needs_redraw = true;
    }

    pub fn is_focused(&self) -> bool {
        self.blink.is_running()
    }

    /// Advance the caret blink by `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f32) {
        if self.blink.update(delta_time) {
            self.needs_redraw = true;
        }
    }

    /// Whether the caret should be drawn right now.
    pub fn caret_visible(&self) -> bool {
        self.selection.is_cursor_visible() && self.selection.is_empty() && self.blink.visible
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Clear and return the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

fn compute_layout(
    document: &Document,
    layer: &mut TextLayer,
    options: &EditorOptions,
    fonts: &mut FontMetricsProvider,
) -> CachedLayout {
    let config = layer.params.layout_config();
    let mut layout = TextLayout::compute(document, layer.boundary(), config, fonts);
    if fit_layer_to_layout(layer, &layout, options) {
        layout = TextLayout::compute(document, layer.boundary(), config, fonts);
    }
    CachedLayout {
        stamp: LayoutStamp::new(document, layer, fonts),
        layout,
    }
}

/// Resize `layer` after a layout. Returns true when a fixed dimension
/// changed, which calls for another layout pass.
fn fit_layer_to_layout(layer: &mut TextLayer, layout: &TextLayout, options: &EditorOptions) -> bool {
    let (width, height) = layout.size();
    match layer.params.boundary {
        BoundaryMode::Dynamic => {
            layer.width = (width + 1.0).max(options.min_box_size);
            layer.height = (height + 1.0).max(options.min_box_size);
            false
        }
        BoundaryMode::Box => {
            if layout.config().is_vertical() {
                if width + 1.0 > layer.width {
                    layer.width = width + 1.0;
                    return true;
                }
            } else if height + 1.0 > layer.height {
                layer.height = height + 1.0;
                return true;
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::document::StyleKey;
    use crate::font::{DeferredLoader, FontMetrics, UniformMetrics};
    use crate::layout::WrapGranularity;

    fn fonts() -> FontMetricsProvider {
        FontMetricsProvider::uniform(10.0, 20.0, 16.0)
    }

    fn editor(lines: &[&str]) -> Editor {
        let mut layer = TextLayer::default();
        layer.data = lines
            .iter()
            .map(|text| Line::from_text(*text, SpanMeta::default()))
            .collect();
        Editor::new(layer, EditorOptions::default())
    }

    fn boxed(lines: &[&str], width: f32, height: f32) -> Editor {
        let mut editor = editor(lines);
        editor.set_params(LayerParams {
            boundary: BoundaryMode::Box,
            wrap: WrapGranularity::Word,
            ..Default::default()
        });
        editor.set_rect(0.0, 0.0, width, height);
        editor
    }

    fn pos(line: usize, character: usize) -> TextPosition {
        TextPosition::new(line, character)
    }

    fn bold() -> SpanMeta {
        SpanMeta {
            bold: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_syncs_layer() {
        let mut editor = editor(&["Hello World"]);
        editor.set_cursor(pos(0, 5), false);
        editor.insert_at_cursor("!");
        assert_eq!(editor.document().line_text(0), "Hello! World");
        assert_eq!(editor.selection().position(), pos(0, 6));
        assert_eq!(editor.layer().data[0].text(), "Hello! World");
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut editor = editor(&["Hello World"]);
        editor.set_cursor(pos(0, 0), false);
        editor.set_cursor(pos(0, 5), true);
        editor.insert_at_cursor("Bye");
        assert_eq!(editor.document().line_text(0), "Bye World");
        assert_eq!(editor.selection().position(), pos(0, 3));
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut editor = editor(&["AB", "CD"]);
        editor.set_cursor(pos(1, 0), false);
        editor.delete_at_cursor(false);
        assert_eq!(editor.document().line_text(0), "ABCD");
        assert_eq!(editor.selection().position(), pos(0, 2));
        editor.delete_at_cursor(true);
        assert_eq!(editor.document().line_text(0), "ABD");
        assert_eq!(editor.layer().data.len(), 1);
    }

    #[test]
    fn test_delete_selection() {
        let mut editor = editor(&["AB", "CD"]);
        assert!(!editor.delete_selection());
        editor.set_cursor(pos(0, 1), false);
        editor.set_cursor(pos(1, 1), true);
        assert!(editor.delete_selection());
        assert_eq!(editor.document().text(), "AD");
        assert_eq!(editor.selection().position(), pos(0, 1));
    }

    #[test]
    fn test_format_over_selection() {
        let mut editor = editor(&["Hello World"]);
        editor.set_cursor(pos(0, 0), false);
        editor.set_cursor(pos(0, 5), true);
        editor.apply_format(&bold());
        let spans = editor.layer().data[0].spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Hello");
        assert_eq!(spans[0].meta.bold, Some(true));
        let summary = editor.current_format_summary();
        assert!(summary.is_uniform(StyleKey::Bold));
    }

    #[test]
    fn test_queued_format_applies_to_next_input() {
        let mut editor = editor(&["ab"]);
        editor.set_cursor(pos(0, 1), false);
        editor.apply_format(&bold());
        assert_eq!(editor.document().revision(), editor.synced_revision);
        assert_eq!(editor.current_format_summary().bold.single(), Some(&true));

        editor.insert_at_cursor("X");
        let spans = editor.layer().data[0].spans();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "X");
        assert_eq!(spans[1].meta.bold, Some(true));
        assert!(editor.document().queued_meta().is_none());
    }

    #[test]
    fn test_pointer_selection() {
        let mut fonts = fonts();
        let mut editor = editor(&["abcdef"]);
        editor.begin_pointer_selection(Point::new(21.0, 5.0), &mut fonts);
        assert!(editor.is_pointer_selecting());
        editor.extend_pointer_selection(Point::new(49.0, 5.0), &mut fonts);
        assert_eq!(editor.selection().range(), (pos(0, 2), pos(0, 5)));
        editor.extend_pointer_selection(Point::new(1.0, 5.0), &mut fonts);
        assert_eq!(editor.selection().range(), (pos(0, 0), pos(0, 2)));
        assert_eq!(editor.selection().position(), pos(0, 0));
        editor.end_pointer_selection();
        assert!(!editor.is_pointer_selecting());
        assert_eq!(editor.copy_text(), "ab");
    }

    #[test]
    fn test_end_pointer_selection_clears_queue_only_for_ranges() {
        let mut fonts = fonts();
        let mut editor = editor(&["abcdef"]);
        editor.queue_format_for_next_input(&bold());
        editor.begin_pointer_selection(Point::new(0.0, 5.0), &mut fonts);
        editor.end_pointer_selection();
        assert!(editor.document().queued_meta().is_some());

        editor.begin_pointer_selection(Point::new(0.0, 5.0), &mut fonts);
        editor.extend_pointer_selection(Point::new(30.0, 5.0), &mut fonts);
        editor.end_pointer_selection();
        assert!(editor.document().queued_meta().is_none());
    }

    #[test]
    fn test_range_format_drops_queued_format() {
        let mut editor = editor(&["abc"]);
        editor.set_cursor(pos(0, 1), false);
        editor.apply_format(&bold());
        assert!(editor.document().queued_meta().is_some());

        editor.set_cursor(pos(0, 2), true);
        let italic = SpanMeta {
            italic: Some(true),
            ..Default::default()
        };
        editor.apply_format(&italic);
        assert!(editor.document().queued_meta().is_none());

        editor.set_cursor(pos(0, 3), false);
        editor.insert_at_cursor("y");
        assert_eq!(editor.document().line_text(0), "abcy");
        let spans = editor.document().lines()[0].spans();
        let last = &spans[spans.len() - 1];
        assert_eq!(last.text, "cy");
        assert_eq!(last.meta.bold, None);
        assert_eq!(last.meta.italic, None);
    }

    #[test]
    fn test_cut_and_select_word() {
        let mut editor = editor(&["one two three"]);
        editor.set_cursor(pos(0, 5), false);
        editor.select_word_at_cursor();
        assert_eq!(editor.copy_text(), "two");
        assert_eq!(editor.cut_text(), "two");
        assert_eq!(editor.document().line_text(0), "one  three");
    }

    #[test]
    fn test_commands() {
        let mut editor = editor(&["one two", "three"]);
        assert_eq!(editor.execute(EditorCommand::End { extend: false }), None);
        assert_eq!(editor.selection().position(), pos(0, 7));
        editor.execute(EditorCommand::Left {
            extend: true,
            by_word: true,
        });
        assert_eq!(editor.copy_text(), "two");
        editor.execute(EditorCommand::Left {
            extend: false,
            by_word: false,
        });
        assert_eq!(editor.selection().position(), pos(0, 4));
        assert!(editor.selection().is_empty());
        editor.execute(EditorCommand::Down { extend: false });
        assert_eq!(editor.selection().position(), pos(1, 4));
        editor.execute(EditorCommand::Insert("!".to_string()));
        assert_eq!(editor.document().line_text(1), "thre!e");
        editor.execute(EditorCommand::Backspace);
        assert_eq!(editor.document().line_text(1), "three");
        editor.execute(EditorCommand::SelectAll);
        assert_eq!(
            editor.execute(EditorCommand::Copy).as_deref(),
            Some("one two\nthree")
        );
        assert_eq!(
            editor.execute(EditorCommand::Cut).as_deref(),
            Some("one two\nthree")
        );
        assert_eq!(editor.document().text(), "");
    }

    #[test]
    fn test_right_collapses_selection_to_end() {
        let mut editor = editor(&["abc"]);
        editor.select_all();
        editor.execute(EditorCommand::Right {
            extend: false,
            by_word: false,
        });
        assert_eq!(editor.selection().range(), (pos(0, 3), pos(0, 3)));
    }

    #[test]
    fn test_dynamic_bounds() {
        let mut fonts = fonts();
        let mut editor = editor(&["abc"]);
        editor.layout(&mut fonts);
        assert_eq!((editor.layer().width, editor.layer().height), (31.0, 21.0));

        editor.set_cursor(pos(0, 0), false);
        editor.select_all();
        editor.delete_selection();
        editor.layout(&mut fonts);
        assert_eq!((editor.layer().width, editor.layer().height), (9.0, 21.0));
    }

    #[test]
    fn test_fixed_box_grows_along_wrap_axis() {
        let mut fonts = fonts();
        let mut editor = boxed(&["aaaa bbbb"], 50.0, 10.0);
        let rows = editor.layout(&mut fonts).rows().len();
        assert_eq!(rows, 2);
        assert_eq!(editor.layer().width, 50.0);
        assert_eq!(editor.layer().height, 41.0);
    }

    #[test]
    fn test_layout_is_cached_until_something_changes() {
        let mut fonts = fonts();
        let mut editor = boxed(&["aaaa bbbb"], 50.0, 100.0);
        let first = editor.layout(&mut fonts).rows().len();
        assert_eq!(first, 2);
        assert!(editor.take_redraw());
        editor.layout(&mut fonts);
        assert!(!editor.needs_redraw());

        editor.set_rect(0.0, 0.0, 200.0, 100.0);
        assert_eq!(editor.layout(&mut fonts).rows().len(), 1);
    }

    #[test]
    fn test_geometry() {
        let mut fonts = fonts();
        let mut editor = boxed(&["aaaa bbbb"], 50.0, 100.0);
        editor.set_cursor(pos(0, 5), false);
        let caret = editor.cursor_geometry(&mut fonts);
        assert_eq!((caret.x, caret.y, caret.height), (0.0, 20.0, 20.0));

        editor.set_cursor(pos(0, 3), true);
        let rects = editor.selection_geometry(&mut fonts);
        assert_eq!(rects, vec![SelectionRect::new(30.0, 0.0, 20.0, 20.0)]);
    }

    #[test]
    fn test_font_load_relayouts() {
        let (loader, queue) = DeferredLoader::new();
        let mut fonts = FontMetricsProvider::new(
            Box::new(UniformMetrics(FontMetrics::new(10.0, 20.0, 16.0))),
            Box::new(loader),
        );
        let mut editor = editor(&["abc"]);
        editor.layout(&mut fonts);
        assert_eq!(queue.pending_families(), vec!["Arial".to_string()]);
        assert!(editor.poll_fonts(&mut fonts).is_empty());

        editor.take_redraw();
        assert!(queue.complete("Arial", Ok(())));
        let events = editor.poll_fonts(&mut fonts);
        assert!(matches!(events.as_slice(), [FontEvent::Loaded(family)] if family == "Arial"));
        assert!(editor.needs_redraw());
        assert!(fonts.is_loaded("Arial"));
    }

    #[test]
    fn test_focus_and_blink() {
        let mut editor = editor(&["abc"]);
        assert!(!editor.caret_visible());
        editor.set_focused(true);
        assert!(editor.caret_visible());
        editor.take_redraw();
        editor.tick(0.6);
        assert!(editor.needs_redraw());
        assert!(!editor.caret_visible());
        editor.insert_at_cursor("x");
        assert!(editor.caret_visible());
        editor.set_focused(false);
        assert!(!editor.is_focused());
        assert!(!editor.caret_visible());
    }

    #[test]
    fn test_change_listener_sees_every_edit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut editor = editor(&["ab"]);
        editor.set_change_listener(move |lines| {
            sink.borrow_mut().push(lines.iter().map(Line::text).collect::<Vec<_>>());
        });
        editor.set_cursor(pos(0, 2), false);
        editor.insert_at_cursor("c");
        editor.delete_at_cursor(false);
        assert_eq!(
            *seen.borrow(),
            vec![vec!["abc".to_string()], vec!["ab".to_string()]]
        );
    }
}
