use anyhow::Result;
use rune_richtext::{
    Color, Document, DocumentError, Line, Selection, Span, SpanMeta, StyleKey, TextPosition,
};
use serde_json::json;

fn bold() -> SpanMeta {
    SpanMeta {
        bold: Some(true),
        ..Default::default()
    }
}

fn red() -> SpanMeta {
    SpanMeta {
        fill_color: Some(Color::rgb(0xff, 0, 0)),
        size: Some(20.0),
        ..Default::default()
    }
}

fn fixtures() -> Vec<Document> {
    vec![
        Document::new(),
        Document::from_lines(vec![Line::from_text("Hello World", SpanMeta::default())]),
        Document::from_lines(vec![
            Line::new(vec![Span::new("plain ", SpanMeta::default()), Span::new("bold", bold())]),
            Line::default(),
            Line::new(vec![Span::new("red", red()), Span::new(" tail", SpanMeta::default())]),
        ]),
        Document::from_lines(vec![
            Line::from_text("AB", SpanMeta::default()),
            Line::from_text("CD", bold()),
        ]),
    ]
}

fn assert_line_invariants(document: &Document) {
    assert!(document.line_count() >= 1);
    for (index, line) in document.lines().iter().enumerate() {
        assert!(!line.spans().is_empty(), "line {index} has no spans");
        assert_eq!(
            document.line_text(index).chars().count(),
            document.line_character_count(index)
        );
    }
}

#[test]
fn normalization_is_idempotent() {
    let raw = Line::new(vec![
        Span::new("a", bold()),
        Span::new("", SpanMeta::default()),
        Span::new("b", bold()),
        Span::new("c", SpanMeta::default()),
        Span::new("d", SpanMeta { bold: Some(false), ..Default::default() }),
    ]);

    let mut once = raw.clone();
    once.normalize();
    let mut twice = once.clone();
    twice.normalize();

    assert_eq!(once, twice);
    assert_eq!(once.spans().len(), 2);
    assert_eq!(once.spans()[0].text, "ab");
    assert_eq!(once.spans()[1].text, "cd");

    let mut document = Document::from_lines(vec![raw]);
    let before = document.lines().to_vec();
    document.normalize_all();
    document.normalize_all();
    assert_eq!(document.lines(), &before[..]);
}

#[test]
fn insert_then_delete_restores_lines() {
    let inserts = ["x", "two words", "line\nbreak", "a\n\nb", "é🎉"];
    for original in fixtures() {
        let end = original.end();
        let positions = [
            TextPosition::new(0, 0),
            TextPosition::new(0, 3),
            TextPosition::new(end.line, end.character),
            TextPosition::new(end.line / 2, 1),
        ];
        for text in inserts {
            for at in positions {
                let mut document = Document::from_lines(original.lines().to_vec());
                let at = document.clamp(at);
                let caret = document.insert_text(text, at);
                assert_line_invariants(&document);
                let back = document.delete_range(at, caret);
                assert_eq!(back, at);
                assert_eq!(
                    document.lines(),
                    original.lines(),
                    "inserting {text:?} at {at:?} did not round-trip"
                );
            }
        }
    }
}

#[test]
fn every_line_keeps_a_span_through_edits() {
    let mut document = fixtures().remove(2);
    document.delete_range(TextPosition::new(0, 0), TextPosition::new(0, 10));
    assert_line_invariants(&document);
    document.delete_range(TextPosition::new(0, 0), document.end());
    assert_line_invariants(&document);
    assert_eq!(document.line_count(), 1);
    assert_eq!(document.line_text(0), "");
    document.insert_text("\n\n", TextPosition::new(0, 0));
    assert_line_invariants(&document);
    assert_eq!(document.line_count(), 3);
}

#[test]
fn insert_into_hello_world() {
    let mut document = Document::from_lines(vec![Line::from_text("Hello World", SpanMeta::default())]);
    let caret = document.insert_text("!", TextPosition::new(0, 5));
    assert_eq!(document.line_text(0), "Hello! World");
    assert_eq!(caret, TextPosition::new(0, 6));
}

#[test]
fn delete_across_lines_joins_edges() {
    let mut document = Document::from_lines(vec![
        Line::from_text("AB", SpanMeta::default()),
        Line::from_text("CD", SpanMeta::default()),
    ]);
    let caret = document.delete_range(TextPosition::new(0, 1), TextPosition::new(1, 1));
    assert_eq!(document.line_count(), 1);
    assert_eq!(document.line_text(0), "AD");
    assert_eq!(caret, TextPosition::new(0, 1));
}

#[test]
fn out_of_range_positions_are_clamped() {
    let mut document = Document::from_lines(vec![Line::from_text("abc", SpanMeta::default())]);
    let caret = document.insert_text("!", TextPosition::new(7, 99));
    assert_eq!(document.line_text(0), "abc!");
    assert_eq!(caret, TextPosition::new(0, 4));
    assert_eq!(
        document.delete_range(TextPosition::new(0, 2), TextPosition::new(50, 50)),
        TextPosition::new(0, 2)
    );
    assert_eq!(document.text(), "ab");
}

#[test]
fn caret_between_styles_reports_both_values() {
    let document = Document::from_lines(vec![Line::new(vec![
        Span::new("plain", SpanMeta::default()),
        Span::new("red", red()),
    ])]);
    let caret = TextPosition::new(0, 5);
    let summary = document.meta_range(caret, caret);

    assert_eq!(summary.count(StyleKey::FillColor), 2);
    assert_eq!(summary.count(StyleKey::Size), 2);
    for key in [
        StyleKey::Family,
        StyleKey::Kerning,
        StyleKey::Bold,
        StyleKey::Italic,
        StyleKey::Underline,
        StyleKey::Strikethrough,
        StyleKey::StrokeSize,
        StyleKey::StrokeColor,
    ] {
        assert!(summary.is_uniform(key), "{key:?} should be uniform");
    }

    // Strictly inside one span there is nothing mixed.
    let inside = document.meta_range(TextPosition::new(0, 2), TextPosition::new(0, 2));
    assert!(inside.mixed_keys().is_empty());
}

#[test]
fn extending_selection_keeps_endpoints_ordered() {
    let document = Document::from_lines(vec![
        Line::from_text("Hello World", SpanMeta::default()),
        Line::from_text("second line", SpanMeta::default()),
    ]);
    let targets = [(0, 5), (0, 2), (1, 4), (0, 0), (1, 11), (0, 9), (0, 9), (1, 0)];
    let mut selection = Selection::new();
    selection.set_position(&document, TextPosition::new(0, 6), false);
    for (line, character) in targets {
        selection.set_position(&document, TextPosition::new(line, character), true);
        assert_ne!(
            Selection::compare(selection.start(), selection.end()),
            std::cmp::Ordering::Greater
        );
        assert_eq!(selection.anchor(), TextPosition::new(0, 6));
        assert_eq!(selection.position(), TextPosition::new(line, character));
    }
}

#[test]
fn extend_right_then_back_left_of_end() {
    let document = Document::from_lines(vec![Line::from_text("Hello World", SpanMeta::default())]);
    let mut selection = Selection::new();
    selection.set_position(&document, TextPosition::new(0, 0), false);
    selection.set_position(&document, TextPosition::new(0, 5), true);
    selection.set_position(&document, TextPosition::new(0, 2), true);

    // The head moves back toward the anchor at (0, 0).
    assert_eq!(selection.start(), TextPosition::new(0, 0));
    assert_eq!(selection.end(), TextPosition::new(0, 2));
    assert!(selection.start() <= selection.end());
}

#[test]
fn persisted_json_round_trip() -> Result<()> {
    let value = json!({
        "lines": [
            [{"text": "Hi ", "meta": {}}, {"text": "there", "meta": {"bold": true, "size": 40}}],
            [{"text": "", "meta": {"fill_color": "#ff0000"}}]
        ]
    });
    let document = Document::from_json_value(&value)?;
    assert_eq!(document.line_text(0), "Hi there");
    // Size 40 is the default and is not kept.
    assert_eq!(document.lines()[0].spans()[1].meta, bold());

    let reloaded = Document::from_json(&document.to_json()?)?;
    assert_eq!(reloaded.lines(), document.lines());
    Ok(())
}

#[test]
fn malformed_documents_fail_fast() {
    assert!(matches!(
        Document::from_json_value(&json!({"rows": []})),
        Err(DocumentError::MissingLines)
    ));
    assert!(Document::from_json_value(&json!({"lines": [{"text": "x"}]})).is_err());
    assert!(Document::from_json_value(&json!({"lines": [[]]})).is_err());
    assert!(Document::from_json("{not json").is_err());
}
