use unicode_segmentation::UnicodeSegmentation;

/// Number of characters in `text`.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of character index `ch`, clamped to the end of `text`.
pub fn byte_offset(text: &str, ch: usize) -> usize {
    text.char_indices()
        .nth(ch)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Substring between two character indices (clamped, order-independent).
pub fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let start = byte_offset(text, from);
    let end = byte_offset(text, to);
    &text[start..end]
}

/// Character indices of every extended grapheme cluster boundary,
/// including `0` and the character count.
pub fn grapheme_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut position = 0;
    for cluster in text.graphemes(true) {
        position += cluster.chars().count();
        boundaries.push(position);
    }
    boundaries
}

/// Start of the grapheme cluster before character index `ch`.
///
/// If `ch` lies inside a cluster this is the start of that cluster.
/// Returns `None` at the start of the text.
pub fn prev_grapheme_boundary(text: &str, ch: usize) -> Option<usize> {
    if ch == 0 {
        return None;
    }
    grapheme_boundaries(text)
        .into_iter()
        .take_while(|&boundary| boundary < ch)
        .last()
}

/// End of the grapheme cluster after character index `ch`.
///
/// If `ch` lies inside a cluster this is the end of that cluster.
/// Returns `None` at the end of the text.
pub fn next_grapheme_boundary(text: &str, ch: usize) -> Option<usize> {
    grapheme_boundaries(text)
        .into_iter()
        .find(|&boundary| boundary > ch)
}
