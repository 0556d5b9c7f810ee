//! Unicode helpers working in character units.
//!
//! Document positions count `char`s, so everything here takes and
//! returns character indices rather than byte offsets.

pub mod graphemes;

pub use graphemes::{
    byte_offset, char_count, char_slice, grapheme_boundaries, next_grapheme_boundary,
    prev_grapheme_boundary,
};
