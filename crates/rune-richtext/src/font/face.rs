use swash::{FontRef, Metrics};

use crate::font::{FaceMetrics, FontError, FontMetrics, Result};

/// Glyph measured to derive the average character width.
const WIDTH_SAMPLE: char = 'w';

/// Loaded font face backed by a font file (TTF/OTF).
///
/// The file is parsed with swash once; only the metrics the layout engine
/// needs are kept.
#[derive(Debug, Clone, Copy)]
pub struct FontFace {
    /// Extracted font metrics in font units.
    metrics: FaceMetrics,
}

impl FontFace {
    /// Parse the face at `index` within a font file.
    pub fn from_bytes(data: &[u8], index: usize) -> Result<Self> {
        let font = FontRef::from_index(data, index).ok_or(FontError::InvalidFont)?;
        Ok(Self {
            metrics: Self::metrics_from_swash(&font),
        })
    }

    /// Create a font face from raw bytes owned by a `Vec<u8>`.
    pub fn from_vec(data: Vec<u8>, index: usize) -> Result<Self> {
        Self::from_bytes(&data, index)
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: usize) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    fn metrics_from_swash(font: &FontRef<'_>) -> FaceMetrics {
        // Use default (no variation) coordinates.
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            ..
        } = font.metrics(&[]);

        let glyph = font.charmap().map(WIDTH_SAMPLE);
        let average_advance = if glyph != 0 {
            font.glyph_metrics(&[]).advance_width(glyph)
        } else {
            units_per_em as f32 * 0.5
        };

        FaceMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
            average_advance,
        }
    }

    /// Font metrics in font units.
    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    /// Metrics scaled to the requested pixel size (px per em).
    pub fn scaled_metrics(&self, font_size: f32) -> FontMetrics {
        self.metrics.scale_to_pixels(font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_garbage_bytes() {
        let err = FontFace::from_vec(vec![0u8; 16], 0).unwrap_err();
        assert!(matches!(err, FontError::InvalidFont));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FontFace::from_path("/definitely/not/a/font.ttf", 0).unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }
}
