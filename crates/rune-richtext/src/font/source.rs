use std::sync::Arc;

use hashbrown::HashMap;

use crate::font::{FontFace, FontMetrics};

/// Something that can turn a (family, size) pair into pixel metrics.
///
/// `measure` returns `None` when the family cannot be measured, in which
/// case the provider falls back to [`MetricsSource::fallback`].
pub trait MetricsSource {
    fn measure(&mut self, family: &str, size: f32) -> Option<FontMetrics>;

    /// Metrics used while a family is unavailable.
    fn fallback(&self, size: f32) -> FontMetrics;
}

/// Size-proportional metrics that need no font data at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioMetrics {
    pub width_ratio: f32,
    pub height_ratio: f32,
    pub baseline_ratio: f32,
}

impl Default for RatioMetrics {
    fn default() -> Self {
        Self {
            width_ratio: 0.5,
            height_ratio: 1.2,
            baseline_ratio: 0.9,
        }
    }
}

impl RatioMetrics {
    pub fn new(width_ratio: f32, height_ratio: f32, baseline_ratio: f32) -> Self {
        Self {
            width_ratio,
            height_ratio,
            baseline_ratio,
        }
    }
}

impl MetricsSource for RatioMetrics {
    fn measure(&mut self, _family: &str, size: f32) -> Option<FontMetrics> {
        Some(self.fallback(size))
    }

    fn fallback(&self, size: f32) -> FontMetrics {
        FontMetrics::new(
            size * self.width_ratio,
            size * self.height_ratio,
            size * self.baseline_ratio,
        )
    }
}

/// Fixed cell metrics regardless of family or size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformMetrics(pub FontMetrics);

impl MetricsSource for UniformMetrics {
    fn measure(&mut self, _family: &str, _size: f32) -> Option<FontMetrics> {
        Some(self.0)
    }

    fn fallback(&self, _size: f32) -> FontMetrics {
        self.0
    }
}

/// Metrics measured from installed system fonts.
///
/// Faces are looked up by family name through `fontdb` and parsed with
/// swash on first use. Families that are not installed are remembered
/// as missing so the database is only queried once per family.
pub struct SystemMetrics {
    db: Arc<fontdb::Database>,
    faces: HashMap<String, Option<Arc<FontFace>>>,
    fallback: RatioMetrics,
}

impl SystemMetrics {
    pub fn new(db: Arc<fontdb::Database>, fallback: RatioMetrics) -> Self {
        Self {
            db,
            faces: HashMap::new(),
            fallback,
        }
    }

    /// Build a database populated with the fonts installed on this machine.
    pub fn system_database() -> Arc<fontdb::Database> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system font database");
        Arc::new(db)
    }

    fn face(&mut self, family: &str) -> Option<Arc<FontFace>> {
        if let Some(face) = self.faces.get(family) {
            return face.clone();
        }
        let face = lookup_face(&self.db, family).map(Arc::new);
        self.faces.insert(family.to_string(), face.clone());
        face
    }
}

impl MetricsSource for SystemMetrics {
    fn measure(&mut self, family: &str, size: f32) -> Option<FontMetrics> {
        self.face(family).map(|face| face.scaled_metrics(size))
    }

    fn fallback(&self, size: f32) -> FontMetrics {
        self.fallback.fallback(size)
    }
}

/// Find `family` in `db` and parse its regular face.
pub(crate) fn lookup_face(db: &fontdb::Database, family: &str) -> Option<FontFace> {
    use fontdb::{Family, Query};

    let families = [Family::Name(family)];
    let id = db.query(&Query {
        families: &families,
        ..Query::default()
    })?;

    let parsed = db.with_face_data(id, |data, index| {
        FontFace::from_bytes(data, index as usize)
    })?;
    match parsed {
        Ok(face) => Some(face),
        Err(error) => {
            tracing::warn!(family, %error, "system font could not be parsed");
            None
        }
    }
}
