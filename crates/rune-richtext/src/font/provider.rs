use hashbrown::HashMap;

use crate::font::{
    FontError, FontLoader, FontMetrics, ImmediateLoader, MetricsSource, PendingFont, RatioMetrics,
    SystemFontLoader, SystemMetrics, UniformMetrics,
};

/// Families the editor can rely on without a load round trip.
pub const PRELOADED_FAMILIES: [&str; 8] = [
    "Arial",
    "Courier",
    "Impact",
    "Helvetica",
    "Monospace",
    "Tahoma",
    "Times New Roman",
    "Verdana",
];

/// Availability of a font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontState {
    Loaded,
    Pending,
    /// The load failed; fallback metrics are used from now on.
    Failed,
}

/// Outcome of a finished font load, reported by [`FontMetricsProvider::poll_loads`].
#[derive(Debug)]
pub enum FontEvent {
    Loaded(String),
    Failed { family: String, error: FontError },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MetricsKey {
    family: String,
    size_bits: u32,
}

/// Font metrics with a per-(family, size) cache and a table of which
/// families are loaded.
///
/// Asking for metrics of a family that has never been seen starts a load
/// through the configured [`FontLoader`] and answers with fallback metrics
/// until [`poll_loads`](Self::poll_loads) observes the completion. Only
/// metrics of loaded families are cached, so fallback values never stick.
pub struct FontMetricsProvider {
    source: Box<dyn MetricsSource>,
    loader: Box<dyn FontLoader>,
    cache: HashMap<MetricsKey, FontMetrics>,
    states: HashMap<String, FontState>,
    pending: Vec<PendingFont>,
    generation: u64,
}

impl FontMetricsProvider {
    pub fn new(source: Box<dyn MetricsSource>, loader: Box<dyn FontLoader>) -> Self {
        Self {
            source,
            loader,
            cache: HashMap::new(),
            states: HashMap::new(),
            pending: Vec::new(),
            generation: 0,
        }
    }

    /// Fixed cell metrics for every family; everything counts as loaded.
    pub fn uniform(width: f32, height: f32, baseline: f32) -> Self {
        Self::new(
            Box::new(UniformMetrics(FontMetrics::new(width, height, baseline))),
            Box::new(ImmediateLoader),
        )
    }

    /// Size-proportional metrics with the default families preloaded.
    pub fn with_ratios(ratios: RatioMetrics) -> Self {
        Self::new(Box::new(ratios), Box::new(ImmediateLoader)).with_preloaded(PRELOADED_FAMILIES)
    }

    /// Metrics measured from the installed system fonts.
    pub fn system(fallback: RatioMetrics) -> Self {
        let db = SystemMetrics::system_database();
        Self::new(
            Box::new(SystemMetrics::new(db.clone(), fallback)),
            Box::new(SystemFontLoader::new(db)),
        )
        .with_preloaded(PRELOADED_FAMILIES)
    }

    /// Mark `families` as available without loading them.
    pub fn with_preloaded<I, S>(mut self, families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for family in families {
            self.states.insert(family.into(), FontState::Loaded);
        }
        self
    }

    /// Bumped every time a family finishes loading. Layouts computed under
    /// an older generation may have used fallback metrics.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self, family: &str) -> Option<FontState> {
        self.states.get(family).copied()
    }

    pub fn is_loaded(&self, family: &str) -> bool {
        self.state(family) == Some(FontState::Loaded)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Make sure a load has been started for `family`.
    ///
    /// Families already loaded, pending or failed are left alone; failed
    /// loads are not retried.
    pub fn request(&mut self, family: &str) -> FontState {
        if let Some(state) = self.state(family) {
            return state;
        }
        tracing::debug!(family, "requesting font load");
        self.states.insert(family.to_string(), FontState::Pending);
        let pending = self.loader.load(family);
        self.pending.push(pending);
        FontState::Pending
    }

    /// Metrics for `family` at `size` in pixels.
    pub fn metrics(&mut self, family: &str, size: f32) -> FontMetrics {
        if self.request(family) != FontState::Loaded {
            return self.source.fallback(size);
        }

        let key = MetricsKey {
            family: family.to_string(),
            size_bits: size.to_bits(),
        };
        if let Some(metrics) = self.cache.get(&key) {
            return *metrics;
        }
        let metrics = self
            .source
            .measure(family, size)
            .unwrap_or_else(|| self.source.fallback(size));
        self.cache.insert(key, metrics);
        metrics
    }

    /// Collect finished loads without blocking.
    pub fn poll_loads(&mut self) -> Vec<FontEvent> {
        let mut events = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut pending in std::mem::take(&mut self.pending) {
            match pending.try_complete() {
                None => still_pending.push(pending),
                Some(Ok(())) => {
                    let family = pending.family().to_string();
                    tracing::debug!(family = %family, "font loaded");
                    self.states.insert(family.clone(), FontState::Loaded);
                    self.cache.retain(|key, _| key.family != family);
                    self.generation += 1;
                    events.push(FontEvent::Loaded(family));
                }
                Some(Err(error)) => {
                    let family = pending.family().to_string();
                    tracing::warn!(family = %family, %error, "font could not be loaded, using fallback metrics");
                    self.states.insert(family.clone(), FontState::Failed);
                    events.push(FontEvent::Failed { family, error });
                }
            }
        }

        self.pending = still_pending;
        events
    }
}

impl std::fmt::Debug for FontMetricsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetricsProvider")
            .field("cached", &self.cache.len())
            .field("states", &self.states)
            .field("pending", &self.pending.len())
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::DeferredLoader;

    fn deferred() -> (FontMetricsProvider, crate::font::LoadQueue) {
        let (loader, queue) = DeferredLoader::new();
        let provider =
            FontMetricsProvider::new(Box::new(RatioMetrics::default()), Box::new(loader))
                .with_preloaded(["Arial"]);
        (provider, queue)
    }

    #[test]
    fn test_extra_preloads_add_to_builtin_families() {
        let fonts = FontMetricsProvider::with_ratios(RatioMetrics::default())
            .with_preloaded(["Roboto"]);
        assert!(fonts.is_loaded("Roboto"));
        for family in PRELOADED_FAMILIES {
            assert!(fonts.is_loaded(family), "{family} should stay preloaded");
        }
        assert!(!fonts.is_loaded("Lobster"));
    }

    #[test]
    fn test_preloaded_family_is_measured_and_cached() {
        let (mut fonts, queue) = deferred();
        let m = fonts.metrics("Arial", 20.0);
        assert_eq!(m.width, 10.0);
        assert_eq!(fonts.cache.len(), 1);
        assert!(queue.pending_families().is_empty());
    }

    #[test]
    fn test_unknown_family_requests_load_and_uses_fallback() {
        let (mut fonts, queue) = deferred();
        let m = fonts.metrics("Lobster", 20.0);
        assert_eq!(m, RatioMetrics::default().fallback(20.0));
        assert_eq!(fonts.state("Lobster"), Some(FontState::Pending));
        assert!(fonts.cache.is_empty());
        assert_eq!(queue.pending_families(), vec!["Lobster".to_string()]);

        // A second request does not start another load.
        fonts.metrics("Lobster", 30.0);
        assert_eq!(queue.pending_families().len(), 1);
    }

    #[test]
    fn test_completed_load_bumps_generation() {
        let (mut fonts, queue) = deferred();
        fonts.metrics("Lobster", 20.0);
        assert!(fonts.poll_loads().is_empty());
        assert_eq!(fonts.generation(), 0);

        queue.complete("Lobster", Ok(()));
        let events = fonts.poll_loads();
        assert!(matches!(events.as_slice(), [FontEvent::Loaded(f)] if f == "Lobster"));
        assert!(fonts.is_loaded("Lobster"));
        assert_eq!(fonts.generation(), 1);
        assert!(!fonts.has_pending());
    }

    #[test]
    fn test_failed_load_is_not_retried() {
        let (mut fonts, queue) = deferred();
        fonts.metrics("Lobster", 20.0);
        queue.complete(
            "Lobster",
            Err(FontError::LoadFailed {
                family: "Lobster".into(),
                reason: "offline".into(),
            }),
        );
        let events = fonts.poll_loads();
        assert!(matches!(events.as_slice(), [FontEvent::Failed { .. }]));
        assert_eq!(fonts.state("Lobster"), Some(FontState::Failed));

        fonts.metrics("Lobster", 20.0);
        assert!(queue.pending_families().is_empty());
        assert_eq!(fonts.generation(), 0);
    }

    #[test]
    fn test_uniform_provider_loads_immediately() {
        let mut fonts = FontMetricsProvider::uniform(10.0, 20.0, 16.0);
        assert_eq!(fonts.metrics("Anything", 12.0).width, 10.0);
        let events = fonts.poll_loads();
        assert_eq!(events.len(), 1);
        assert!(fonts.is_loaded("Anything"));
    }
}
