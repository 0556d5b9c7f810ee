pub mod face;
pub mod loader;
pub mod metrics;
pub mod provider;
pub mod source;

pub use face::FontFace;
pub use loader::{DeferredLoader, FontLoadHandle, FontLoader, ImmediateLoader, LoadQueue, PendingFont, SystemFontLoader};
pub use metrics::{FaceMetrics, FontMetrics};
pub use provider::{FontEvent, FontMetricsProvider, FontState, PRELOADED_FAMILIES};
pub use source::{MetricsSource, RatioMetrics, SystemMetrics, UniformMetrics};

/// Errors that can occur while working with fonts.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data")]
    InvalidFont,
    #[error("font family `{family}` is not available")]
    NotFound { family: String },
    #[error("font family `{family}` failed to load: {reason}")]
    LoadFailed { family: String, reason: String },
    #[error("load of font family `{family}` was abandoned")]
    Canceled { family: String },
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
