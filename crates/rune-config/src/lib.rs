//! Rune text editor configuration
//!
//! Settings are loaded from `rune.toml` and can be overridden with
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Defaults for newly created text
    pub text: TextConfig,
    /// Editor behavior
    pub editor: EditorConfig,
    /// Font metrics settings
    pub fonts: FontConfig,
}

/// Style applied to text typed into a new layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub family: String,
    /// Size in pixels
    pub size: f32,
    /// Fill color as `#rrggbb` or `#rrggbbaa`
    pub fill_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Seconds between caret blink toggles
    pub blink_interval: f32,
    /// Smallest width/height of a dynamically sized text box, in pixels
    pub min_box_size: f32,
    /// Wrap granularity for new layers: "word" or "letter"
    pub wrap: String,
    /// Text direction for new layers: "ltr", "rtl", "ttb" or "btt"
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Families treated as available without a load, on top of the
    /// built-in set the font provider always preloads
    pub preloaded: Vec<String>,
    /// Measure families from installed system fonts
    pub system_fonts: bool,
    /// Fallback average advance as a fraction of the font size
    pub fallback_width_ratio: f32,
    /// Fallback line height as a fraction of the font size
    pub fallback_height_ratio: f32,
    /// Fallback baseline offset as a fraction of the font size
    pub fallback_baseline_ratio: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 40.0,
            fill_color: "#008800".to_string(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            blink_interval: 0.5,
            min_box_size: 9.0,
            wrap: "letter".to_string(),
            direction: "ltr".to_string(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            preloaded: Vec::new(),
            system_fonts: false,
            fallback_width_ratio: 0.5,
            fallback_height_ratio: 1.2,
            fallback_baseline_ratio: 0.9,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

fn env_f32(name: &str) -> Option<f32> {
    let val = std::env::var(name).ok()?;
    match val.trim().parse::<f32>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(name, value = %val, "ignoring non-numeric environment override");
            None
        }
    }
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path.as_ref()) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.as_ref().display(), error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from `rune.toml` in the current directory or
    /// return the default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_or_default_from("rune.toml")
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(family) = std::env::var("RUNE_TEXT_FAMILY") {
            self.text.family = family;
        }
        if let Some(size) = env_f32("RUNE_TEXT_SIZE") {
            self.text.size = size;
        }
        if let Some(interval) = env_f32("RUNE_BLINK_INTERVAL") {
            self.editor.blink_interval = interval;
        }
        if let Some(min) = env_f32("RUNE_MIN_BOX_SIZE") {
            self.editor.min_box_size = min;
        }
        if let Ok(val) = std::env::var("RUNE_SYSTEM_FONTS") {
            self.fonts.system_fonts = env_flag(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert_eq!(config.text.family, "Arial");
        assert_eq!(config.text.size, 40.0);
        assert_eq!(config.editor.min_box_size, 9.0);
        assert!(config.fonts.preloaded.is_empty());
        assert!(!config.fonts.system_fonts);
    }

    #[test]
    fn test_extra_preloaded_families() {
        let config: RuneConfig = toml::from_str(
            r#"
[fonts]
preloaded = ["Roboto", "Lobster"]
"#,
        )
        .unwrap();
        assert_eq!(config.fonts.preloaded, vec!["Roboto", "Lobster"]);
        assert!(!config.fonts.system_fonts);
    }

    #[test]
    fn test_toml_serialization() {
        let config = RuneConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: RuneConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[text]\nfamily = \"Verdana\"\n\n[editor]\nwrap = \"word\"\nblink_interval = 0.25"
        )
        .unwrap();

        let config = RuneConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.text.family, "Verdana");
        assert_eq!(config.text.size, 40.0);
        assert_eq!(config.editor.wrap, "word");
        assert_eq!(config.editor.blink_interval, 0.25);
        assert_eq!(config.editor.direction, "ltr");
    }

    #[test]
    fn test_load_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = RuneConfig::load_from_file(dir.path().join("rune.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[text\nfamily = 1").unwrap();
        assert!(matches!(
            RuneConfig::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(RuneConfig::load_or_default_from(&path), RuneConfig::default());
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if rune.toml doesn't exist
        let config = RuneConfig::load_or_default_from("definitely-missing-rune.toml");
        assert_eq!(config, RuneConfig::default());
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_TEXT_FAMILY", "Impact");
            std::env::set_var("RUNE_TEXT_SIZE", "24");
            std::env::set_var("RUNE_MIN_BOX_SIZE", "not-a-number");
            std::env::set_var("RUNE_SYSTEM_FONTS", "true");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();

        assert_eq!(config.text.family, "Impact");
        assert_eq!(config.text.size, 24.0);
        assert_eq!(config.editor.min_box_size, 9.0);
        assert!(config.fonts.system_fonts);

        unsafe {
            std::env::remove_var("RUNE_TEXT_FAMILY");
            std::env::remove_var("RUNE_TEXT_SIZE");
            std::env::remove_var("RUNE_MIN_BOX_SIZE");
            std::env::remove_var("RUNE_SYSTEM_FONTS");
        }
    }
}
