#![forbid(unsafe_code)]

//! Overlay configuration as data.
//!
//! Every delay, offset and shortcut the overlay uses lives in
//! [`OverlayConfig`]. With the `config` feature it loads from TOML or JSON;
//! missing keys take their defaults, so partial files are accepted.
//!
//! ```toml
//! # hguard.toml
//! scan_delay_ms = 600
//! scan_key = "s"
//!
//! [anchor]
//! gap_y = 24.0
//! ```
//!
//! ```rust,ignore
//! let config = OverlayConfig::from_toml_file("hguard.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use hguard_core::scale::ScaleConfig;

use crate::anchor::AnchorConfig;

/// All tunables for one overlay instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverlayConfig {
    /// Time from scan start to result reveal.
    pub scan_delay_ms: u64,
    /// How long the cursor hint stays visible after a reveal.
    pub cursor_hint_ms: u64,
    /// Delay before the demonstration scan after startup.
    pub startup_delay_ms: u64,
    /// Content scroll offset applied on scan start.
    pub scroll_target_top: f64,
    /// Whether the scan-start scroll is animated.
    pub smooth_scroll: bool,
    /// Global shortcut that forces a scan (case-insensitive).
    pub scan_key: char,
    pub anchor: AnchorConfig,
    pub scale: ScaleConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: 900,
            cursor_hint_ms: 1800,
            startup_delay_ms: 650,
            scroll_target_top: 180.0,
            smooth_scroll: true,
            scan_key: 'r',
            anchor: AnchorConfig::default(),
            scale: ScaleConfig::default(),
        }
    }
}

impl OverlayConfig {
    #[must_use]
    pub const fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    #[must_use]
    pub const fn cursor_hint_duration(&self) -> Duration {
        Duration::from_millis(self.cursor_hint_ms)
    }

    #[must_use]
    pub const fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check every parameter is within range.
    ///
    /// Returns one message per problem; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.scan_delay_ms == 0 {
            errors.push("scan_delay_ms must be > 0".into());
        }
        if self.cursor_hint_ms == 0 {
            errors.push("cursor_hint_ms must be > 0".into());
        }
        if !(self.scroll_target_top.is_finite() && self.scroll_target_top >= 0.0) {
            errors.push(format!(
                "scroll_target_top must be >= 0, got {}",
                self.scroll_target_top
            ));
        }
        if !self.scan_key.is_alphanumeric() {
            errors.push(format!(
                "scan_key must be a letter or digit, got {:?}",
                self.scan_key
            ));
        }

        let a = &self.anchor;
        for (name, value) in [
            ("anchor.offset_x", a.offset_x),
            ("anchor.gap_y", a.gap_y),
            ("anchor.margin_left", a.margin_left),
            ("anchor.margin_right", a.margin_right),
            ("anchor.margin_top", a.margin_top),
            ("anchor.margin_bottom", a.margin_bottom),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{name} must be >= 0, got {value}"));
            }
        }

        if self.scale.base_width <= 0.0 || self.scale.base_height <= 0.0 {
            errors.push(format!(
                "scale base size must be > 0, got {}x{}",
                self.scale.base_width, self.scale.base_height
            ));
        }
        if self.scale.pad < 0.0 {
            errors.push(format!("scale.pad must be >= 0, got {}", self.scale.pad));
        }

        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Invalid(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let c = OverlayConfig::default();
        assert_eq!(c.scan_delay(), Duration::from_millis(900));
        assert_eq!(c.cursor_hint_duration(), Duration::from_millis(1800));
        assert_eq!(c.startup_delay(), Duration::from_millis(650));
        assert_eq!(c.scroll_target_top, 180.0);
        assert_eq!(c.scan_key, 'r');
        assert_eq!(c.anchor.offset_x, 14.0);
        assert_eq!(c.anchor.margin_bottom, 18.0);
        assert_eq!(c.scale.base_width, 1280.0);
    }

    #[test]
    fn default_validates_clean() {
        let errors = OverlayConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn validate_catches_zero_delay() {
        let c = OverlayConfig {
            scan_delay_ms: 0,
            ..OverlayConfig::default()
        };
        assert!(c.validate().iter().any(|e| e.contains("scan_delay_ms")));
    }

    #[test]
    fn validate_catches_negative_margin() {
        let mut c = OverlayConfig::default();
        c.anchor.margin_top = -1.0;
        assert!(c.validate().iter().any(|e| e.contains("anchor.margin_top")));
    }

    #[test]
    fn validate_catches_zero_base() {
        let mut c = OverlayConfig::default();
        c.scale.base_height = 0.0;
        assert!(c.validate().iter().any(|e| e.contains("base size")));
    }

    #[test]
    fn validated_wraps_errors() {
        let c = OverlayConfig {
            scan_key: ' ',
            ..OverlayConfig::default()
        };
        let err = c.validated().expect_err("space is not a shortcut");
        assert!(matches!(err, ConfigError::Invalid(ref e) if e.len() == 1));
        assert!(err.to_string().contains("scan_key"));
    }

    #[cfg(feature = "config")]
    mod loading {
        use super::*;
        use std::io::Write;

        #[test]
        fn partial_toml_keeps_defaults() {
            let c = OverlayConfig::from_toml_str(
                "scan_delay_ms = 600\nscan_key = \"s\"\n[anchor]\ngap_y = 24.0\n",
            )
            .expect("valid toml");
            assert_eq!(c.scan_delay_ms, 600);
            assert_eq!(c.scan_key, 's');
            assert_eq!(c.anchor.gap_y, 24.0);
            assert_eq!(c.anchor.offset_x, 14.0);
            assert_eq!(c.cursor_hint_ms, 1800);
        }

        #[test]
        fn json_round_trips_defaults() {
            let json = serde_json::to_string(&OverlayConfig::default()).expect("serialize");
            let c = OverlayConfig::from_json_str(&json).expect("parse");
            assert_eq!(c, OverlayConfig::default());
        }

        #[test]
        fn toml_file_loads() {
            let mut f = tempfile::NamedTempFile::new().expect("temp file");
            writeln!(f, "startup_delay_ms = 0").expect("write");
            let c = OverlayConfig::from_toml_file(f.path()).expect("load");
            assert_eq!(c.startup_delay_ms, 0);
        }

        #[test]
        fn bad_toml_is_toml_error() {
            let err = OverlayConfig::from_toml_str("scan_delay_ms = \"soon\"").unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)));
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = OverlayConfig::from_json_file("/nonexistent/hguard.json").unwrap_err();
            assert!(matches!(err, ConfigError::Io(_)));
        }
    }
}
