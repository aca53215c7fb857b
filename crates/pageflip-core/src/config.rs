#![forbid(unsafe_code)]

//! Flip configuration.
//!
//! [`FlipConfig`] groups every tunable of the page-flip controller. The
//! defaults reproduce the stock widget: vertical flips, 200 ms animations, a
//! 10-unit drag threshold and a 45° bounce limit at the ends of the book.
//!
//! # Loading
//!
//! With the `config` feature, configs load from TOML or JSON and are
//! validated on the way in:
//!
//! ```toml
//! orientation = "horizontal"
//! animation_duration_ms = 300
//! loop_forever = true
//! ```
//!
//! ```rust,ignore
//! let config = FlipConfig::from_toml_file("pageflip.toml")?;
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Which way pages turn.
///
/// Vertical flips rotate around a horizontal axis and track up/down drags;
/// horizontal flips rotate around a vertical axis and track left/right drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(try_from = "String", into = "String"))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(ConfigError::invalid_orientation(other)),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Orientation> for String {
    fn from(value: Orientation) -> Self {
        value.as_str().to_owned()
    }
}

// ---------------------------------------------------------------------------
// FlipConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`FlipPage`](crate::flip::FlipPage).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct FlipConfig {
    /// Flip axis (default: vertical).
    pub orientation: Orientation,
    /// Length of the commit animation and of every transition (default: 200ms).
    pub animation_duration_ms: u64,
    /// Distance a drag must exceed on either axis before it commits a
    /// direction (default: 10).
    pub threshold: f64,
    /// Rotation limit, in degrees, when dragging towards a page that does
    /// not exist (default: 45).
    pub max_angle: f64,
    /// Opacity of the shadow mask over the page underneath (default: 0.4).
    pub mask_opacity: f64,
    /// CSS perspective applied to every half transform (default: `130em`).
    pub perspective: String,
    /// Page background colour (default: `#fff`).
    pub page_background: String,
    /// Page width in distance units (default: 320).
    pub width: f64,
    /// Page height in distance units (default: 480).
    pub height: f64,
    /// Index shown at mount, clamped to the page count (default: 0).
    pub start_page: usize,
    /// Wrap from the last page to the first and back (default: false).
    pub loop_forever: bool,
    /// Treat the pointer leaving mid-drag as a release instead of a cancel
    /// (default: false).
    pub flip_on_leave: bool,
    /// Peek the bottom half shortly after mount (default: false).
    pub show_hint: bool,
    /// Show the touch affordance shortly after mount (default: false).
    pub show_touch_hint: bool,
    /// Render pages without the centre cut (default: false).
    pub uncut_pages: bool,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            animation_duration_ms: 200,
            threshold: 10.0,
            max_angle: 45.0,
            mask_opacity: 0.4,
            perspective: "130em".to_owned(),
            page_background: "#fff".to_owned(),
            width: 320.0,
            height: 480.0,
            start_page: 0,
            loop_forever: false,
            flip_on_leave: false,
            show_hint: false,
            show_touch_hint: false,
            uncut_pages: false,
        }
    }
}

impl FlipConfig {
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_angle(mut self, degrees: f64) -> Self {
        self.max_angle = degrees;
        self
    }

    #[must_use]
    pub fn with_start_page(mut self, index: usize) -> Self {
        self.start_page = index;
        self
    }

    #[must_use]
    pub fn with_loop_forever(mut self, enabled: bool) -> Self {
        self.loop_forever = enabled;
        self
    }

    #[must_use]
    pub fn with_flip_on_leave(mut self, enabled: bool) -> Self {
        self.flip_on_leave = enabled;
        self
    }

    #[must_use]
    pub fn with_hints(mut self, show_hint: bool, show_touch_hint: bool) -> Self {
        self.show_hint = show_hint;
        self.show_touch_hint = show_touch_hint;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Commit animation length.
    #[inline]
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Check every numeric field, reporting the first one out of range.
    pub fn validate(&self) -> Result<()> {
        finite_in("threshold", self.threshold, 0.0, f64::INFINITY, "[0, inf)")?;
        finite_in("max_angle", self.max_angle, 0.0, 180.0, "[0, 180]")?;
        finite_in("mask_opacity", self.mask_opacity, 0.0, 1.0, "[0, 1]")?;
        positive("width", self.width)?;
        positive("height", self.height)?;
        Ok(())
    }
}

fn finite_in(
    field: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
    expected: &'static str,
) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    if value < lo || value > hi {
        return Err(ConfigError::OutOfRange {
            field,
            expected,
            value,
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigError::OutOfRange {
            field,
            expected: "(0, inf)",
            value,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

#[cfg(feature = "config")]
impl FlipConfig {
    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(all(test, feature = "config"))]
mod file_tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let config = FlipConfig::from_toml_str(
            "orientation = \"horizontal\"\nanimation_duration_ms = 300\nloop_forever = true\n",
        )
        .unwrap();
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.animation_duration_ms, 300);
        assert!(config.loop_forever);
        assert_eq!(config.threshold, 10.0);
    }

    #[test]
    fn toml_bad_orientation_is_descriptive() {
        let err = FlipConfig::from_toml_str("orientation = \"diagonal\"\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("diagonal"), "{msg}");
    }

    #[test]
    fn toml_unknown_field_rejected() {
        assert!(FlipConfig::from_toml_str("treshold = 4.0\n").is_err());
    }

    #[test]
    fn json_validates_after_parse() {
        let err = FlipConfig::from_json_str(r#"{"max_angle": 270.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "max_angle", .. }));
    }

    #[test]
    fn json_round_trip_through_file() {
        let config = FlipConfig::default()
            .with_orientation(Orientation::Horizontal)
            .with_flip_on_leave(true);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json_string().unwrap().as_bytes())
            .unwrap();
        let loaded = FlipConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FlipConfig::from_toml_file("/nonexistent/pageflip.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
