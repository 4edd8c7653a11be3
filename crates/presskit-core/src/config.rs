//! Tunable thresholds for gesture disambiguation.
//!
//! A [`GestureConfiguration`] is an immutable value handed to the state
//! machine. Hosts either build one in code:
//!
//! ```
//! use std::time::Duration;
//! use presskit_core::GestureConfiguration;
//!
//! let config = GestureConfiguration::default()
//!     .long_press_delay(Duration::from_millis(800))
//!     .with_cancel_after_idle();
//! assert_eq!(config.cancel_delay, Some(Duration::from_secs(3)));
//! ```
//!
//! or load it from YAML/TOML, where durations are fractional seconds:
//!
//! ```
//! use presskit_core::GestureConfiguration;
//!
//! let config = GestureConfiguration::from_toml_str("long_press_delay = 0.8").unwrap();
//! assert_eq!(config.long_press_delay.as_millis(), 800);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Idle time after which a gesture that stopped moving is treated as stuck.
/// Only used once cancellation is opted into.
pub const DEFAULT_CANCEL_DELAY: Duration = Duration::from_secs(3);
/// Hold time before a long press fires.
pub const DEFAULT_LONG_PRESS_DELAY: Duration = Duration::from_millis(500);
/// Maximum gap between two releases for the second to count as a double tap.
pub const DEFAULT_DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(200);
/// Hold time before auto-repeat starts ticking.
pub const DEFAULT_REPEAT_START_DELAY: Duration = Duration::from_millis(500);
/// Interval between auto-repeat ticks.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(400);

/// Configuration for press gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawConfiguration", try_from = "RawConfiguration")]
pub struct GestureConfiguration {
    /// Stuck-gesture cancellation delay. `None` disables the heuristic.
    pub cancel_delay: Option<Duration>,
    /// Time required for a long press.
    pub long_press_delay: Duration,
    /// Maximum time between releases for a double tap.
    pub double_tap_window: Duration,
    /// Interval between repeat ticks.
    pub repeat_interval: Duration,
    /// Hold time before repeat ticking starts.
    pub repeat_start_delay: Duration,
    /// Maximum distance from the press origin (in logical pixels) the pointer
    /// may have reached for a long press to still fire.
    pub long_press_max_drag_distance: f32,
}

impl Default for GestureConfiguration {
    fn default() -> Self {
        Self {
            cancel_delay: None,
            long_press_delay: DEFAULT_LONG_PRESS_DELAY,
            double_tap_window: DEFAULT_DOUBLE_TAP_WINDOW,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            repeat_start_delay: DEFAULT_REPEAT_START_DELAY,
            long_press_max_drag_distance: f32::INFINITY,
        }
    }
}

impl GestureConfiguration {
    /// Set the stuck-gesture cancellation delay (`None` disables it).
    #[must_use]
    pub const fn cancel_delay(mut self, delay: Option<Duration>) -> Self {
        self.cancel_delay = delay;
        self
    }

    /// Enable stuck-gesture cancellation with [`DEFAULT_CANCEL_DELAY`].
    #[must_use]
    pub const fn with_cancel_after_idle(self) -> Self {
        self.cancel_delay(Some(DEFAULT_CANCEL_DELAY))
    }

    /// Set the long press delay.
    #[must_use]
    pub const fn long_press_delay(mut self, delay: Duration) -> Self {
        self.long_press_delay = delay;
        self
    }

    /// Set the double tap window.
    #[must_use]
    pub const fn double_tap_window(mut self, window: Duration) -> Self {
        self.double_tap_window = window;
        self
    }

    /// Set the repeat tick interval.
    #[must_use]
    pub const fn repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval;
        self
    }

    /// Set the delay before repeat ticking starts.
    #[must_use]
    pub const fn repeat_start_delay(mut self, delay: Duration) -> Self {
        self.repeat_start_delay = delay;
        self
    }

    /// Set the drag distance beyond which long press is suppressed.
    #[must_use]
    pub fn long_press_max_drag_distance(mut self, distance: f32) -> Self {
        debug_assert!(
            distance >= 0.0,
            "long press drag distance must be non-negative, got {distance}"
        );
        self.long_press_max_drag_distance = distance;
        self
    }

    /// Parse from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfiguration = serde_yaml_ng::from_str(yaml)?;
        Self::try_from(raw)
    }

    /// Parse from a TOML document.
    pub fn from_toml_str(toml_src: &str) -> Result<Self, ConfigError> {
        let raw: RawConfiguration = toml::from_str(toml_src)?;
        Self::try_from(raw)
    }

    /// Load from a `.yaml`, `.yml` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str,
            "toml" => Self::from_toml_str,
            _ => return Err(ConfigError::UnsupportedFormat(extension)),
        };
        let config = parse(&fs::read_to_string(path)?)?;
        log::debug!("loaded gesture configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

/// On-disk shape: every duration as fractional seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    cancel_delay: Option<f64>,
    long_press_delay: f64,
    double_tap_window: f64,
    repeat_interval: f64,
    repeat_start_delay: f64,
    long_press_max_drag_distance: f32,
}

impl Default for RawConfiguration {
    fn default() -> Self {
        GestureConfiguration::default().into()
    }
}

impl From<GestureConfiguration> for RawConfiguration {
    fn from(config: GestureConfiguration) -> Self {
        Self {
            cancel_delay: config.cancel_delay.map(|d| d.as_secs_f64()),
            long_press_delay: config.long_press_delay.as_secs_f64(),
            double_tap_window: config.double_tap_window.as_secs_f64(),
            repeat_interval: config.repeat_interval.as_secs_f64(),
            repeat_start_delay: config.repeat_start_delay.as_secs_f64(),
            long_press_max_drag_distance: config.long_press_max_drag_distance,
        }
    }
}

impl TryFrom<RawConfiguration> for GestureConfiguration {
    type Error = ConfigError;

    fn try_from(raw: RawConfiguration) -> Result<Self, Self::Error> {
        if raw.long_press_max_drag_distance.is_nan() || raw.long_press_max_drag_distance < 0.0 {
            return Err(ConfigError::invalid(
                "long_press_max_drag_distance",
                format!(
                    "expected a non-negative distance, got {}",
                    raw.long_press_max_drag_distance
                ),
            ));
        }
        Ok(Self {
            cancel_delay: raw
                .cancel_delay
                .map(|secs| seconds("cancel_delay", secs))
                .transpose()?,
            long_press_delay: seconds("long_press_delay", raw.long_press_delay)?,
            double_tap_window: seconds("double_tap_window", raw.double_tap_window)?,
            repeat_interval: seconds("repeat_interval", raw.repeat_interval)?,
            repeat_start_delay: seconds("repeat_start_delay", raw.repeat_start_delay)?,
            long_press_max_drag_distance: raw.long_press_max_drag_distance,
        })
    }
}

fn seconds(field: &str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ConfigError::invalid(
            field,
            format!("expected a finite, non-negative number of seconds, got {secs}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_default() {
        let config = GestureConfiguration::default();
        assert_eq!(config.cancel_delay, None);
        assert_eq!(config.long_press_delay, Duration::from_millis(500));
        assert_eq!(config.double_tap_window, Duration::from_millis(200));
        assert_eq!(config.repeat_start_delay, Duration::from_millis(500));
        assert_eq!(config.repeat_interval, Duration::from_millis(400));
        assert!(config.long_press_max_drag_distance.is_infinite());
    }

    #[test]
    fn test_configuration_builder() {
        let config = GestureConfiguration::default()
            .long_press_delay(Duration::from_millis(800))
            .double_tap_window(Duration::from_millis(300))
            .repeat_interval(Duration::from_millis(100))
            .repeat_start_delay(Duration::from_millis(250))
            .long_press_max_drag_distance(12.0)
            .with_cancel_after_idle();
        assert_eq!(config.long_press_delay, Duration::from_millis(800));
        assert_eq!(config.double_tap_window, Duration::from_millis(300));
        assert_eq!(config.repeat_interval, Duration::from_millis(100));
        assert_eq!(config.repeat_start_delay, Duration::from_millis(250));
        assert_eq!(config.long_press_max_drag_distance, 12.0);
        assert_eq!(config.cancel_delay, Some(DEFAULT_CANCEL_DELAY));

        let disabled = config.cancel_delay(None);
        assert_eq!(disabled.cancel_delay, None);
    }

    #[test]
    fn test_configuration_from_yaml_partial() {
        let config = GestureConfiguration::from_yaml_str(
            "long_press_delay: 1.25\ncancel_delay: 2.0\nlong_press_max_drag_distance: 8.0\n",
        )
        .unwrap();
        assert_eq!(config.long_press_delay, Duration::from_millis(1250));
        assert_eq!(config.cancel_delay, Some(Duration::from_secs(2)));
        assert_eq!(config.long_press_max_drag_distance, 8.0);
        assert_eq!(config.double_tap_window, DEFAULT_DOUBLE_TAP_WINDOW);
    }

    #[test]
    fn test_configuration_from_toml() {
        let config = GestureConfiguration::from_toml_str(
            "double_tap_window = 0.375\nrepeat_interval = 0.125\n",
        )
        .unwrap();
        assert_eq!(config.double_tap_window, Duration::from_millis(375));
        assert_eq!(config.repeat_interval, Duration::from_millis(125));
        assert_eq!(config.cancel_delay, None);
    }

    #[test]
    fn test_configuration_empty_documents_are_default() {
        assert_eq!(
            GestureConfiguration::from_toml_str("").unwrap(),
            GestureConfiguration::default()
        );
        assert_eq!(
            GestureConfiguration::from_yaml_str("{}").unwrap(),
            GestureConfiguration::default()
        );
    }

    #[test]
    fn test_configuration_rejects_negative_duration() {
        let err = GestureConfiguration::from_toml_str("long_press_delay = -0.5").unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "long_press_delay"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_configuration_rejects_negative_distance() {
        let err = GestureConfiguration::from_yaml_str("long_press_max_drag_distance: -1.0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_configuration_rejects_unknown_field() {
        let err = GestureConfiguration::from_toml_str("long_press = 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_configuration_toml_roundtrip_keeps_cancel_delay() {
        let config = GestureConfiguration::default()
            .with_cancel_after_idle()
            .long_press_max_drag_distance(20.0);
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("cancel_delay = 3.0"));
        assert_eq!(GestureConfiguration::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_configuration_yaml_omits_disabled_cancel_delay() {
        let text = GestureConfiguration::default().to_yaml_string().unwrap();
        assert!(!text.contains("cancel_delay"));
        assert!(text.contains("long_press_delay: 0.5"));
    }

    #[test]
    fn test_configuration_load_unsupported_extension() {
        let path = std::env::temp_dir().join("presskit_config_test.ini");
        std::fs::write(&path, "long_press_delay = 0.5").unwrap();
        let err = GestureConfiguration::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "ini"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_configuration_load_checks_extension_before_reading() {
        let err = GestureConfiguration::load("/nonexistent/presskit.ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "ini"));
    }

    #[test]
    fn test_configuration_load_yaml_file() {
        let path = std::env::temp_dir().join("presskit_config_test.yaml");
        std::fs::write(&path, "repeat_start_delay: 0.75\n").unwrap();
        let config = GestureConfiguration::load(&path).unwrap();
        assert_eq!(config.repeat_start_delay, Duration::from_millis(750));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_configuration_load_missing_file() {
        let err = GestureConfiguration::load("/nonexistent/presskit.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
