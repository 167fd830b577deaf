#![forbid(unsafe_code)]

//! Tunable constants for the scroller, injected at construction.
//!
//! Every timing budget, wheel constant, and engine workaround switch lives in
//! one [`ScrollerConfig`] handed to [`Scroller::new`](crate::Scroller::new).
//! With the `config-file` feature the config can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # glide.toml
//! [ticks]
//! queued_operation_ticks = 3
//!
//! [wheel]
//! scroll_velocity_per_unit = 1200.0
//!
//! [quirks]
//! interrupt_overlapping_animations = false
//! ```
//!
//! ```rust,ignore
//! let config = ScrollerConfig::from_toml_file("glide.toml")?;
//! let config = ScrollerConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! The wheel and inertia constants are empirically tuned to feel like a
//! desktop platform's built-in scrolling. They are exposed so hosts can
//! retune them; nothing derives them from a formula.

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

// ---------------------------------------------------------------------------
// Top-level ScrollerConfig
// ---------------------------------------------------------------------------

/// Every tunable parameter of a [`Scroller`](crate::Scroller).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct ScrollerConfig {
    /// Tick budgets for queued and dispatched operations.
    pub ticks: TickConfig,
    /// Animated view-change durations.
    pub animation: AnimationConfig,
    /// Inertia defaults.
    pub inertia: InertiaConfig,
    /// Mouse-wheel scrolling and zooming.
    pub wheel: WheelConfig,
    /// Engine capability and defect switches.
    pub quirks: PlatformQuirks,
}

impl ScrollerConfig {
    /// Parse from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every field and return a description of each problem found.
    /// An empty list means the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.ticks.queued_operation_ticks == 0 {
            errors.push("ticks.queued_operation_ticks must be > 0".into());
        }
        if self.ticks.max_non_animated_operation_ticks == 0 {
            errors.push("ticks.max_non_animated_operation_ticks must be > 0".into());
        }

        let a = &self.animation;
        for (name, per_unit, min, max) in [
            ("offsets", a.offsets_ms_per_unit, a.offsets_min_ms, a.offsets_max_ms),
            ("zoom", a.zoom_ms_per_unit, a.zoom_min_ms, a.zoom_max_ms),
        ] {
            if !per_unit.is_finite() || per_unit < 0.0 {
                errors.push(format!("animation.{name}_ms_per_unit must be finite and >= 0"));
            }
            if min > max {
                errors.push(format!("animation.{name}_min_ms must be <= {name}_max_ms"));
            }
        }

        if !is_unit(self.inertia.default_decay_rate) {
            errors.push("inertia.default_decay_rate must be in [0, 1]".into());
        }
        if !is_non_negative(self.inertia.constant_velocity_epsilon) {
            errors.push("inertia.constant_velocity_epsilon must be >= 0".into());
        }

        let w = &self.wheel;
        if w.delta_for_velocity_unit <= 0 {
            errors.push("wheel.delta_for_velocity_unit must be > 0".into());
        }
        if !is_unit(w.zoom_decay_rate) || !is_unit(w.scroll_decay_rate) {
            errors.push("wheel decay rates must be in [0, 1]".into());
        }
        if !(is_non_negative(w.min_zoom_velocity_units)
            && w.min_zoom_velocity_units <= w.max_zoom_velocity_units)
        {
            errors.push("wheel zoom velocity units must satisfy 0 <= min <= max".into());
        }
        if !is_positive(w.zoom_factor_change_per_velocity_unit) {
            errors.push("wheel.zoom_factor_change_per_velocity_unit must be > 0".into());
        }
        if !(is_non_negative(w.min_scroll_velocity) && w.min_scroll_velocity <= w.max_scroll_velocity) {
            errors.push("wheel scroll velocities must satisfy 0 <= min <= max".into());
        }
        if !is_positive(w.scroll_velocity_per_unit) {
            errors.push("wheel.scroll_velocity_per_unit must be > 0".into());
        }

        errors
    }
}

fn is_unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn is_non_negative(value: f64) -> bool {
    value >= 0.0
}

fn is_positive(value: f64) -> bool {
    value > 0.0
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// Tick budgets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct TickConfig {
    /// Ticks a direct request waits before dispatch, letting pending layout
    /// settle.
    pub queued_operation_ticks: u8,
    /// Ticks after dispatch before a silent non-animated operation is
    /// force-completed.
    pub max_non_animated_operation_ticks: u8,
    /// Ticks to keep running after a zoom settles before raising
    /// [`ScrollerEvent::ZoomSettled`](crate::ScrollerEvent::ZoomSettled).
    pub animation_restart_ticks: u8,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            queued_operation_ticks: 3,
            max_non_animated_operation_ticks: 10,
            animation_restart_ticks: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Animated view-change durations: `clamp(distance * ms_per_unit, min, max)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct AnimationConfig {
    /// Whether `AnimationMode::Auto` animates.
    pub animations_enabled: bool,
    pub offsets_ms_per_unit: f64,
    pub offsets_min_ms: u64,
    pub offsets_max_ms: u64,
    pub zoom_ms_per_unit: f64,
    pub zoom_min_ms: u64,
    pub zoom_max_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            animations_enabled: true,
            offsets_ms_per_unit: 5.0,
            offsets_min_ms: 50,
            offsets_max_ms: 1000,
            zoom_ms_per_unit: 250.0,
            zoom_min_ms: 50,
            zoom_max_ms: 1000,
        }
    }
}

impl AnimationConfig {
    /// Duration of an offsets animation covering `distance` pixels.
    pub fn offsets_duration(&self, distance: f64) -> Duration {
        clamp_duration(distance * self.offsets_ms_per_unit, self.offsets_min_ms, self.offsets_max_ms)
    }

    /// Duration of a zoom animation covering `distance` zoom-factor units.
    pub fn zoom_duration(&self, distance: f64) -> Duration {
        clamp_duration(distance * self.zoom_ms_per_unit, self.zoom_min_ms, self.zoom_max_ms)
    }
}

fn clamp_duration(ms: f64, min: u64, max: u64) -> Duration {
    let ms = if ms.is_finite() { ms.abs() } else { max as f64 };
    Duration::from_millis((ms as u64).clamp(min, max.max(min)))
}

// ---------------------------------------------------------------------------
// Inertia
// ---------------------------------------------------------------------------

/// Inertia defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct InertiaConfig {
    /// Decay rate used for an axis a velocity request does not override.
    pub default_decay_rate: f64,
    /// Largest tolerated difference between a requested constant velocity
    /// and the engine's reported initial inertia velocity.
    pub constant_velocity_epsilon: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            default_decay_rate: 0.95,
            constant_velocity_epsilon: 0.5,
        }
    }
}

/// Distance travelled by inertia starting at `velocity` and losing
/// `decay_rate` of its velocity per second.
pub fn inertia_travel(velocity: f64, decay_rate: f64) -> f64 {
    if velocity == 0.0 {
        return 0.0;
    }
    if decay_rate <= 0.0 {
        return f64::INFINITY.copysign(velocity);
    }
    velocity / -(1.0 - decay_rate.min(1.0)).ln()
}

/// Initial velocity for which inertia losing `decay_rate` per second
/// travels `distance`. The inverse of [`inertia_travel`] for rates in
/// `(0, 1)`.
pub fn velocity_for_travel(distance: f64, decay_rate: f64) -> f64 {
    let rate = decay_rate.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
    distance * -(1.0 - rate).ln()
}

// ---------------------------------------------------------------------------
// Wheel
// ---------------------------------------------------------------------------

/// Mouse-wheel constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct WheelConfig {
    /// Wheel delta per velocity unit (one notch).
    pub delta_for_velocity_unit: i32,
    /// Zoom inertia decay rate for Ctrl+wheel.
    pub zoom_decay_rate: f64,
    /// Largest accumulated zoom velocity, in units.
    pub max_zoom_velocity_units: f64,
    /// Velocity added to every fresh zoom operation so it produces visible
    /// motion, in units.
    pub min_zoom_velocity_units: f64,
    /// Zoom factor change produced by one velocity unit.
    pub zoom_factor_change_per_velocity_unit: f64,
    /// Offsets inertia decay rate for wheel scrolling.
    pub scroll_decay_rate: f64,
    /// Pixels per second added per velocity unit.
    pub scroll_velocity_per_unit: f64,
    /// Velocity added to every fresh scroll operation, in pixels per second.
    pub min_scroll_velocity: f64,
    /// Largest accumulated scroll velocity, in pixels per second.
    pub max_scroll_velocity: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            delta_for_velocity_unit: 120,
            zoom_decay_rate: 0.999972,
            max_zoom_velocity_units: 5.0,
            min_zoom_velocity_units: 0.05,
            zoom_factor_change_per_velocity_unit: 0.1,
            scroll_decay_rate: 0.999972,
            scroll_velocity_per_unit: 1000.0,
            min_scroll_velocity: 30.0,
            max_scroll_velocity: 10_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Platform quirks
// ---------------------------------------------------------------------------

/// Engine capability and defect switches.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct PlatformQuirks {
    /// When false every view-change call fails with `NotImplemented`.
    pub view_changes_supported: bool,
    /// Issue a zero-magnitude instant command before an animated command
    /// of the kind that is already animating.
    pub interrupt_overlapping_animations: bool,
    /// Hold zoom commands until earlier non-animated commands resolve.
    pub serialize_zoom_after_non_animated: bool,
}

impl Default for PlatformQuirks {
    fn default() -> Self {
        Self {
            view_changes_supported: true,
            interrupt_overlapping_animations: true,
            serialize_zoom_after_non_animated: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading a config file.
#[cfg(feature = "config-file")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
