#![forbid(unsafe_code)]

//! View-change requests and their option bundles.
//!
//! A [`ViewChangeRequest`] is an immutable description of one requested
//! motion. The runtime owns exactly one request per queued operation; the
//! only fields that change after issuance are the ones coalescing folds into
//! (offsets from proxy controllers, accumulated wheel velocity).
//!
//! # Variants
//!
//! | Variant | Origin |
//! |---------|--------|
//! | [`Offsets`](ViewChangeRequest::Offsets) | `scroll_to`, `scroll_by`, proxy scroll requests |
//! | [`OffsetsWithVelocity`](ViewChangeRequest::OffsetsWithVelocity) | `scroll_with` (constant velocity) |
//! | [`OffsetsWithAdditionalVelocity`](ViewChangeRequest::OffsetsWithAdditionalVelocity) | `scroll_from`, wheel scrolling, proxy throws |
//! | [`ZoomFactor`](ViewChangeRequest::ZoomFactor) | `zoom_to`, `zoom_by` |
//! | [`ZoomFactorWithAdditionalVelocity`](ViewChangeRequest::ZoomFactorWithAdditionalVelocity) | `zoom_from`, Ctrl+wheel |

use bitflags::bitflags;

use crate::geometry::{Axis, Vec2};

/// Whether a positional change is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationMode {
    /// Animate unless the host disabled animations.
    #[default]
    Auto,
    /// Always animate.
    Enabled,
    /// Jump straight to the target.
    Disabled,
}

impl AnimationMode {
    /// Resolve `Auto` against the host's animation setting.
    #[inline]
    pub const fn is_animated(self, animations_enabled: bool) -> bool {
        match self {
            Self::Auto => animations_enabled,
            Self::Enabled => true,
            Self::Disabled => false,
        }
    }
}

/// Whether the target passes through the axis's snap points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnapPointsMode {
    #[default]
    Default,
    Ignore,
}

/// How offsets or zoom factors in a request are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Target values.
    Absolute,
    /// Deltas from the current view at dispatch time.
    RelativeToCurrent,
}

/// Option bundle shared by scroll and zoom requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewChangeOptions {
    pub animation_mode: AnimationMode,
    pub snap_points_mode: SnapPointsMode,
}

impl ViewChangeOptions {
    /// Instant change honoring snap points.
    pub const INSTANT: Self = Self::new(AnimationMode::Disabled, SnapPointsMode::Default);
    /// Animated change honoring snap points.
    pub const ANIMATED: Self = Self::new(AnimationMode::Enabled, SnapPointsMode::Default);

    /// Create an option bundle.
    #[must_use]
    pub const fn new(animation_mode: AnimationMode, snap_points_mode: SnapPointsMode) -> Self {
        Self {
            animation_mode,
            snap_points_mode,
        }
    }

    /// Copy with a different snap-points mode.
    #[must_use]
    pub const fn with_snap_points_mode(mut self, snap_points_mode: SnapPointsMode) -> Self {
        self.snap_points_mode = snap_points_mode;
        self
    }
}

bitflags! {
    /// Origin of a request. Several flags are set when requests from
    /// different proxies coalesce into one operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OperationTrigger: u8 {
        /// Public API call.
        const DIRECT_CALL      = 0b0001;
        /// Horizontal scroll controller.
        const HORIZONTAL_PROXY = 0b0010;
        /// Vertical scroll controller.
        const VERTICAL_PROXY   = 0b0100;
        /// Mouse wheel.
        const WHEEL            = 0b1000;
        /// Either proxy controller.
        const PROXY = Self::HORIZONTAL_PROXY.bits() | Self::VERTICAL_PROXY.bits();
    }
}

impl OperationTrigger {
    /// Proxy flag for the controller driving `axis`.
    #[inline]
    pub const fn proxy(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::HORIZONTAL_PROXY,
            Axis::Vertical => Self::VERTICAL_PROXY,
        }
    }
}

/// Per-axis inertia decay-rate override.
///
/// A decay rate is the fraction of velocity lost per second, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecayRateOverride {
    pub horizontal: Option<f64>,
    pub vertical: Option<f64>,
}

impl DecayRateOverride {
    /// No override on either axis.
    pub const NONE: Self = Self {
        horizontal: None,
        vertical: None,
    };

    /// Override both axes.
    #[must_use]
    pub const fn both(rate: Vec2) -> Self {
        Self {
            horizontal: Some(rate.x),
            vertical: Some(rate.y),
        }
    }

    /// Override for one axis.
    #[inline]
    pub const fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Replace one axis's override.
    pub fn set(&mut self, axis: Axis, rate: Option<f64>) {
        match axis {
            Axis::Horizontal => self.horizontal = rate,
            Axis::Vertical => self.vertical = rate,
        }
    }

    /// Whether neither axis is overridden.
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    /// Decay-rate vector to hand to the engine, or `None` to keep the
    /// engine's default. Missing axes fall back to `default_rate`, and
    /// every component is clamped to `[0, 1]`.
    pub fn resolve(&self, default_rate: f64) -> Option<Vec2> {
        if self.is_none() {
            return None;
        }
        let pick = |rate: Option<f64>| rate.unwrap_or(default_rate).clamp(0.0, 1.0);
        Some(Vec2::new(pick(self.horizontal), pick(self.vertical)))
    }
}

/// Offsets change, animated or instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetsChange {
    /// Target offsets or deltas, depending on `view_kind`.
    pub offsets: Vec2,
    pub view_kind: ViewKind,
    pub options: ViewChangeOptions,
}

/// Throw at a constant velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetsChangeWithVelocity {
    /// Pixels per second.
    pub velocity: Vec2,
}

/// Add velocity to whatever motion is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetsChangeWithAdditionalVelocity {
    /// Pixels per second.
    pub velocity: Vec2,
    pub inertia_decay_rate: DecayRateOverride,
    /// Predicted offsets change once inertia settles.
    pub anticipated_change: Vec2,
}

/// Zoom factor change, animated or instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFactorChange {
    /// Target zoom factor or delta, depending on `view_kind`.
    pub zoom_factor: f64,
    /// Viewport point kept stationary while zooming. `None` selects the
    /// anchor point at dispatch time.
    pub center_point: Option<Vec2>,
    pub view_kind: ViewKind,
    pub options: ViewChangeOptions,
}

/// Add zoom velocity to whatever motion is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFactorChangeWithAdditionalVelocity {
    /// Zoom factor units per second.
    pub velocity: f64,
    pub center_point: Option<Vec2>,
    pub inertia_decay_rate: Option<f64>,
    /// Predicted zoom factor change once inertia settles.
    pub anticipated_change: f64,
}

/// One requested motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewChangeRequest {
    Offsets(OffsetsChange),
    OffsetsWithVelocity(OffsetsChangeWithVelocity),
    OffsetsWithAdditionalVelocity(OffsetsChangeWithAdditionalVelocity),
    ZoomFactor(ZoomFactorChange),
    ZoomFactorWithAdditionalVelocity(ZoomFactorChangeWithAdditionalVelocity),
}

impl ViewChangeRequest {
    /// Whether this request moves offsets rather than the zoom factor.
    #[inline]
    pub const fn is_offsets(&self) -> bool {
        matches!(
            self,
            Self::Offsets(_) | Self::OffsetsWithVelocity(_) | Self::OffsetsWithAdditionalVelocity(_)
        )
    }

    /// Short name for logs.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Offsets(_) => "offsets",
            Self::OffsetsWithVelocity(_) => "offsets_velocity",
            Self::OffsetsWithAdditionalVelocity(_) => "offsets_additional_velocity",
            Self::ZoomFactor(_) => "zoom_factor",
            Self::ZoomFactorWithAdditionalVelocity(_) => "zoom_additional_velocity",
        }
    }

    /// Option bundle, for the positional variants.
    pub const fn options(&self) -> Option<ViewChangeOptions> {
        match self {
            Self::Offsets(change) => Some(change.options),
            Self::ZoomFactor(change) => Some(change.options),
            _ => None,
        }
    }

    /// View kind, for the positional variants.
    pub const fn view_kind(&self) -> Option<ViewKind> {
        match self {
            Self::Offsets(change) => Some(change.view_kind),
            Self::ZoomFactor(change) => Some(change.view_kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_animation_follows_host_setting() {
        assert!(AnimationMode::Auto.is_animated(true));
        assert!(!AnimationMode::Auto.is_animated(false));
        assert!(AnimationMode::Enabled.is_animated(false));
        assert!(!AnimationMode::Disabled.is_animated(true));
    }

    #[test]
    fn trigger_flags_combine() {
        let both = OperationTrigger::HORIZONTAL_PROXY | OperationTrigger::VERTICAL_PROXY;
        assert_eq!(both, OperationTrigger::PROXY);
        assert!(both.intersects(OperationTrigger::proxy(Axis::Vertical)));
        assert!(!both.contains(OperationTrigger::DIRECT_CALL));
    }

    #[test]
    fn decay_override_resolves_missing_axis_to_default() {
        assert_eq!(DecayRateOverride::NONE.resolve(0.95), None);
        let mut rate = DecayRateOverride::NONE;
        rate.set(Axis::Vertical, Some(0.5));
        assert_eq!(rate.resolve(0.95), Some(Vec2::new(0.95, 0.5)));
    }

    #[test]
    fn decay_override_clamps_to_unit_range() {
        let rate = DecayRateOverride::both(Vec2::new(-1.0, 3.0));
        assert_eq!(rate.resolve(0.95), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn positional_variants_expose_options() {
        let request = ViewChangeRequest::Offsets(OffsetsChange {
            offsets: Vec2::new(10.0, 0.0),
            view_kind: ViewKind::Absolute,
            options: ViewChangeOptions::ANIMATED,
        });
        assert!(request.is_offsets());
        assert_eq!(request.options(), Some(ViewChangeOptions::ANIMATED));
        let throw = ViewChangeRequest::OffsetsWithVelocity(OffsetsChangeWithVelocity {
            velocity: Vec2::new(200.0, 0.0),
        });
        assert_eq!(throw.options(), None);
        assert_eq!(throw.kind_name(), "offsets_velocity");
    }
}
