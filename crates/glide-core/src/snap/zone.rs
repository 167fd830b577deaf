#![forbid(unsafe_code)]

//! Applicable zones and the resting-value constraints exported to the engine.

use super::point::{ApplicableRange, SnapPointKind};

/// Half-open interval `[min, max)` of axis values attracted by one snap point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicableZone {
    pub min: f64,
    pub max: f64,
}

impl ApplicableZone {
    /// The whole axis.
    pub const UNBOUNDED: Self = Self::new(f64::NEG_INFINITY, f64::INFINITY);

    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Zone that attracts nothing, pinned at `value`.
    #[inline]
    pub const fn empty_at(value: f64) -> Self {
        Self::new(value, value)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value < self.max
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }
}

/// Snap geometry as handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapTarget {
    Value(f64),
    Repeated {
        offset: f64,
        interval: f64,
        start: f64,
        end: f64,
        range: ApplicableRange,
    },
}

impl SnapTarget {
    pub(crate) fn from_kind(kind: SnapPointKind, range: ApplicableRange) -> Self {
        match kind {
            SnapPointKind::Irregular { value } => Self::Value(value),
            SnapPointKind::Repeated {
                offset,
                interval,
                start,
                end,
            } => Self::Repeated {
                offset,
                interval,
                start,
                end,
                range,
            },
        }
    }

    fn kind_and_range(&self) -> (SnapPointKind, ApplicableRange) {
        match *self {
            Self::Value(value) => (SnapPointKind::Irregular { value }, ApplicableRange::Mandatory),
            Self::Repeated {
                offset,
                interval,
                start,
                end,
                range,
            } => (
                SnapPointKind::Repeated {
                    offset,
                    interval,
                    start,
                    end,
                },
                range,
            ),
        }
    }
}

/// One inertia resting-value constraint.
///
/// When inertia would naturally settle inside `zone` (or `impulse_zone`
/// for impulse-driven motion) the engine settles on the target instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaModifier {
    pub zone: ApplicableZone,
    pub impulse_zone: ApplicableZone,
    pub ignored_value: Option<f64>,
    pub target: SnapTarget,
}

impl InertiaModifier {
    /// Resting value for a natural resting position, or `None` when this
    /// modifier does not apply.
    pub fn resting_value(&self, natural: f64, from_impulse: bool) -> Option<f64> {
        let (zone, ignored) = if from_impulse {
            (self.impulse_zone, self.ignored_value)
        } else {
            (self.zone, None)
        };
        if !zone.contains(natural) {
            return None;
        }
        let (kind, range) = self.target.kind_and_range();
        Some(kind.evaluate(range, natural, ignored))
    }
}

/// Apply the first matching modifier in `modifiers` to `natural`.
pub fn apply_inertia_modifiers(modifiers: &[InertiaModifier], natural: f64, from_impulse: bool) -> f64 {
    modifiers
        .iter()
        .find_map(|m| m.resting_value(natural, from_impulse))
        .unwrap_or(natural)
}
