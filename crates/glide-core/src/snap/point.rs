#![forbid(unsafe_code)]

//! Declared snap points and their evaluation rules.

use crate::error::SnapPointError;

/// Two snap-point coordinates closer than this are the same point.
pub const SNAP_EQUALITY_EPSILON: f64 = 0.00001;

/// How far from its value a snap point attracts a resting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplicableRange {
    /// Claims all territory up to the midpoint with each neighbor.
    Mandatory,
    /// Claims territory only within this distance of its value.
    Optional(f64),
}

impl ApplicableRange {
    /// Range as a distance, infinite for mandatory points.
    #[inline]
    pub const fn distance(self) -> f64 {
        match self {
            Self::Mandatory => f64::INFINITY,
            Self::Optional(range) => range,
        }
    }

    /// Range of two combined points: mandatory dominates, otherwise the
    /// wider range wins.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Optional(a), Self::Optional(b)) => Self::Optional(a.max(b)),
            _ => Self::Mandatory,
        }
    }
}

/// Which edge of the viewport lines up with a scroll snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnapPointsAlignment {
    #[default]
    Near,
    Center,
    Far,
}

impl SnapPointsAlignment {
    /// Offset shift applied to the declared value for a viewport of
    /// `viewport` length.
    #[inline]
    pub fn adjustment(self, viewport: f64) -> f64 {
        match self {
            Self::Near => 0.0,
            Self::Center => -viewport / 2.0,
            Self::Far => -viewport,
        }
    }

    /// Whether a viewport resize moves this point.
    #[inline]
    pub const fn is_viewport_sensitive(self) -> bool {
        !matches!(self, Self::Near)
    }
}

/// Geometry of a snap point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapPointKind {
    /// A single resting value.
    Irregular { value: f64 },
    /// Resting values `offset + k * interval` within `[start, end]`.
    Repeated {
        offset: f64,
        interval: f64,
        start: f64,
        end: f64,
    },
}

impl SnapPointKind {
    /// Same geometry moved by `delta`.
    #[must_use]
    pub fn shifted(self, delta: f64) -> Self {
        match self {
            Self::Irregular { value } => Self::Irregular {
                value: value + delta,
            },
            Self::Repeated {
                offset,
                interval,
                start,
                end,
            } => Self::Repeated {
                offset: offset + delta,
                interval,
                start: start + delta,
                end: end + delta,
            },
        }
    }

    /// Ordering key: `(value, value, 0)` for irregular points and
    /// `(start, end, 1)` for repeated ones.
    #[inline]
    pub fn sort_key(&self) -> (f64, f64, u8) {
        match *self {
            Self::Irregular { value } => (value, value, 0),
            Self::Repeated { start, end, .. } => (start, end, 1),
        }
    }

    /// Positional identity, within [`SNAP_EQUALITY_EPSILON`].
    pub fn same_position(&self, other: &Self) -> bool {
        let (a1, a2, a3) = self.sort_key();
        let (b1, b2, b3) = other.sort_key();
        (a1 - b1).abs() < SNAP_EQUALITY_EPSILON && (a2 - b2).abs() < SNAP_EQUALITY_EPSILON && a3 == b3
    }

    /// Number of resting values described, saturating at `usize::MAX`.
    pub fn snap_count(&self) -> usize {
        match *self {
            Self::Irregular { .. } => 1,
            Self::Repeated {
                offset,
                interval,
                start,
                end,
            } => {
                let below = ((offset - start) / interval).floor();
                let above = ((end - offset) / interval).floor();
                ((below + above) as usize).saturating_add(1)
            }
        }
    }

    /// Edge of the territory this point claims toward `edge`, the value of
    /// a neighboring point.
    ///
    /// Fails when `edge` lies strictly inside a repeated point's span, which
    /// means two declarations overlap.
    pub fn influence(&self, range: ApplicableRange, edge: f64) -> Result<f64, SnapPointError> {
        match *self {
            Self::Irregular { value } => {
                let midpoint = (value + edge) / 2.0;
                Ok(match range {
                    ApplicableRange::Mandatory => midpoint,
                    ApplicableRange::Optional(range) if value <= edge => (value + range).min(midpoint),
                    ApplicableRange::Optional(range) => (value - range).max(midpoint),
                })
            }
            Self::Repeated { start, end, .. } => {
                if edge <= start {
                    Ok(start)
                } else if edge >= end {
                    Ok(end)
                } else {
                    Err(SnapPointError::Overlap {
                        value: edge,
                        start,
                        end,
                    })
                }
            }
        }
    }

    /// Resting value for `value`, assuming `value` lies in this point's
    /// zone. `ignored` names a repetition that must be skipped.
    pub fn evaluate(&self, range: ApplicableRange, value: f64, ignored: Option<f64>) -> f64 {
        match *self {
            Self::Irregular { value: snap } => {
                if ignored.is_some_and(|iv| (iv - snap).abs() < SNAP_EQUALITY_EPSILON) {
                    value
                } else {
                    snap
                }
            }
            Self::Repeated {
                offset,
                interval,
                start,
                end,
            } => {
                let first = offset - ((offset - start) / interval).floor() * interval;
                let last = offset + ((end - offset) / interval).floor() * interval;
                let mut candidate = (offset + ((value - offset) / interval).round() * interval)
                    .clamp(first, last);
                if let Some(iv) = ignored
                    && (candidate - iv).abs() < SNAP_EQUALITY_EPSILON
                {
                    let step = if value > iv {
                        interval
                    } else if value < iv {
                        -interval
                    } else {
                        return value;
                    };
                    candidate = (candidate + step).clamp(first, last);
                    if (candidate - iv).abs() < SNAP_EQUALITY_EPSILON {
                        return value;
                    }
                }
                if (candidate - value).abs() <= range.distance() {
                    candidate
                } else {
                    value
                }
            }
        }
    }
}

/// A user-declared snap point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    kind: SnapPointKind,
    range: ApplicableRange,
    alignment: SnapPointsAlignment,
}

impl SnapPoint {
    /// Mandatory, near-aligned point at `value`.
    #[must_use]
    pub const fn irregular(value: f64) -> Self {
        Self {
            kind: SnapPointKind::Irregular { value },
            range: ApplicableRange::Mandatory,
            alignment: SnapPointsAlignment::Near,
        }
    }

    /// Mandatory, near-aligned repeated points.
    ///
    /// Requires `end > start`, `start <= offset <= end`, and `interval > 0`.
    pub fn repeated(offset: f64, interval: f64, start: f64, end: f64) -> Result<Self, SnapPointError> {
        for v in [offset, interval, start, end] {
            if !v.is_finite() {
                return Err(SnapPointError::NonFinite { value: v });
            }
        }
        if end <= start {
            return Err(SnapPointError::EmptyRepetition { start, end });
        }
        if offset < start || offset > end {
            return Err(SnapPointError::OffsetOutOfRange { offset, start, end });
        }
        if interval <= 0.0 {
            return Err(SnapPointError::NonPositiveInterval { interval });
        }
        Ok(Self {
            kind: SnapPointKind::Repeated {
                offset,
                interval,
                start,
                end,
            },
            range: ApplicableRange::Mandatory,
            alignment: SnapPointsAlignment::Near,
        })
    }

    /// Copy with an optional applicable range.
    #[must_use]
    pub const fn optional(mut self, range: f64) -> Self {
        self.range = ApplicableRange::Optional(range);
        self
    }

    /// Copy with a viewport alignment. Only meaningful on scroll axes.
    #[must_use]
    pub const fn aligned(mut self, alignment: SnapPointsAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[inline]
    pub const fn kind(&self) -> SnapPointKind {
        self.kind
    }

    #[inline]
    pub const fn range(&self) -> ApplicableRange {
        self.range
    }

    #[inline]
    pub const fn alignment(&self) -> SnapPointsAlignment {
        self.alignment
    }

    /// Reject non-finite values and non-positive ranges.
    pub fn validate(&self) -> Result<(), SnapPointError> {
        if let SnapPointKind::Irregular { value } = self.kind
            && !value.is_finite()
        {
            return Err(SnapPointError::NonFinite { value });
        }
        if let ApplicableRange::Optional(range) = self.range
            && (range.is_nan() || range <= 0.0)
        {
            return Err(SnapPointError::NonPositiveRange { range });
        }
        Ok(())
    }
}
