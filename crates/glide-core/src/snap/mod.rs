#![forbid(unsafe_code)]

//! Snap points: declaration, consolidation, and evaluation.
//!
//! Each axis (horizontal offset, vertical offset, zoom factor) owns one
//! [`SnapPointSet`]. The runtime reconsolidates a set whenever its
//! declarations change, or when the viewport changes and the set contains
//! center- or far-aligned points, then exports it to the engine as
//! [`InertiaModifier`]s.

mod consolidator;
mod point;
mod zone;

pub use consolidator::{SnapPointSet, SnapPointWrapper};
pub use point::{
    ApplicableRange, SNAP_EQUALITY_EPSILON, SnapPoint, SnapPointKind, SnapPointsAlignment,
};
pub use zone::{ApplicableZone, InertiaModifier, SnapTarget, apply_inertia_modifiers};

use crate::geometry::Axis;

/// Axis a snap-point set applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapAxis {
    Horizontal,
    Vertical,
    Zoom,
}

impl SnapAxis {
    /// All three axes.
    pub const ALL: [SnapAxis; 3] = [SnapAxis::Horizontal, SnapAxis::Vertical, SnapAxis::Zoom];

    /// Stable index, for per-axis storage.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
            Self::Zoom => 2,
        }
    }
}

impl From<Axis> for SnapAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::Horizontal,
            Axis::Vertical => Self::Vertical,
        }
    }
}
