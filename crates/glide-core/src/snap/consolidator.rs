#![forbid(unsafe_code)]

//! Snap-point consolidation.
//!
//! Turns an unordered list of declared [`SnapPoint`]s into a
//! [`SnapPointSet`]: sorted by position, with coincident irregular points
//! combined, and with an applicable zone computed for every entry.
//!
//! # Algorithm
//!
//! 1. Each point is shifted by its alignment adjustment for the current
//!    viewport, then inserted at its lower bound in position order. A point
//!    positionally equal to its neighbor is combined into it (the wider
//!    range wins, mandatory dominates); repeated points cannot combine.
//! 2. A full pass gives every wrapper the territory between the midpoints
//!    with its neighbors, clipped to its own range when it is optional.
//! 3. A second pass computes impulse zones, where a wrapper flagged with an
//!    ignored value claims nothing and its neighbors claim up to it.
//!
//! # Invariants
//!
//! 1. Zones are sorted, contiguous where mandatory points meet, and never
//!    overlap.
//! 2. Consolidating the same declarations twice yields identical zones.
//! 3. At most one wrapper carries an ignored value.

use crate::error::SnapPointError;

use super::point::{ApplicableRange, SNAP_EQUALITY_EPSILON, SnapPoint, SnapPointKind};
use super::zone::{ApplicableZone, InertiaModifier, SnapTarget};

/// One consolidated snap point.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPointWrapper {
    declared: SnapPoint,
    actual: SnapPointKind,
    range: ApplicableRange,
    combination_count: usize,
    zone: ApplicableZone,
    impulse_zone: ApplicableZone,
    ignored_value: Option<f64>,
}

impl SnapPointWrapper {
    fn new(point: SnapPoint, viewport: f64) -> Self {
        let adjustment = point.alignment().adjustment(viewport);
        Self {
            declared: point,
            actual: point.kind().shifted(adjustment),
            range: point.range(),
            combination_count: 1,
            zone: ApplicableZone::UNBOUNDED,
            impulse_zone: ApplicableZone::UNBOUNDED,
            ignored_value: None,
        }
    }

    /// First declaration that produced this wrapper.
    #[inline]
    pub fn declared(&self) -> &SnapPoint {
        &self.declared
    }

    /// Geometry after alignment adjustment.
    #[inline]
    pub fn actual(&self) -> SnapPointKind {
        self.actual
    }

    /// Effective range after combination.
    #[inline]
    pub fn range(&self) -> ApplicableRange {
        self.range
    }

    /// How many declarations were combined into this wrapper.
    #[inline]
    pub fn combination_count(&self) -> usize {
        self.combination_count
    }

    #[inline]
    pub fn actual_applicable_zone(&self) -> ApplicableZone {
        self.zone
    }

    #[inline]
    pub fn actual_impulse_applicable_zone(&self) -> ApplicableZone {
        self.impulse_zone
    }

    #[inline]
    pub fn ignored_value(&self) -> Option<f64> {
        self.ignored_value
    }

    /// Resting value for `value` inside the normal zone.
    #[inline]
    pub fn evaluate(&self, value: f64) -> f64 {
        self.actual.evaluate(self.range, value, None)
    }

    /// Resting value for `value` inside the impulse zone.
    #[inline]
    pub fn evaluate_impulse(&self, value: f64) -> f64 {
        self.actual.evaluate(self.range, value, self.ignored_value)
    }

    /// Whether `value` is one of this wrapper's resting values.
    pub fn snaps_at(&self, value: f64) -> bool {
        self.zone.contains(value) && (self.evaluate(value) - value).abs() < SNAP_EQUALITY_EPSILON
    }

    fn combine(&mut self, other: &Self) -> Result<(), SnapPointError> {
        if let SnapPointKind::Repeated { start, end, .. } = self.actual {
            return Err(SnapPointError::DuplicateRepetition { start, end });
        }
        self.range = self.range.combine(other.range);
        self.combination_count += other.combination_count;
        Ok(())
    }

    fn influence(&self, edge: f64) -> Result<f64, SnapPointError> {
        self.actual.influence(self.range, edge)
    }

    fn impulse_influence(&self, edge: f64) -> Result<f64, SnapPointError> {
        match self.actual {
            SnapPointKind::Irregular { value } if self.ignored_value.is_some() => Ok(value),
            _ => self.influence(edge),
        }
    }

    fn determine_zone(
        &self,
        prev: Option<&Self>,
        next: Option<&Self>,
        impulse: bool,
    ) -> Result<ApplicableZone, SnapPointError> {
        let influence = |neighbor: &Self, edge: f64| {
            if impulse {
                neighbor.impulse_influence(edge)
            } else {
                neighbor.influence(edge)
            }
        };
        match self.actual {
            SnapPointKind::Irregular { value } => {
                if impulse && self.ignored_value.is_some() {
                    return Ok(ApplicableZone::empty_at(value));
                }
                let reach = self.range.distance();
                let min = match prev {
                    None => value - reach,
                    Some(prev) => influence(prev, value)?.max(value - reach),
                };
                let max = match next {
                    None => value + reach,
                    Some(next) => influence(next, value)?.min(value + reach),
                };
                Ok(ApplicableZone::new(min, max))
            }
            SnapPointKind::Repeated { start, end, .. } => {
                if let Some(prev) = prev {
                    influence(prev, start)?;
                }
                if let Some(next) = next {
                    influence(next, end)?;
                }
                Ok(ApplicableZone::new(start, end))
            }
        }
    }
}

/// Consolidated snap points for one axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapPointSet {
    wrappers: Vec<SnapPointWrapper>,
    viewport: f64,
}

impl SnapPointSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consolidate `points` for a viewport of length `viewport` along the
    /// axis. Zoom axes pass `0.0`.
    pub fn consolidate(points: &[SnapPoint], viewport: f64) -> Result<Self, SnapPointError> {
        let mut set = Self {
            wrappers: Vec::with_capacity(points.len()),
            viewport,
        };
        for point in points {
            point.validate()?;
            set.insert(SnapPointWrapper::new(*point, viewport))?;
        }
        set.fix_zones()?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "glide.snap",
            declared = points.len(),
            wrappers = set.wrappers.len(),
            viewport,
            "snap points consolidated"
        );
        Ok(set)
    }

    fn insert(&mut self, wrapper: SnapPointWrapper) -> Result<(), SnapPointError> {
        let key = wrapper.actual.sort_key();
        let lower_bound = self.wrappers.partition_point(|w| {
            w.actual.sort_key() < key && !w.actual.same_position(&wrapper.actual)
        });
        for index in [lower_bound.checked_sub(1), Some(lower_bound)].into_iter().flatten() {
            if let Some(existing) = self.wrappers.get_mut(index)
                && existing.actual.same_position(&wrapper.actual)
            {
                return existing.combine(&wrapper);
            }
        }
        self.wrappers.insert(lower_bound, wrapper);
        Ok(())
    }

    fn compute_zones(&self, impulse: bool) -> Result<Vec<ApplicableZone>, SnapPointError> {
        (0..self.wrappers.len())
            .map(|i| {
                let prev = i.checked_sub(1).and_then(|j| self.wrappers.get(j));
                let next = self.wrappers.get(i + 1);
                self.wrappers[i].determine_zone(prev, next, impulse)
            })
            .collect()
    }

    fn fix_zones(&mut self) -> Result<(), SnapPointError> {
        let zones = self.compute_zones(false)?;
        for (wrapper, zone) in self.wrappers.iter_mut().zip(zones) {
            wrapper.zone = zone;
        }
        self.fix_impulse_zones()
    }

    fn fix_impulse_zones(&mut self) -> Result<(), SnapPointError> {
        let zones = self.compute_zones(true)?;
        for (wrapper, zone) in self.wrappers.iter_mut().zip(zones) {
            wrapper.impulse_zone = zone;
        }
        Ok(())
    }

    #[inline]
    pub fn wrappers(&self) -> &[SnapPointWrapper] {
        &self.wrappers
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    /// Viewport length the alignment adjustments were computed for.
    #[inline]
    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    /// Total number of resting values across all wrappers, saturating at
    /// `usize::MAX`.
    pub fn snap_count(&self) -> usize {
        self.wrappers
            .iter()
            .fold(0usize, |total, w| total.saturating_add(w.actual.snap_count()))
    }

    /// Whether any declaration is shifted by the viewport length.
    pub fn is_viewport_sensitive(&self) -> bool {
        self.wrappers
            .iter()
            .any(|w| w.declared.alignment().is_viewport_sensitive())
    }

    /// Value after snapping: the first wrapper whose zone contains `value`
    /// decides, otherwise `value` is returned unchanged.
    pub fn value_after_snap_points(&self, value: f64) -> f64 {
        self.wrappers
            .iter()
            .find(|w| w.zone.contains(value))
            .map_or(value, |w| w.evaluate(value))
    }

    /// Flag the wrapper resting at `resting_value` as ignored for impulse
    /// motion, or clear every flag when `resting_value` is `None`.
    ///
    /// Nothing is flagged when the axis has a single resting value. Returns
    /// whether any flag changed; impulse zones are recomputed when one did.
    pub fn update_ignored_value(&mut self, resting_value: Option<f64>) -> Result<bool, SnapPointError> {
        let target = match resting_value {
            Some(value) if self.snap_count() > 1 => self
                .wrappers
                .iter()
                .position(|w| w.snaps_at(value))
                .map(|index| (index, self.wrappers[index].evaluate(value))),
            _ => None,
        };
        let mut changed = false;
        for (index, wrapper) in self.wrappers.iter_mut().enumerate() {
            let ignored = target.filter(|(i, _)| *i == index).map(|(_, v)| v);
            if wrapper.ignored_value != ignored {
                wrapper.ignored_value = ignored;
                changed = true;
            }
        }
        if changed {
            self.fix_impulse_zones()?;
            #[cfg(feature = "tracing")]
            tracing::trace!(
                target: "glide.snap",
                ignored = ?target.map(|(_, v)| v),
                "snap point ignored value updated"
            );
        }
        Ok(changed)
    }

    /// Resting-value constraints for the engine, in position order.
    pub fn inertia_modifiers(&self) -> Vec<InertiaModifier> {
        self.wrappers
            .iter()
            .map(|w| InertiaModifier {
                zone: w.zone,
                impulse_zone: w.impulse_zone,
                ignored_value: w.ignored_value,
                target: SnapTarget::from_kind(w.actual, w.range),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::point::SnapPointsAlignment;

    fn zones(set: &SnapPointSet) -> Vec<(f64, f64)> {
        set.wrappers()
            .iter()
            .map(|w| {
                let z = w.actual_applicable_zone();
                (z.min, z.max)
            })
            .collect()
    }

    #[test]
    fn mandatory_points_split_at_midpoints() {
        let set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(200.0), SnapPoint::irregular(0.0), SnapPoint::irregular(100.0)],
            0.0,
        )
        .expect("valid points");
        assert_eq!(
            zones(&set),
            vec![(f64::NEG_INFINITY, 50.0), (50.0, 150.0), (150.0, f64::INFINITY)]
        );
    }

    #[test]
    fn optional_points_stop_at_their_range() {
        let set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(0.0).optional(10.0), SnapPoint::irregular(100.0).optional(80.0)],
            0.0,
        )
        .expect("valid points");
        assert_eq!(zones(&set), vec![(-10.0, 10.0), (20.0, 180.0)]);
    }

    #[test]
    fn mandatory_claims_up_to_optional_neighbor_range() {
        let set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(0.0), SnapPoint::irregular(100.0).optional(10.0)],
            0.0,
        )
        .expect("valid points");
        assert_eq!(zones(&set), vec![(f64::NEG_INFINITY, 90.0), (90.0, 110.0)]);
    }

    #[test]
    fn coincident_points_combine() {
        let set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(50.0).optional(10.0), SnapPoint::irregular(50.0).optional(20.0)],
            0.0,
        )
        .expect("valid points");
        assert_eq!(set.len(), 1);
        let wrapper = &set.wrappers()[0];
        assert_eq!(wrapper.combination_count(), 2);
        assert_eq!(wrapper.range(), ApplicableRange::Optional(20.0));
        assert_eq!(zones(&set), vec![(30.0, 70.0)]);
    }

    #[test]
    fn repeated_points_bound_their_neighbors() {
        let repeated = SnapPoint::repeated(100.0, 50.0, 100.0, 300.0).expect("valid");
        let set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(0.0), repeated, SnapPoint::irregular(400.0)],
            0.0,
        )
        .expect("valid points");
        assert_eq!(
            zones(&set),
            vec![(f64::NEG_INFINITY, 100.0), (100.0, 300.0), (300.0, f64::INFINITY)]
        );
        assert_eq!(set.value_after_snap_points(170.0), 150.0);
        assert_eq!(set.snap_count(), 7);
    }

    #[test]
    fn overlapping_repeated_points_fail() {
        let a = SnapPoint::repeated(0.0, 10.0, 0.0, 100.0).expect("valid");
        let b = SnapPoint::repeated(50.0, 10.0, 50.0, 150.0).expect("valid");
        assert!(matches!(
            SnapPointSet::consolidate(&[a, b], 0.0),
            Err(SnapPointError::Overlap { .. })
        ));
        assert!(matches!(
            SnapPointSet::consolidate(&[a, SnapPoint::irregular(40.0)], 0.0),
            Err(SnapPointError::Overlap { .. })
        ));
        assert!(matches!(
            SnapPointSet::consolidate(&[a, a], 0.0),
            Err(SnapPointError::DuplicateRepetition { .. })
        ));
    }

    #[test]
    fn alignment_uses_viewport() {
        let set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(500.0).aligned(SnapPointsAlignment::Center)],
            300.0,
        )
        .expect("valid points");
        assert_eq!(set.value_after_snap_points(0.0), 350.0);
        assert!(set.is_viewport_sensitive());
    }

    #[test]
    fn ignored_value_empties_resting_zone_for_impulses() {
        let mut set = SnapPointSet::consolidate(
            &[SnapPoint::irregular(0.0), SnapPoint::irregular(100.0), SnapPoint::irregular(200.0)],
            0.0,
        )
        .expect("valid points");
        assert!(set.update_ignored_value(Some(100.0)).expect("consistent"));
        let w = set.wrappers();
        assert_eq!(w[1].ignored_value(), Some(100.0));
        assert!(w[1].actual_impulse_applicable_zone().is_empty());
        assert_eq!(w[0].actual_impulse_applicable_zone().max, 100.0);
        assert_eq!(w[2].actual_impulse_applicable_zone().min, 100.0);
        // Normal zones are untouched.
        assert_eq!(w[1].actual_applicable_zone(), ApplicableZone::new(50.0, 150.0));

        assert!(set.update_ignored_value(None).expect("consistent"));
        assert!(set.wrappers().iter().all(|w| w.ignored_value().is_none()));
        assert!(!set.update_ignored_value(None).expect("consistent"));
    }

    #[test]
    fn single_resting_value_is_never_ignored() {
        let mut set =
            SnapPointSet::consolidate(&[SnapPoint::irregular(100.0)], 0.0).expect("valid points");
        assert!(!set.update_ignored_value(Some(100.0)).expect("consistent"));
        assert_eq!(set.wrappers()[0].ignored_value(), None);
    }

    #[test]
    fn dense_repetitions_accept_an_ignored_value() {
        let dense = SnapPoint::repeated(0.0, 1e-3, 0.0, 1e17).expect("valid");
        let mut set = SnapPointSet::consolidate(&[dense, SnapPoint::irregular(2e17)], 0.0)
            .expect("valid points");
        assert_eq!(set.snap_count(), usize::MAX);
        assert!(set.update_ignored_value(Some(0.0)).is_ok());
        assert!(set.update_ignored_value(None).is_ok());
    }

    #[test]
    fn values_outside_every_zone_pass_through() {
        let set = SnapPointSet::consolidate(&[SnapPoint::irregular(100.0).optional(5.0)], 0.0)
            .expect("valid points");
        assert_eq!(set.value_after_snap_points(50.0), 50.0);
        assert_eq!(set.value_after_snap_points(103.0), 100.0);
    }
}
