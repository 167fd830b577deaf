#![forbid(unsafe_code)]

//! Per-axis snap-point declarations and their consolidated sets.
//!
//! Each [`SnapAxis`] keeps the points the host declared and the
//! [`SnapPointSet`] consolidated from them. Consolidation reruns when the
//! declaration changes, or when the viewport changes and an aligned point
//! depends on its length. Sets that changed since the last export are
//! pushed to the engine as inertia modifiers by [`SnapPointsState::export`].

use glide_core::snap::{SnapAxis, SnapPoint, SnapPointSet};
use glide_core::{Size, SnapPointError};

use crate::engine::InteractionEngine;

#[derive(Debug, Clone, Default)]
struct AxisSnapPoints {
    declared: Vec<SnapPoint>,
    set: SnapPointSet,
    from_impulse: bool,
    dirty: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SnapPointsState {
    axes: [AxisSnapPoints; 3],
}

/// Viewport length aligned points on `axis` are shifted by.
fn viewport_length(axis: SnapAxis, viewport: Size) -> f64 {
    match axis {
        SnapAxis::Horizontal => viewport.width,
        SnapAxis::Vertical => viewport.height,
        SnapAxis::Zoom => 0.0,
    }
}

impl SnapPointsState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declared(&self, axis: SnapAxis) -> &[SnapPoint] {
        &self.axes[axis.index()].declared
    }

    pub fn set(&self, axis: SnapAxis) -> &SnapPointSet {
        &self.axes[axis.index()].set
    }

    /// Whether the next motion on `axis` starts from an impulse.
    pub fn is_from_impulse(&self, axis: SnapAxis) -> bool {
        self.axes[axis.index()].from_impulse
    }

    /// Replace the declaration for `axis`. The previous set stays in place
    /// when the new declaration is invalid.
    pub fn set_points(
        &mut self,
        axis: SnapAxis,
        points: Vec<SnapPoint>,
        viewport: Size,
    ) -> Result<(), SnapPointError> {
        let set = SnapPointSet::consolidate(&points, viewport_length(axis, viewport))?;
        let state = &mut self.axes[axis.index()];
        state.declared = points;
        state.set = set;
        state.dirty = true;
        Ok(())
    }

    /// Reconsolidate viewport-sensitive sets whose viewport length changed.
    ///
    /// Every axis is visited; an axis that fails keeps its previous set and
    /// the first failure is returned.
    pub fn on_viewport_changed(&mut self, viewport: Size) -> Result<(), SnapPointError> {
        let mut first_error = None;
        for axis in SnapAxis::ALL {
            let length = viewport_length(axis, viewport);
            let state = &mut self.axes[axis.index()];
            if !state.set.is_viewport_sensitive() || state.set.viewport() == length {
                continue;
            }
            match SnapPointSet::consolidate(&state.declared, length) {
                Ok(set) => {
                    state.set = set;
                    state.dirty = true;
                }
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// `value` after the snap points of `axis`.
    pub fn value_after_snap_points(&self, axis: SnapAxis, value: f64) -> f64 {
        self.axes[axis.index()].set.value_after_snap_points(value)
    }

    /// Prepare `axis` for motion started by an impulse while resting at
    /// `resting_value`: the point at rest is ignored so inertia can leave it.
    pub fn begin_impulse(&mut self, axis: SnapAxis, resting_value: f64) -> Result<(), SnapPointError> {
        let state = &mut self.axes[axis.index()];
        if state.set.update_ignored_value(Some(resting_value))? || !state.from_impulse {
            state.dirty = true;
        }
        state.from_impulse = true;
        Ok(())
    }

    /// Clear impulse state on every axis, once motion settles.
    pub fn end_impulse(&mut self) -> Result<(), SnapPointError> {
        for state in &mut self.axes {
            if state.set.update_ignored_value(None)? || state.from_impulse {
                state.dirty = true;
            }
            state.from_impulse = false;
        }
        Ok(())
    }

    /// Push every changed set to the engine.
    pub fn export(&mut self, engine: &mut dyn InteractionEngine) {
        for axis in SnapAxis::ALL {
            let state = &mut self.axes[axis.index()];
            if !state.dirty {
                continue;
            }
            state.dirty = false;
            let modifiers = state.set.inertia_modifiers();
            tracing::trace!(
                target: "glide.snap",
                ?axis,
                modifiers = modifiers.len(),
                from_impulse = state.from_impulse,
                "inertia modifiers exported"
            );
            engine.set_inertia_modifiers(axis, &modifiers, state.from_impulse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::SnapPointsAlignment;

    #[test]
    fn invalid_declaration_keeps_previous_set() {
        let mut state = SnapPointsState::new();
        let viewport = Size::new(100.0, 100.0);
        state
            .set_points(SnapAxis::Vertical, vec![SnapPoint::irregular(50.0)], viewport)
            .unwrap();
        let err = state.set_points(
            SnapAxis::Vertical,
            vec![SnapPoint::irregular(f64::NAN)],
            viewport,
        );
        assert!(err.is_err());
        assert_eq!(state.declared(SnapAxis::Vertical).len(), 1);
        assert_eq!(state.value_after_snap_points(SnapAxis::Vertical, 10.0), 50.0);
    }

    #[test]
    fn viewport_change_shifts_aligned_points() {
        let mut state = SnapPointsState::new();
        state
            .set_points(
                SnapAxis::Horizontal,
                vec![SnapPoint::irregular(500.0).aligned(SnapPointsAlignment::Center)],
                Size::new(200.0, 100.0),
            )
            .unwrap();
        assert_eq!(state.value_after_snap_points(SnapAxis::Horizontal, 0.0), 400.0);
        state.on_viewport_changed(Size::new(400.0, 100.0)).unwrap();
        assert_eq!(state.value_after_snap_points(SnapAxis::Horizontal, 0.0), 300.0);
    }

    #[test]
    fn failing_axis_does_not_block_later_axes() {
        let mut state = SnapPointsState::new();
        let viewport = Size::new(200.0, 200.0);
        state
            .set_points(
                SnapAxis::Horizontal,
                vec![
                    SnapPoint::repeated(0.0, 10.0, 0.0, 100.0).unwrap(),
                    SnapPoint::irregular(300.0).aligned(SnapPointsAlignment::Center),
                ],
                viewport,
            )
            .unwrap();
        state
            .set_points(
                SnapAxis::Vertical,
                vec![SnapPoint::irregular(500.0).aligned(SnapPointsAlignment::Center)],
                viewport,
            )
            .unwrap();

        // The horizontal center point lands inside the repetition span.
        let result = state.on_viewport_changed(Size::new(500.0, 500.0));
        assert!(matches!(result, Err(SnapPointError::Overlap { .. })));
        assert_eq!(state.set(SnapAxis::Horizontal).viewport(), 200.0);
        assert_eq!(state.set(SnapAxis::Vertical).viewport(), 500.0);
        assert_eq!(state.value_after_snap_points(SnapAxis::Vertical, 0.0), 250.0);
    }

    #[test]
    fn impulse_flags_round_trip() {
        let mut state = SnapPointsState::new();
        let viewport = Size::new(100.0, 100.0);
        state
            .set_points(
                SnapAxis::Vertical,
                vec![SnapPoint::irregular(0.0), SnapPoint::irregular(100.0)],
                viewport,
            )
            .unwrap();
        state.begin_impulse(SnapAxis::Vertical, 0.0).unwrap();
        assert!(state.is_from_impulse(SnapAxis::Vertical));
        assert_eq!(state.set(SnapAxis::Vertical).wrappers()[0].ignored_value(), Some(0.0));
        state.end_impulse().unwrap();
        assert!(!state.is_from_impulse(SnapAxis::Vertical));
        assert_eq!(state.set(SnapAxis::Vertical).wrappers()[0].ignored_value(), None);
    }
}
