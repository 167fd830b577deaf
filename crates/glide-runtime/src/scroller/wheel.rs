//! Mouse-wheel input.
//!
//! Each notch becomes additional velocity rather than a fixed jump, so fast
//! wheel spins accumulate into one smooth inertial motion. Notches arriving
//! before the pending wheel operation dispatches fold into it.

use glide_core::geometry::clamp;
use glide_core::snap::SnapAxis;
use glide_core::{
    Axis, CorrelationId, DecayRateOverride, InputKinds, OffsetsChangeWithAdditionalVelocity,
    OperationTrigger, Vec2, ViewChangeRequest, WheelInput, ZoomFactorChangeWithAdditionalVelocity,
};

use super::Scroller;
use crate::config::{inertia_travel, velocity_for_travel};
use crate::controller::{ScrollMode, ZoomMode};
use crate::engine::InteractionEngine;
use crate::event::InteractionState;
use crate::operation::OperationType;

/// Tolerance when comparing an anticipated value with a boundary.
const BOUNDARY_EPSILON: f64 = 0.0001;

impl<E: InteractionEngine> Scroller<E> {
    /// Handle one wheel event. Returns the correlation id of the operation
    /// it created or joined, or `None` when the input was ignored.
    pub fn on_pointer_wheel(&mut self, input: WheelInput) -> Option<CorrelationId> {
        if self.ignored_input_kinds.contains(InputKinds::MOUSE_WHEEL)
            || input.delta == 0
            || !self.has_content
            || !self.config.quirks.view_changes_supported
        {
            return None;
        }
        let units = f64::from(input.delta) / f64::from(self.config.wheel.delta_for_velocity_unit.max(1));
        if input.ctrl && !input.is_horizontal && self.zoom_mode == ZoomMode::Enabled {
            self.wheel_zoom(units, input.position)
        } else {
            self.wheel_scroll(input.axis(), units)
        }
    }

    fn axis_scrollable(&self, axis: Axis) -> bool {
        match self.scroll_mode(axis) {
            ScrollMode::Enabled => true,
            ScrollMode::Disabled => false,
            ScrollMode::Auto => self.view.scrollable().get(axis) > 0.0,
        }
    }

    fn wheel_zoom(&mut self, units: f64, position: Vec2) -> Option<CorrelationId> {
        let wheel = self.config.wheel.clone();
        let per_unit = wheel.zoom_factor_change_per_velocity_unit;
        let start = self.end_of_inertia_zoom_factor();
        let (min, max) = (self.view.min_zoom_factor(), self.view.max_zoom_factor());

        let pending = self
            .queue
            .find_additional_velocity(OperationTrigger::WHEEL, false)
            .and_then(|op| match op.request() {
                ViewChangeRequest::ZoomFactorWithAdditionalVelocity(change) => {
                    Some((op.key(), change.anticipated_change))
                }
                _ => None,
            });
        let pending_change = pending.map_or(0.0, |(_, change)| change);
        let anticipated = start + pending_change;
        if (units > 0.0 && anticipated >= max - BOUNDARY_EPSILON)
            || (units < 0.0 && anticipated <= min + BOUNDARY_EPSILON)
        {
            tracing::trace!(target: "glide.scroller", anticipated, "wheel zoom at boundary");
            return None;
        }
        if pending.is_none() && self.state == InteractionState::Idle {
            self.begin_impulse(SnapAxis::Zoom, self.view.zoom_factor());
        }

        let mut total = units + pending_change / per_unit;
        if pending.is_none() {
            total += wheel.min_zoom_velocity_units.copysign(units);
        }
        total = clamp(total, -wheel.max_zoom_velocity_units, wheel.max_zoom_velocity_units);
        total = clamp(total, (min - start) / per_unit, (max - start) / per_unit);
        let change = total * per_unit;
        let velocity = velocity_for_travel(change, wheel.zoom_decay_rate);

        if let Some((key, _)) = pending
            && let Some(operation) = self.queue.get_mut(key)
            && let ViewChangeRequest::ZoomFactorWithAdditionalVelocity(request) = operation.request_mut()
        {
            request.velocity = velocity;
            request.anticipated_change = change;
            request.center_point = Some(position);
            let correlation_id = operation.correlation_id();
            tracing::debug!(target: "glide.queue", %correlation_id, velocity, "wheel zoom coalesced");
            return Some(correlation_id);
        }
        let request = ViewChangeRequest::ZoomFactorWithAdditionalVelocity(ZoomFactorChangeWithAdditionalVelocity {
            velocity,
            center_point: Some(position),
            inertia_decay_rate: Some(wheel.zoom_decay_rate),
            anticipated_change: change,
        });
        Some(self.issue(
            OperationType::ScaleWithAdditionalVelocity,
            OperationTrigger::WHEEL,
            request,
        ))
    }

    fn wheel_scroll(&mut self, axis: Axis, units: f64) -> Option<CorrelationId> {
        if !self.axis_scrollable(axis) {
            return None;
        }
        let wheel = self.config.wheel.clone();
        // Positive wheel deltas move toward the start of the content.
        let direction = -units.signum();
        let start = self.end_of_inertia_offsets().get(axis);
        let max = self.view.scrollable().get(axis);

        let pending = self
            .queue
            .find_additional_velocity(OperationTrigger::WHEEL, true)
            .and_then(|op| match op.request() {
                ViewChangeRequest::OffsetsWithAdditionalVelocity(change) => Some((
                    op.key(),
                    change.velocity.get(axis),
                    change.anticipated_change.get(axis),
                )),
                _ => None,
            });
        let (pending_velocity, pending_change) = pending.map_or((0.0, 0.0), |(_, v, c)| (v, c));
        let anticipated = start + pending_change;
        if (direction > 0.0 && anticipated >= max - BOUNDARY_EPSILON)
            || (direction < 0.0 && anticipated <= BOUNDARY_EPSILON)
        {
            tracing::trace!(target: "glide.scroller", ?axis, anticipated, "wheel scroll at boundary");
            return None;
        }
        if pending.is_none() && self.state == InteractionState::Idle {
            self.begin_impulse(SnapAxis::from(axis), self.view.offsets().get(axis));
        }

        let mut velocity = pending_velocity - units * wheel.scroll_velocity_per_unit;
        if pending.is_none() {
            velocity += wheel.min_scroll_velocity.copysign(direction);
        }
        velocity = clamp(velocity, -wheel.max_scroll_velocity, wheel.max_scroll_velocity);
        let change = inertia_travel(velocity, wheel.scroll_decay_rate);

        if let Some((key, _, _)) = pending
            && let Some(operation) = self.queue.get_mut(key)
            && let ViewChangeRequest::OffsetsWithAdditionalVelocity(request) = operation.request_mut()
        {
            request.velocity.set(axis, velocity);
            request.anticipated_change.set(axis, change);
            request.inertia_decay_rate.set(axis, Some(wheel.scroll_decay_rate));
            let correlation_id = operation.correlation_id();
            tracing::debug!(target: "glide.queue", %correlation_id, ?axis, velocity, "wheel scroll coalesced");
            return Some(correlation_id);
        }
        let mut decay = DecayRateOverride::NONE;
        decay.set(axis, Some(wheel.scroll_decay_rate));
        let request = ViewChangeRequest::OffsetsWithAdditionalVelocity(OffsetsChangeWithAdditionalVelocity {
            velocity: Vec2::on_axis(axis, velocity),
            inertia_decay_rate: decay,
            anticipated_change: Vec2::on_axis(axis, change),
        });
        Some(self.issue(
            OperationType::MoveWithAdditionalVelocity,
            OperationTrigger::WHEEL,
            request,
        ))
    }
}
