//! Requests raised by proxy scroll controllers.
//!
//! Both controllers feed the same queue. A request folds into a pending
//! operation raised by either controller when the command and options
//! match and its countdown has not started, so two scrollbars moved in the
//! same frame produce a single engine command and a single correlation id.

use glide_core::{
    Axis, CorrelationId, DecayRateOverride, OffsetsChangeWithAdditionalVelocity, OperationTrigger,
    Vec2, ViewChangeError, ViewChangeOptions, ViewChangeRequest, ViewKind,
};

use super::Scroller;
use super::requests::{require_finite, require_unit};
use crate::config::inertia_travel;
use crate::controller::ScrollControllerRequest;
use crate::engine::InteractionEngine;
use crate::operation::OperationType;

impl<E: InteractionEngine> Scroller<E> {
    /// Route a request raised by the controller driving `axis`.
    pub fn on_scroll_controller_request(
        &mut self,
        axis: Axis,
        request: ScrollControllerRequest,
    ) -> Result<Option<CorrelationId>, ViewChangeError> {
        match request {
            ScrollControllerRequest::ScrollTo { offset, options } => {
                require_finite("offset", offset)?;
                self.proxy_offsets(axis, offset, ViewKind::Absolute, options)
            }
            ScrollControllerRequest::ScrollBy { delta, options } => {
                require_finite("offset_delta", delta)?;
                self.proxy_offsets(axis, delta, ViewKind::RelativeToCurrent, options)
            }
            ScrollControllerRequest::ScrollFrom {
                velocity,
                inertia_decay_rate,
            } => {
                require_finite("offset_velocity", velocity)?;
                if let Some(rate) = inertia_decay_rate {
                    require_unit("inertia_decay_rate", rate)?;
                }
                self.proxy_velocity(axis, velocity, inertia_decay_rate)
            }
            ScrollControllerRequest::Interaction { pointer_id } => {
                let redirected = self.engine.try_redirect_for_manipulation(pointer_id);
                tracing::debug!(target: "glide.scroller", ?axis, pointer_id, redirected, "proxy interaction");
                Ok(None)
            }
        }
    }

    fn proxy_offsets(
        &mut self,
        axis: Axis,
        value: f64,
        view_kind: ViewKind,
        options: ViewChangeOptions,
    ) -> Result<Option<CorrelationId>, ViewChangeError> {
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        let trigger = OperationTrigger::proxy(axis);
        let operation_type = self.offsets_operation_type(view_kind, options);
        if let Some(operation) =
            self.queue
                .find_coalescable(OperationTrigger::PROXY, operation_type, view_kind, options)
            && let ViewChangeRequest::Offsets(change) = operation.request_mut()
        {
            match view_kind {
                ViewKind::Absolute => change.offsets.set(axis, value),
                ViewKind::RelativeToCurrent => {
                    change.offsets.set(axis, change.offsets.get(axis) + value);
                }
            }
            operation.add_trigger(trigger);
            let correlation_id = operation.correlation_id();
            tracing::debug!(target: "glide.queue", %correlation_id, ?axis, "proxy request coalesced");
            return Ok(Some(correlation_id));
        }
        let offsets = match view_kind {
            ViewKind::Absolute => self.view.offsets().with(axis, value),
            ViewKind::RelativeToCurrent => Vec2::on_axis(axis, value),
        };
        self.request_offsets(offsets, view_kind, options, trigger)
    }

    fn proxy_velocity(
        &mut self,
        axis: Axis,
        velocity: f64,
        inertia_decay_rate: Option<f64>,
    ) -> Result<Option<CorrelationId>, ViewChangeError> {
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        let trigger = OperationTrigger::proxy(axis);
        let default_rate = self.config.inertia.default_decay_rate;
        let travel = inertia_travel(velocity, inertia_decay_rate.unwrap_or(default_rate));
        if let Some(operation) = self.queue.find_additional_velocity(OperationTrigger::PROXY, true)
            && let ViewChangeRequest::OffsetsWithAdditionalVelocity(change) = operation.request_mut()
        {
            change.velocity.set(axis, velocity);
            change.inertia_decay_rate.set(axis, inertia_decay_rate);
            change.anticipated_change.set(axis, travel);
            operation.add_trigger(trigger);
            let correlation_id = operation.correlation_id();
            tracing::debug!(target: "glide.queue", %correlation_id, ?axis, "proxy velocity coalesced");
            return Ok(Some(correlation_id));
        }
        let mut decay = DecayRateOverride::NONE;
        decay.set(axis, inertia_decay_rate);
        let request = ViewChangeRequest::OffsetsWithAdditionalVelocity(OffsetsChangeWithAdditionalVelocity {
            velocity: Vec2::on_axis(axis, velocity),
            inertia_decay_rate: decay,
            anticipated_change: Vec2::on_axis(axis, travel),
        });
        Ok(Some(self.issue(
            OperationType::MoveWithAdditionalVelocity,
            trigger,
            request,
        )))
    }
}
