//! Public view-change entry points and the enqueue policy shared with
//! proxies and the wheel.

use glide_core::{
    CorrelationId, DecayRateOverride, OffsetsChange, OffsetsChangeWithAdditionalVelocity,
    OffsetsChangeWithVelocity, OperationTrigger, SnapPointsMode, Vec2, ViewChangeError,
    ViewChangeOptions, ViewChangeRequest, ViewKind, ZoomFactorChange,
    ZoomFactorChangeWithAdditionalVelocity,
};

use super::Scroller;
use crate::config::inertia_travel;
use crate::engine::InteractionEngine;
use crate::event::ViewChangeResult;
use crate::operation::{AsyncOperation, OperationType};

type RequestResult = Result<Option<CorrelationId>, ViewChangeError>;

pub(super) fn require_finite(name: &'static str, value: f64) -> Result<(), ViewChangeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ViewChangeError::invalid(name, "must be finite"))
    }
}

pub(super) fn require_unit(name: &'static str, value: f64) -> Result<(), ViewChangeError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ViewChangeError::invalid(name, "must be within [0, 1]"))
    }
}

fn require_finite_vec(name: &'static str, value: Vec2) -> Result<(), ViewChangeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ViewChangeError::invalid(name, "components must be finite"))
    }
}

impl<E: InteractionEngine> Scroller<E> {
    /// Scroll to absolute offsets.
    pub fn scroll_to(&mut self, horizontal: f64, vertical: f64, options: ViewChangeOptions) -> RequestResult {
        require_finite("horizontal_offset", horizontal)?;
        require_finite("vertical_offset", vertical)?;
        self.request_offsets(
            Vec2::new(horizontal, vertical),
            ViewKind::Absolute,
            options,
            OperationTrigger::DIRECT_CALL,
        )
    }

    /// Scroll by a delta from the current offsets.
    pub fn scroll_by(&mut self, horizontal: f64, vertical: f64, options: ViewChangeOptions) -> RequestResult {
        require_finite("horizontal_delta", horizontal)?;
        require_finite("vertical_delta", vertical)?;
        self.request_offsets(
            Vec2::new(horizontal, vertical),
            ViewKind::RelativeToCurrent,
            options,
            OperationTrigger::DIRECT_CALL,
        )
    }

    /// Add velocity to the current motion, with an optional per-axis decay
    /// rate for the resulting inertia.
    pub fn scroll_from(&mut self, velocity: Vec2, inertia_decay_rate: Option<Vec2>) -> RequestResult {
        require_finite_vec("offsets_velocity", velocity)?;
        if let Some(rate) = inertia_decay_rate {
            require_unit("inertia_decay_rate", rate.x)?;
            require_unit("inertia_decay_rate", rate.y)?;
        }
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        let inertia_decay_rate = inertia_decay_rate.map_or(DecayRateOverride::NONE, DecayRateOverride::both);
        let default_rate = self.config.inertia.default_decay_rate;
        let anticipated_change = Vec2::new(
            inertia_travel(velocity.x, inertia_decay_rate.horizontal.unwrap_or(default_rate)),
            inertia_travel(velocity.y, inertia_decay_rate.vertical.unwrap_or(default_rate)),
        );
        let request = ViewChangeRequest::OffsetsWithAdditionalVelocity(OffsetsChangeWithAdditionalVelocity {
            velocity,
            inertia_decay_rate,
            anticipated_change,
        });
        Ok(Some(self.issue(
            OperationType::MoveWithAdditionalVelocity,
            OperationTrigger::DIRECT_CALL,
            request,
        )))
    }

    /// Scroll at a constant velocity until interrupted. A pending
    /// constant-velocity request is interrupted and replaced.
    pub fn scroll_with(&mut self, velocity: Vec2) -> RequestResult {
        require_finite_vec("offsets_velocity", velocity)?;
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        for key in self.queue.pending_constant_velocity() {
            if let Some(operation) = self.queue.get_mut(key) {
                operation.cancel(ViewChangeResult::Interrupted);
                tracing::debug!(
                    target: "glide.queue",
                    correlation_id = %operation.correlation_id(),
                    "constant velocity replaced"
                );
            }
        }
        let request = ViewChangeRequest::OffsetsWithVelocity(OffsetsChangeWithVelocity { velocity });
        Ok(Some(self.issue(
            OperationType::MoveWithVelocity,
            OperationTrigger::DIRECT_CALL,
            request,
        )))
    }

    /// Zoom to an absolute factor around `center_point`, or the anchor
    /// point when `None`.
    pub fn zoom_to(
        &mut self,
        zoom_factor: f64,
        center_point: Option<Vec2>,
        options: ViewChangeOptions,
    ) -> RequestResult {
        require_finite("zoom_factor", zoom_factor)?;
        self.request_zoom(zoom_factor, center_point, ViewKind::Absolute, options)
    }

    /// Zoom by a delta from the current factor.
    pub fn zoom_by(
        &mut self,
        delta: f64,
        center_point: Option<Vec2>,
        options: ViewChangeOptions,
    ) -> RequestResult {
        require_finite("zoom_factor_delta", delta)?;
        self.request_zoom(delta, center_point, ViewKind::RelativeToCurrent, options)
    }

    /// Add zoom velocity to the current motion.
    pub fn zoom_from(
        &mut self,
        velocity: f64,
        center_point: Option<Vec2>,
        inertia_decay_rate: Option<f64>,
    ) -> RequestResult {
        require_finite("zoom_factor_velocity", velocity)?;
        if let Some(center) = center_point {
            require_finite_vec("center_point", center)?;
        }
        if let Some(rate) = inertia_decay_rate {
            require_unit("inertia_decay_rate", rate)?;
        }
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        let anticipated_change = inertia_travel(
            velocity,
            inertia_decay_rate.unwrap_or(self.config.inertia.default_decay_rate),
        );
        let request = ViewChangeRequest::ZoomFactorWithAdditionalVelocity(ZoomFactorChangeWithAdditionalVelocity {
            velocity,
            center_point,
            inertia_decay_rate,
            anticipated_change,
        });
        Ok(Some(self.issue(
            OperationType::ScaleWithAdditionalVelocity,
            OperationTrigger::DIRECT_CALL,
            request,
        )))
    }

    // -----------------------------------------------------------------------
    // Policy
    // -----------------------------------------------------------------------

    pub(super) fn ensure_supported(&self) -> Result<(), ViewChangeError> {
        if self.config.quirks.view_changes_supported {
            Ok(())
        } else {
            Err(ViewChangeError::NotImplemented("view changes are not supported by this engine"))
        }
    }

    /// Engine command for a positional offsets request.
    pub(super) fn offsets_operation_type(&self, view_kind: ViewKind, options: ViewChangeOptions) -> OperationType {
        if options.animation_mode.is_animated(self.config.animation.animations_enabled) {
            OperationType::MoveWithAnimation
        } else if view_kind == ViewKind::RelativeToCurrent
            && options.snap_points_mode == SnapPointsMode::Ignore
        {
            OperationType::MoveByDelta
        } else {
            OperationType::MoveToAbsolute
        }
    }

    pub(super) fn request_offsets(
        &mut self,
        offsets: Vec2,
        view_kind: ViewKind,
        options: ViewChangeOptions,
        trigger: OperationTrigger,
    ) -> RequestResult {
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        let operation_type = self.offsets_operation_type(view_kind, options);
        let request = ViewChangeRequest::Offsets(OffsetsChange {
            offsets,
            view_kind,
            options,
        });
        Ok(Some(self.issue(operation_type, trigger, request)))
    }

    fn request_zoom(
        &mut self,
        zoom_factor: f64,
        center_point: Option<Vec2>,
        view_kind: ViewKind,
        options: ViewChangeOptions,
    ) -> RequestResult {
        if let Some(center) = center_point {
            require_finite_vec("center_point", center)?;
        }
        self.ensure_supported()?;
        if !self.has_content {
            return Ok(None);
        }
        let operation_type = if options.animation_mode.is_animated(self.config.animation.animations_enabled) {
            OperationType::ScaleWithAnimation
        } else {
            OperationType::ScaleToAbsolute
        };
        let request = ViewChangeRequest::ZoomFactor(ZoomFactorChange {
            zoom_factor,
            center_point,
            view_kind,
            options,
        });
        Ok(Some(self.issue(operation_type, OperationTrigger::DIRECT_CALL, request)))
    }

    /// Wrap `request` in a new operation and queue it.
    ///
    /// Direct calls wait the configured countdown, one tick longer when an
    /// overlapping animation had to be interrupted first. Proxy and wheel
    /// requests wait a single tick. Either way the countdown never drops
    /// below that of an earlier pending operation, so dispatch order
    /// follows issuance order.
    pub(super) fn issue(
        &mut self,
        operation_type: OperationType,
        trigger: OperationTrigger,
        request: ViewChangeRequest,
    ) -> CorrelationId {
        let mut pre_ticks = 1;
        if self.is_loaded {
            let delayed = self.queue.take_delayed(ViewChangeResult::Interrupted);
            self.raise_completions(delayed);
            if trigger.contains(OperationTrigger::DIRECT_CALL) {
                pre_ticks = self.config.ticks.queued_operation_ticks;
                if self.bridge.interrupt_overlapping_animation(
                    &mut self.engine,
                    operation_type,
                    self.state,
                    &self.view,
                    &self.config.quirks,
                ) {
                    pre_ticks = pre_ticks.saturating_add(1);
                }
            }
        } else if trigger.contains(OperationTrigger::DIRECT_CALL) {
            pre_ticks = self.config.ticks.queued_operation_ticks;
        }
        pre_ticks = pre_ticks.max(self.queue.max_pre_ticks());

        let correlation_id = self.ids.next_id();
        let mut operation = AsyncOperation::new(operation_type, trigger, request, correlation_id, pre_ticks);
        operation.set_delayed(!self.is_loaded);
        if !operation_type.is_offsets() && self.config.quirks.serialize_zoom_after_non_animated {
            operation.set_required_operation(self.queue.last_pending_non_animated());
        }
        self.queue.push(operation);
        tracing::debug!(
            target: "glide.queue",
            %correlation_id,
            operation_type = operation_type.as_str(),
            ?trigger,
            pre_ticks,
            delayed = !self.is_loaded,
            "operation issued"
        );
        self.update_tick_subscription();
        correlation_id
    }
}
