#![forbid(unsafe_code)]

//! Correlation layer between queued operations and the engine.
//!
//! [`EngineBridge`] turns a ready [`AsyncOperation`] into exactly one engine
//! command and remembers enough about what it sent to apply the engine
//! workarounds that depend on history:
//!
//! - the latest dispatched request, which decides whether an overlapping
//!   animation must be interrupted first and whether a velocity override
//!   may be reset;
//! - the outstanding constant-velocity request, whose initial inertia
//!   velocity is checked when the engine enters inertia.

use glide_core::geometry::clamp;
use glide_core::snap::SnapAxis;
use glide_core::{Axis, RequestId, SnapPointsMode, Vec2, ViewChangeRequest, ViewKind};

use crate::config::{PlatformQuirks, ScrollerConfig};
use crate::engine::{InteractionEngine, PositionAnimation, ScaleAnimation};
use crate::event::InteractionState;
use crate::operation::{AsyncOperation, OperationType};
use crate::snap_points::SnapPointsState;
use crate::view::ViewState;

/// Read-only state a dispatch resolves targets against.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub view: &'a ViewState,
    pub snap_points: &'a SnapPointsState,
    pub config: &'a ScrollerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ConstantVelocity {
    request_id: RequestId,
    velocity: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct EngineBridge {
    latest: Option<(RequestId, OperationType)>,
    constant_velocity: Option<ConstantVelocity>,
}

impl EngineBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request id and command of the most recent dispatch.
    pub fn latest_dispatched(&self) -> Option<(RequestId, OperationType)> {
        self.latest
    }

    /// Issue the engine command for `operation` and return its request id.
    pub fn dispatch(
        &mut self,
        engine: &mut dyn InteractionEngine,
        operation: &AsyncOperation,
        ctx: DispatchContext<'_>,
    ) -> RequestId {
        let operation_type = operation.operation_type();
        let view = ctx.view;
        let request_id = match operation.request() {
            ViewChangeRequest::Offsets(change) => {
                if operation_type == OperationType::MoveByDelta {
                    engine.move_by(change.offsets)
                } else {
                    let current = view.offsets();
                    let mut target = match change.view_kind {
                        ViewKind::Absolute => change.offsets,
                        ViewKind::RelativeToCurrent => current + change.offsets,
                    };
                    if change.options.snap_points_mode == SnapPointsMode::Default {
                        for axis in Axis::ALL {
                            let snapped = ctx
                                .snap_points
                                .value_after_snap_points(SnapAxis::from(axis), target.get(axis));
                            target.set(axis, snapped);
                        }
                    }
                    let target = view.clamp_offsets(target);
                    if operation_type == OperationType::MoveWithAnimation {
                        engine.move_with_animation(PositionAnimation {
                            from: current,
                            to: target,
                            duration: ctx.config.animation.offsets_duration((target - current).length()),
                        })
                    } else {
                        engine.move_to(target)
                    }
                }
            }
            ViewChangeRequest::OffsetsWithVelocity(change) => {
                engine.set_position_inertia_decay_rate(Some(Vec2::ZERO));
                let request_id = engine.move_with_additional_velocity(change.velocity);
                self.constant_velocity = Some(ConstantVelocity {
                    request_id,
                    velocity: change.velocity,
                });
                request_id
            }
            ViewChangeRequest::OffsetsWithAdditionalVelocity(change) => {
                if let Some(rate) = change
                    .inertia_decay_rate
                    .resolve(ctx.config.inertia.default_decay_rate)
                {
                    engine.set_position_inertia_decay_rate(Some(rate));
                }
                engine.move_with_additional_velocity(change.velocity)
            }
            ViewChangeRequest::ZoomFactor(change) => {
                let current = view.zoom_factor();
                let mut target = match change.view_kind {
                    ViewKind::Absolute => change.zoom_factor,
                    ViewKind::RelativeToCurrent => current + change.zoom_factor,
                };
                if change.options.snap_points_mode == SnapPointsMode::Default {
                    target = ctx.snap_points.value_after_snap_points(SnapAxis::Zoom, target);
                }
                let target = view.clamp_zoom(target);
                let center = change.center_point.unwrap_or_else(|| view.anchor_point());
                if operation_type == OperationType::ScaleWithAnimation {
                    engine.scale_with_animation(
                        ScaleAnimation {
                            from: current,
                            to: target,
                            duration: ctx.config.animation.zoom_duration((target - current).abs()),
                        },
                        center,
                    )
                } else {
                    engine.scale_to(target, center)
                }
            }
            ViewChangeRequest::ZoomFactorWithAdditionalVelocity(change) => {
                if let Some(rate) = change.inertia_decay_rate {
                    engine.set_scale_inertia_decay_rate(Some(clamp(rate, 0.0, 1.0)));
                }
                let center = change.center_point.unwrap_or_else(|| view.anchor_point());
                engine.scale_with_additional_velocity(change.velocity, center)
            }
        };
        tracing::debug!(
            target: "glide.bridge",
            correlation_id = %operation.correlation_id(),
            %request_id,
            operation_type = operation_type.as_str(),
            request = operation.request().kind_name(),
            "operation dispatched"
        );
        self.latest = Some((request_id, operation_type));
        request_id
    }

    /// Force the engine out of a running animation of the same command
    /// before `operation_type` is queued. Returns whether a command was
    /// issued.
    pub fn interrupt_overlapping_animation(
        &mut self,
        engine: &mut dyn InteractionEngine,
        operation_type: OperationType,
        state: InteractionState,
        view: &ViewState,
        quirks: &PlatformQuirks,
    ) -> bool {
        let overlapping = quirks.interrupt_overlapping_animations
            && operation_type.is_animated()
            && state == InteractionState::Animation
            && self.latest.is_some_and(|(_, latest)| latest == operation_type);
        if !overlapping {
            return false;
        }
        let request_id = if operation_type.is_offsets() {
            engine.move_by(Vec2::ZERO)
        } else {
            engine.scale_to(view.zoom_factor(), Vec2::ZERO)
        };
        tracing::debug!(
            target: "glide.bridge",
            %request_id,
            operation_type = operation_type.as_str(),
            "overlapping animation interrupted"
        );
        true
    }

    /// Cleanup once `operation` left the queue: restore the default decay
    /// rate it overrode, unless a later velocity command of the same kind
    /// now owns the override.
    pub fn on_operation_removed(&mut self, engine: &mut dyn InteractionEngine, operation: &AsyncOperation) {
        let operation_type = operation.operation_type();
        let Some(request_id) = operation.request_id() else {
            return;
        };
        if self
            .constant_velocity
            .is_some_and(|cv| cv.request_id == request_id)
        {
            self.constant_velocity = None;
        }
        if !operation_type.is_velocity() {
            return;
        }
        let superseded = self.latest.is_some_and(|(latest_id, latest_type)| {
            latest_id != request_id
                && latest_type.is_velocity()
                && latest_type.is_offsets() == operation_type.is_offsets()
        });
        if superseded {
            return;
        }
        tracing::trace!(
            target: "glide.bridge",
            %request_id,
            offsets = operation_type.is_offsets(),
            "inertia decay rate reset"
        );
        if operation_type.is_offsets() {
            engine.set_position_inertia_decay_rate(None);
        } else {
            engine.set_scale_inertia_decay_rate(None);
        }
    }

    /// Compare the engine's initial inertia velocity with the outstanding
    /// constant-velocity request and add the difference when it exceeds
    /// `epsilon`. Returns `(old, new)` request ids when a correction was
    /// issued; the caller retargets the operation to `new`.
    pub fn correct_constant_velocity(
        &mut self,
        engine: &mut dyn InteractionEngine,
        request_id: Option<RequestId>,
        reported: Vec2,
        epsilon: f64,
    ) -> Option<(RequestId, RequestId)> {
        let tracked = self.constant_velocity?;
        if request_id != Some(tracked.request_id) {
            return None;
        }
        let correction = tracked.velocity - reported;
        if correction.x.abs() <= epsilon && correction.y.abs() <= epsilon {
            return None;
        }
        let corrected = engine.move_with_additional_velocity(correction);
        tracing::debug!(
            target: "glide.bridge",
            old_request_id = %tracked.request_id,
            new_request_id = %corrected,
            correction_x = correction.x,
            correction_y = correction.y,
            "constant velocity corrected"
        );
        self.constant_velocity = Some(ConstantVelocity {
            request_id: corrected,
            velocity: tracked.velocity,
        });
        if let Some((latest_id, operation_type)) = self.latest
            && latest_id == tracked.request_id
        {
            self.latest = Some((corrected, operation_type));
        }
        Some((tracked.request_id, corrected))
    }
}
