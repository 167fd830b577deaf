//! Engine notification handling.

use glide_core::{RequestId, Vec2};
use glide_core::snap::SnapAxis;

use super::{InertiaEnd, Scroller};
use crate::engine::{EngineNotification, InteractionEngine};
use crate::event::{InteractionState, ScrollerEvent};
use crate::queue::{CompletionRule, RequestScope};

impl<E: InteractionEngine> Scroller<E> {
    /// Apply a notification marshalled from the engine.
    pub fn on_engine_notification(&mut self, notification: EngineNotification) {
        let span = tracing::debug_span!(
            "glide.notification",
            kind = notification.name(),
            request_id = ?notification.request_id()
        );
        let _guard = span.enter();

        let completions = match notification {
            EngineNotification::ValuesChanged {
                request_id,
                position,
                zoom_factor,
            } => {
                self.apply_values(position, zoom_factor);
                request_id.map(|id| {
                    self.queue
                        .take_resolved(RequestScope::Request(id), CompletionRule::VALUES_CHANGED)
                })
            }
            EngineNotification::IdleEntered { request_id } => {
                self.set_state(InteractionState::Idle);
                self.inertia_end = None;
                let completions = request_id.map(|id| {
                    self.queue
                        .take_resolved(RequestScope::Request(id), CompletionRule::SETTLED)
                });
                self.clear_impulse();
                if self.view.zoom_factor() != self.settled_zoom_factor {
                    self.settled_zoom_factor = self.view.zoom_factor();
                    self.restart_ticks = self.config.ticks.animation_restart_ticks.max(1);
                }
                completions
            }
            EngineNotification::InteractingEntered { .. } => {
                self.set_state(InteractionState::Interaction);
                self.inertia_end = None;
                self.restart_ticks = 0;
                self.clear_impulse();
                Some(
                    self.queue
                        .take_resolved(RequestScope::Manipulation, CompletionRule::INTERRUPTED),
                )
            }
            EngineNotification::InertiaEntered {
                request_id,
                velocity,
                natural_resting_position,
                natural_resting_zoom_factor,
            } => {
                self.inertia_end = Some(InertiaEnd {
                    position: natural_resting_position,
                    zoom_factor: natural_resting_zoom_factor,
                });
                self.set_state(InteractionState::Inertia);
                self.correct_constant_velocity(request_id, velocity);
                None
            }
            EngineNotification::AnimationEntered { .. } => {
                self.set_state(InteractionState::Animation);
                None
            }
            EngineNotification::RequestIgnored { request_id } => Some(
                self.queue
                    .take_resolved(RequestScope::Request(request_id), CompletionRule::IGNORED),
            ),
        };

        if let Some(completions) = completions {
            self.raise_completions(completions);
        }
        self.update_tick_subscription();
    }

    fn apply_values(&mut self, offsets: Vec2, zoom_factor: f64) {
        if self.view.offsets() == offsets && self.view.zoom_factor() == zoom_factor {
            return;
        }
        let zoom_changed = self.view.zoom_factor() != zoom_factor;
        self.view.set_offsets(offsets);
        self.view.set_zoom_factor(zoom_factor);
        if zoom_changed && self.is_loaded {
            self.engine.set_bounds(self.view.engine_bounds());
        }
        self.events.push(ScrollerEvent::ViewChanged {
            offsets,
            zoom_factor,
        });
        self.update_controllers();
    }

    fn correct_constant_velocity(&mut self, request_id: Option<RequestId>, velocity: Vec2) {
        let epsilon = self.config.inertia.constant_velocity_epsilon;
        let Some((old, new)) = self
            .bridge
            .correct_constant_velocity(&mut self.engine, request_id, velocity, epsilon)
        else {
            return;
        };
        if let Some(operation) = self.queue.find_by_request_id(old) {
            operation.set_request_id(new);
        }
    }

    /// Motion settled or a manipulation took over: resting values are no
    /// longer ignored.
    fn clear_impulse(&mut self) {
        if let Err(error) = self.snap_points.end_impulse() {
            tracing::warn!(target: "glide.snap", %error, "clearing ignored snap values failed");
        }
        if self.is_loaded {
            self.snap_points.export(&mut self.engine);
        }
    }

    /// Flag the resting value of `axis` as ignored ahead of impulse motion.
    pub(super) fn begin_impulse(&mut self, axis: SnapAxis, resting_value: f64) {
        if let Err(error) = self.snap_points.begin_impulse(axis, resting_value) {
            tracing::warn!(target: "glide.snap", %error, ?axis, "ignoring resting snap value failed");
        }
        if self.is_loaded {
            self.snap_points.export(&mut self.engine);
        }
    }
}
