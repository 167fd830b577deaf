//! Per-frame queue scan.

use crate::bridge::DispatchContext;
use crate::engine::InteractionEngine;
use crate::event::{ScrollerEvent, ViewChangeResult};
use crate::operation::OperationKey;

use super::Scroller;

impl<E: InteractionEngine> Scroller<E> {
    /// Advance every queued operation by one frame.
    ///
    /// In issuance order: canceled operations are evicted, delayed ones
    /// become queued, queued ones count down and dispatch, and dispatched
    /// non-animated ones count down their completion fallback.
    pub fn on_tick(&mut self) {
        if !self.is_loaded {
            return;
        }
        let span = tracing::debug_span!("glide.tick", queued = self.queue.len());
        let _guard = span.enter();

        self.snap_points.export(&mut self.engine);
        let mut completions = Vec::new();
        for key in self.queue.keys() {
            let Some(operation) = self.queue.get(key) else {
                continue;
            };
            if let Some(result) = operation.cancel_result() {
                tracing::debug!(
                    target: "glide.queue",
                    correlation_id = %operation.correlation_id(),
                    "canceled operation evicted"
                );
                completions.extend(self.queue.complete(key, result));
                continue;
            }
            if operation.is_delayed() {
                if let Some(operation) = self.queue.get_mut(key) {
                    operation.set_delayed(false);
                }
                continue;
            }
            if operation.is_queued() {
                if self.dependency_outstanding(key) {
                    continue;
                }
                let ready = self
                    .queue
                    .get_mut(key)
                    .is_some_and(|operation| operation.tick_queued());
                if ready {
                    self.dispatch(key);
                }
                continue;
            }
            if operation.is_dispatched() && !operation.is_animated() {
                let expired = self
                    .queue
                    .get_mut(key)
                    .is_some_and(|operation| operation.tick_non_animated());
                if expired {
                    tracing::debug!(target: "glide.queue", ?key, "completion fallback expired");
                    completions.extend(self.queue.complete(key, ViewChangeResult::Completed));
                }
            }
        }

        if self.restart_ticks > 0 {
            self.restart_ticks -= 1;
            if self.restart_ticks == 0 {
                tracing::debug!(target: "glide.scroller", zoom_factor = self.view.zoom_factor(), "zoom settled");
                self.events.push(ScrollerEvent::ZoomSettled {
                    zoom_factor: self.view.zoom_factor(),
                });
            }
        }

        self.raise_completions(completions);
        self.update_tick_subscription();
    }

    /// Whether `key` must keep waiting on an earlier operation. A required
    /// operation that went away is replaced by the latest still-pending
    /// non-animated operation issued before `key`, if any.
    fn dependency_outstanding(&mut self, key: OperationKey) -> bool {
        let Some(required) = self.queue.get(key).and_then(|op| op.required_operation()) else {
            return false;
        };
        if self.queue.get(required).is_some_and(|op| !op.is_canceled()) {
            return true;
        }
        let substitute = self.queue.last_pending_non_animated_before(key);
        if let Some(operation) = self.queue.get_mut(key) {
            operation.set_required_operation(substitute);
        }
        tracing::trace!(target: "glide.queue", ?key, ?substitute, "dependency re-derived");
        substitute.is_some()
    }

    fn dispatch(&mut self, key: OperationKey) {
        let Some(operation) = self.queue.get(key) else {
            return;
        };
        let ctx = DispatchContext {
            view: &self.view,
            snap_points: &self.snap_points,
            config: &self.config,
        };
        let request_id = self.bridge.dispatch(&mut self.engine, operation, ctx);
        let post_ticks = self.config.ticks.max_non_animated_operation_ticks;
        if let Some(operation) = self.queue.get_mut(key) {
            operation.set_request_id(request_id);
            if !operation.is_animated() {
                operation.arm_post_ticks(post_ticks);
            }
        }
    }
}
