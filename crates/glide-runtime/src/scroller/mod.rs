#![forbid(unsafe_code)]

//! The scroller: public entry points, queue policy, and completion fan-out.
//!
//! [`Scroller`] owns the [`OperationQueue`] and every piece of state the
//! queue consults. All of it lives on the UI thread; the host calls
//! [`Scroller::on_tick`] once per frame while the tick subscription is
//! held, and marshals engine notifications back to
//! [`Scroller::on_engine_notification`].
//!
//! # Request flow
//!
//! ```text
//! scroll_to / proxy / wheel ──► AsyncOperation ──► OperationQueue
//!                                                      │ on_tick
//!                                                      ▼
//!                    ScrollerEvent ◄── notification ◄── EngineBridge::dispatch
//! ```
//!
//! # Invariants
//!
//! 1. Every correlation id handed out receives exactly one
//!    `ScrollCompleted`/`ZoomCompleted` event.
//! 2. Nothing reaches the engine while the scroller is unloaded.
//! 3. The tick subscription is held only while the queue is non-empty or
//!    a restart grace countdown is running.

mod notifications;
mod processing;
mod proxy;
mod requests;
mod wheel;

use glide_core::snap::{SnapAxis, SnapPoint};
use glide_core::{
    Axis, CorrelationIdAllocator, InputKinds, OperationTrigger, Size, Vec2, ViewChangeError,
};

use crate::bridge::EngineBridge;
use crate::config::ScrollerConfig;
use crate::controller::{ScrollController, ScrollMode, ZoomMode};
use crate::engine::InteractionEngine;
use crate::event::{InteractionState, ScrollerEvent};
use crate::queue::{Completion, CompletionRule, OperationQueue, RequestScope};
use crate::snap_points::SnapPointsState;
use crate::tick::TickSubscription;
use crate::view::ViewState;

/// Natural resting view recorded when the engine entered inertia.
#[derive(Debug, Clone, Copy, PartialEq)]
struct InertiaEnd {
    position: Vec2,
    zoom_factor: f64,
}

/// Coordinates view changes between callers and an [`InteractionEngine`].
pub struct Scroller<E: InteractionEngine> {
    engine: E,
    config: ScrollerConfig,
    view: ViewState,
    has_content: bool,
    is_loaded: bool,
    state: InteractionState,
    queue: OperationQueue,
    bridge: EngineBridge,
    snap_points: SnapPointsState,
    ids: CorrelationIdAllocator,
    tick: TickSubscription,
    restart_ticks: u8,
    settled_zoom_factor: f64,
    inertia_end: Option<InertiaEnd>,
    scroll_modes: [ScrollMode; 2],
    zoom_mode: ZoomMode,
    ignored_input_kinds: InputKinds,
    controllers: [Option<Box<dyn ScrollController>>; 2],
    events: Vec<ScrollerEvent>,
}

impl<E: InteractionEngine> std::fmt::Debug for Scroller<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scroller")
            .field("view", &self.view)
            .field("state", &self.state)
            .field("is_loaded", &self.is_loaded)
            .field("queued", &self.queue.len())
            .field("ticking", &self.tick.is_active())
            .finish_non_exhaustive()
    }
}

const fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

impl<E: InteractionEngine> Scroller<E> {
    /// Create an unloaded scroller without content.
    #[must_use]
    pub fn new(engine: E, config: ScrollerConfig) -> Self {
        let problems = config.validate();
        if !problems.is_empty() {
            tracing::warn!(target: "glide.scroller", ?problems, "scroller config has problems");
        }
        let view = ViewState::default();
        Self {
            engine,
            config,
            settled_zoom_factor: view.zoom_factor(),
            view,
            has_content: false,
            is_loaded: false,
            state: InteractionState::Idle,
            queue: OperationQueue::new(),
            bridge: EngineBridge::new(),
            snap_points: SnapPointsState::new(),
            ids: CorrelationIdAllocator::new(),
            tick: TickSubscription::default(),
            restart_ticks: 0,
            inertia_end: None,
            scroll_modes: [ScrollMode::default(); 2],
            zoom_mode: ZoomMode::default(),
            ignored_input_kinds: InputKinds::NONE,
            controllers: [None, None],
            events: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn offsets(&self) -> Vec2 {
        self.view.offsets()
    }

    pub fn zoom_factor(&self) -> f64 {
        self.view.zoom_factor()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Whether the host should keep calling [`on_tick`](Self::on_tick).
    pub fn is_ticking(&self) -> bool {
        self.tick.is_active()
    }

    pub fn queue(&self) -> &OperationQueue {
        &self.queue
    }

    pub fn snap_points(&self) -> &SnapPointsState {
        &self.snap_points
    }

    pub fn scroll_mode(&self, axis: Axis) -> ScrollMode {
        self.scroll_modes[axis_index(axis)]
    }

    pub fn zoom_mode(&self) -> ZoomMode {
        self.zoom_mode
    }

    pub fn ignored_input_kinds(&self) -> InputKinds {
        self.ignored_input_kinds
    }

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<ScrollerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Offsets the view will rest at once inertia ends.
    pub fn end_of_inertia_offsets(&self) -> Vec2 {
        match self.inertia_end {
            Some(end) if self.state == InteractionState::Inertia => {
                self.view.clamp_offsets_at(end.position, self.end_of_inertia_zoom_factor())
            }
            _ => self.view.offsets(),
        }
    }

    /// Zoom factor the view will rest at once inertia ends.
    pub fn end_of_inertia_zoom_factor(&self) -> f64 {
        match self.inertia_end {
            Some(end) if self.state == InteractionState::Inertia => self.view.clamp_zoom(end.zoom_factor),
            _ => self.view.zoom_factor(),
        }
    }

    // -----------------------------------------------------------------------
    // Content and lifecycle
    // -----------------------------------------------------------------------

    /// Swap the content. Outstanding operations are interrupted; without
    /// content every request is declined.
    pub fn set_content(&mut self, extent: Option<Size>) {
        if self.has_content {
            self.interrupt_all("content swapped");
        }
        self.has_content = extent.is_some();
        self.set_extent(extent.unwrap_or(Size::ZERO));
    }

    /// The content was resized.
    pub fn set_extent(&mut self, extent: Size) {
        if self.view.extent() == extent {
            return;
        }
        self.view.set_extent(extent);
        self.on_geometry_changed();
    }

    /// The viewport was resized.
    pub fn set_viewport(&mut self, viewport: Size) {
        if self.view.viewport() == viewport {
            return;
        }
        self.view.set_viewport(viewport);
        if let Err(error) = self.snap_points.on_viewport_changed(viewport) {
            tracing::warn!(target: "glide.snap", %error, "snap points kept for previous viewport");
        }
        self.on_geometry_changed();
    }

    pub fn on_loaded(&mut self) {
        if self.is_loaded {
            return;
        }
        self.is_loaded = true;
        tracing::debug!(target: "glide.scroller", queued = self.queue.len(), "loaded");
        self.engine.set_bounds(self.view.engine_bounds());
        self.snap_points.export(&mut self.engine);
        self.update_tick_subscription();
    }

    /// Interrupt every outstanding operation and stop ticking.
    pub fn on_unloaded(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.is_loaded = false;
        tracing::debug!(target: "glide.scroller", queued = self.queue.len(), "unloaded");
        self.interrupt_all("unloaded");
        self.restart_ticks = 0;
        self.update_tick_subscription();
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    pub fn set_min_zoom_factor(&mut self, value: f64) -> Result<(), ViewChangeError> {
        validate_zoom_bound("min_zoom_factor", value)?;
        self.view.set_zoom_bounds(value, self.view.max_zoom_factor());
        self.on_geometry_changed();
        Ok(())
    }

    pub fn set_max_zoom_factor(&mut self, value: f64) -> Result<(), ViewChangeError> {
        validate_zoom_bound("max_zoom_factor", value)?;
        self.view
            .set_zoom_bounds(self.view.min_zoom_factor().min(value), value);
        self.on_geometry_changed();
        Ok(())
    }

    /// Set the ratio of the viewport kept stationary by zoom requests
    /// without a center point. NaN clears the anchor.
    pub fn set_anchor_ratio(&mut self, axis: Axis, ratio: f64) -> Result<(), ViewChangeError> {
        let ratio = if ratio.is_nan() {
            None
        } else if (0.0..=1.0).contains(&ratio) {
            Some(ratio)
        } else {
            return Err(ViewChangeError::invalid("anchor_ratio", "must be within [0, 1] or NaN"));
        };
        self.view.set_anchor_ratio(axis, ratio);
        Ok(())
    }

    /// Replace the snap points declared for `axis`.
    pub fn set_snap_points(&mut self, axis: SnapAxis, points: Vec<SnapPoint>) -> Result<(), ViewChangeError> {
        self.snap_points.set_points(axis, points, self.view.viewport())?;
        if self.is_loaded {
            self.snap_points.export(&mut self.engine);
        }
        Ok(())
    }

    pub fn set_scroll_mode(&mut self, axis: Axis, mode: ScrollMode) {
        self.scroll_modes[axis_index(axis)] = mode;
        if let Some(controller) = self.controllers[axis_index(axis)].as_mut() {
            controller.set_scroll_mode(mode);
        }
    }

    pub fn set_zoom_mode(&mut self, mode: ZoomMode) {
        self.zoom_mode = mode;
    }

    pub fn set_ignored_input_kinds(&mut self, kinds: InputKinds) {
        self.ignored_input_kinds = kinds;
    }

    /// Attach the controller driving `axis`, returning the one it replaces.
    pub fn attach_scroll_controller(
        &mut self,
        axis: Axis,
        mut controller: Box<dyn ScrollController>,
    ) -> Option<Box<dyn ScrollController>> {
        let (min, max, offset, viewport) = self.controller_values(axis);
        controller.set_values(min, max, offset, viewport);
        controller.set_scroll_mode(self.scroll_mode(axis));
        self.controllers[axis_index(axis)].replace(controller)
    }

    pub fn detach_scroll_controller(&mut self, axis: Axis) -> Option<Box<dyn ScrollController>> {
        self.controllers[axis_index(axis)].take()
    }

    // -----------------------------------------------------------------------
    // Internals shared by the submodules
    // -----------------------------------------------------------------------

    fn controller_values(&self, axis: Axis) -> (f64, f64, f64, f64) {
        (
            0.0,
            self.view.scrollable().get(axis),
            self.view.offsets().get(axis),
            self.view.viewport().along(axis),
        )
    }

    fn update_controllers(&mut self) {
        for axis in Axis::ALL {
            let (min, max, offset, viewport) = self.controller_values(axis);
            if let Some(controller) = self.controllers[axis_index(axis)].as_mut() {
                controller.set_values(min, max, offset, viewport);
            }
        }
    }

    fn on_geometry_changed(&mut self) {
        if self.is_loaded {
            self.engine.set_bounds(self.view.engine_bounds());
            self.snap_points.export(&mut self.engine);
        }
        self.update_controllers();
    }

    fn set_state(&mut self, state: InteractionState) {
        if self.state == state {
            return;
        }
        tracing::debug!(target: "glide.scroller", from = ?self.state, to = ?state, "interaction state changed");
        self.state = state;
        self.events.push(ScrollerEvent::StateChanged(state));
    }

    fn interrupt_all(&mut self, reason: &'static str) {
        let completions = self
            .queue
            .take_resolved(RequestScope::All, CompletionRule::INTERRUPTED);
        if !completions.is_empty() {
            tracing::debug!(target: "glide.queue", count = completions.len(), reason, "operations interrupted");
        }
        self.raise_completions(completions);
    }

    /// Raise one completion event per operation, and notify the proxies
    /// that asked for it.
    fn raise_completions(&mut self, completions: Vec<Completion>) {
        for Completion { operation, result } in completions {
            if self.is_loaded {
                self.bridge.on_operation_removed(&mut self.engine, &operation);
            }
            let correlation_id = operation.correlation_id();
            tracing::debug!(
                target: "glide.queue",
                %correlation_id,
                result = result.as_str(),
                operation_type = operation.operation_type().as_str(),
                "operation completed"
            );
            for axis in Axis::ALL {
                if operation.trigger().intersects(OperationTrigger::proxy(axis))
                    && let Some(controller) = self.controllers[axis_index(axis)].as_mut()
                {
                    controller.on_scroll_completed(correlation_id, result);
                }
            }
            self.events.push(if operation.operation_type().is_offsets() {
                ScrollerEvent::ScrollCompleted {
                    correlation_id,
                    result,
                }
            } else {
                ScrollerEvent::ZoomCompleted {
                    correlation_id,
                    result,
                }
            });
        }
    }

    fn update_tick_subscription(&mut self) {
        let wanted = self.is_loaded && (!self.queue.is_empty() || self.restart_ticks > 0);
        let changed = if wanted {
            self.tick.acquire()
        } else {
            self.tick.release()
        };
        if changed {
            self.events
                .push(ScrollerEvent::TickSubscriptionChanged { active: wanted });
        }
    }
}

fn validate_zoom_bound(name: &'static str, value: f64) -> Result<(), ViewChangeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ViewChangeError::invalid(name, "must be finite and positive"))
    }
}
