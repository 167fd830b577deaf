#![forbid(unsafe_code)]

//! Reference scroller setups and frame-loop drivers.

use glide_core::{CorrelationId, Size};
use glide_runtime::{Scroller, ScrollerConfig, ScrollerEvent, ViewChangeResult};

use crate::recording_engine::RecordingEngine;

/// Content size used by [`loaded_scroller`].
pub const EXTENT: Size = Size::new(1000.0, 1000.0);
/// Viewport size used by [`loaded_scroller`].
pub const VIEWPORT: Size = Size::new(300.0, 300.0);

/// A loaded scroller over [`EXTENT`] content in a [`VIEWPORT`] viewport,
/// with setup events drained.
pub fn loaded_scroller() -> Scroller<RecordingEngine> {
    loaded_scroller_with(ScrollerConfig::default())
}

pub fn loaded_scroller_with(config: ScrollerConfig) -> Scroller<RecordingEngine> {
    let mut scroller = Scroller::new(RecordingEngine::new(), config);
    scroller.set_content(Some(EXTENT));
    scroller.set_viewport(VIEWPORT);
    scroller.on_loaded();
    scroller.drain_events();
    scroller
}

/// Call `on_tick` `n` times without settling anything.
pub fn tick_n(scroller: &mut Scroller<RecordingEngine>, n: usize) {
    for _ in 0..n {
        scroller.on_tick();
    }
}

/// Tick, settling every dispatched command as soon as it is issued, until
/// the scroller stops ticking or `max_ticks` frames elapse. Returns every
/// event raised along the way.
pub fn run_until_idle(scroller: &mut Scroller<RecordingEngine>, max_ticks: usize) -> Vec<ScrollerEvent> {
    let mut events = scroller.drain_events();
    for _ in 0..max_ticks {
        if !scroller.is_ticking() {
            break;
        }
        scroller.on_tick();
        for request_id in scroller.engine_mut().take_unsettled() {
            let notifications = scroller.engine_mut().settle(request_id);
            for notification in notifications {
                scroller.on_engine_notification(notification);
            }
        }
        events.extend(scroller.drain_events());
    }
    events
}

/// Completion events, in order.
pub fn completions(events: &[ScrollerEvent]) -> Vec<(CorrelationId, ViewChangeResult)> {
    events.iter().filter_map(ScrollerEvent::completion).collect()
}

/// Results raised for `correlation_id`, in order.
pub fn completions_for(events: &[ScrollerEvent], correlation_id: CorrelationId) -> Vec<ViewChangeResult> {
    completions(events)
        .into_iter()
        .filter(|(id, _)| *id == correlation_id)
        .map(|(_, result)| result)
        .collect()
}
