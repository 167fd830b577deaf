#![forbid(unsafe_code)]

//! Load state, content swaps, geometry, and argument validation.
//!
//! Run:
//!   cargo test -p glide-harness --test lifecycle

use glide_core::snap::{SnapAxis, SnapPoint};
use glide_core::{Axis, Size, Vec2, ViewChangeError, ViewChangeOptions, WheelInput};
use glide_harness::{
    EXTENT, EngineCommand, RecordingEngine, VIEWPORT, completions_for, loaded_scroller,
    loaded_scroller_with, run_until_idle, tick_n,
};
use glide_runtime::{
    EngineNotification, OperationState, Scroller, ScrollerConfig, ScrollerEvent, ViewChangeResult,
};

fn unloaded_scroller() -> Scroller<RecordingEngine> {
    let mut scroller = Scroller::new(RecordingEngine::new(), ScrollerConfig::default());
    scroller.set_content(Some(EXTENT));
    scroller.set_viewport(VIEWPORT);
    scroller.drain_events();
    scroller
}

#[test]
fn requests_before_load_wait_for_it() {
    let mut scroller = unloaded_scroller();
    let id = scroller
        .scroll_by(0.0, 50.0, ViewChangeOptions::INSTANT)
        .unwrap()
        .unwrap();
    assert!(!scroller.is_ticking());
    assert_eq!(
        scroller.queue().iter().next().map(|op| op.state()),
        Some(OperationState::Delayed)
    );
    tick_n(&mut scroller, 5);
    assert_eq!(scroller.engine().motion_count(), 0);

    scroller.on_loaded();
    assert!(scroller.is_ticking());
    assert_eq!(
        scroller.drain_events(),
        vec![ScrollerEvent::TickSubscriptionChanged { active: true }]
    );
    // One frame to leave the delayed state, then the usual countdown.
    tick_n(&mut scroller, 3);
    assert_eq!(scroller.engine().motion_count(), 0);
    tick_n(&mut scroller, 1);
    assert_eq!(scroller.engine().motion_count(), 1);

    let events = run_until_idle(&mut scroller, 30);
    assert_eq!(completions_for(&events, id), vec![ViewChangeResult::Completed]);
    assert_eq!(scroller.offsets(), Vec2::new(0.0, 50.0));
}

#[test]
fn delayed_requests_yield_to_fresh_ones() {
    let mut scroller = unloaded_scroller();
    let stale = scroller
        .scroll_to(0.0, 100.0, ViewChangeOptions::INSTANT)
        .unwrap()
        .unwrap();
    scroller.on_loaded();
    let fresh = scroller
        .scroll_to(0.0, 200.0, ViewChangeOptions::INSTANT)
        .unwrap()
        .unwrap();
    assert!(fresh > stale);

    let events = run_until_idle(&mut scroller, 30);
    assert_eq!(completions_for(&events, stale), vec![ViewChangeResult::Interrupted]);
    assert_eq!(completions_for(&events, fresh), vec![ViewChangeResult::Completed]);
    assert_eq!(scroller.engine().motion_count(), 1);
    assert_eq!(scroller.offsets(), Vec2::new(0.0, 200.0));
}

#[test]
fn unload_interrupts_everything() {
    let mut scroller = loaded_scroller();
    let running = scroller
        .scroll_to(300.0, 0.0, ViewChangeOptions::ANIMATED)
        .unwrap()
        .unwrap();
    tick_n(&mut scroller, 3);
    let queued = scroller
        .scroll_by(0.0, 10.0, ViewChangeOptions::INSTANT)
        .unwrap()
        .unwrap();
    scroller.drain_events();

    scroller.on_unloaded();
    let events = scroller.drain_events();
    assert_eq!(completions_for(&events, running), vec![ViewChangeResult::Interrupted]);
    assert_eq!(completions_for(&events, queued), vec![ViewChangeResult::Interrupted]);
    assert_eq!(
        events.last(),
        Some(&ScrollerEvent::TickSubscriptionChanged { active: false })
    );
    assert!(scroller.queue().is_empty());
    assert!(!scroller.is_loaded());

    let before = scroller.engine().commands().len();
    tick_n(&mut scroller, 5);
    assert_eq!(scroller.engine().commands().len(), before);
}

#[test]
fn content_swap_interrupts_and_missing_content_declines() {
    let mut scroller = loaded_scroller();
    let id = scroller
        .scroll_by(0.0, 10.0, ViewChangeOptions::INSTANT)
        .unwrap()
        .unwrap();
    scroller.set_content(Some(Size::new(2000.0, 2000.0)));
    assert_eq!(
        completions_for(&scroller.drain_events(), id),
        vec![ViewChangeResult::Interrupted]
    );
    assert_eq!(scroller.engine().bounds().max_position, Vec2::new(1700.0, 1700.0));

    scroller.set_content(None);
    assert!(!scroller.has_content());
    assert_eq!(
        scroller.scroll_to(10.0, 10.0, ViewChangeOptions::INSTANT),
        Ok(None)
    );
    assert_eq!(scroller.zoom_to(2.0, None, ViewChangeOptions::INSTANT), Ok(None));
    assert_eq!(scroller.scroll_with(Vec2::new(0.0, 10.0)), Ok(None));
    assert_eq!(scroller.on_pointer_wheel(WheelInput::vertical(-120)), None);
    assert!(scroller.queue().is_empty());
}

#[test]
fn tick_subscription_follows_queue() {
    let mut scroller = loaded_scroller();
    assert!(!scroller.is_ticking());
    scroller
        .scroll_to(0.0, 10.0, ViewChangeOptions::INSTANT)
        .unwrap();
    assert!(scroller.is_ticking());

    let events = run_until_idle(&mut scroller, 30);
    let subscriptions: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ScrollerEvent::TickSubscriptionChanged { active } => Some(*active),
            _ => None,
        })
        .collect();
    assert_eq!(subscriptions, vec![true, false]);
    assert!(!scroller.is_ticking());
}

#[test]
fn zoom_settles_after_grace_period() {
    let mut scroller = loaded_scroller();
    scroller
        .zoom_to(2.0, None, ViewChangeOptions::ANIMATED)
        .unwrap();
    tick_n(&mut scroller, 3);
    let request_id = scroller.engine().last_request_id().unwrap();
    for notification in scroller.engine_mut().settle(request_id) {
        scroller.on_engine_notification(notification);
    }
    scroller.drain_events();
    assert!(scroller.is_ticking());

    let restart = usize::from(scroller.config().ticks.animation_restart_ticks);
    tick_n(&mut scroller, restart - 1);
    assert!(scroller.drain_events().is_empty());
    tick_n(&mut scroller, 1);
    assert_eq!(
        scroller.drain_events(),
        vec![
            ScrollerEvent::ZoomSettled { zoom_factor: 2.0 },
            ScrollerEvent::TickSubscriptionChanged { active: false },
        ]
    );
}

#[test]
fn manipulation_cancels_zoom_grace_period() {
    let mut scroller = loaded_scroller();
    scroller
        .zoom_to(2.0, None, ViewChangeOptions::ANIMATED)
        .unwrap();
    tick_n(&mut scroller, 3);
    let request_id = scroller.engine().last_request_id().unwrap();
    for notification in scroller.engine_mut().settle(request_id) {
        scroller.on_engine_notification(notification);
    }
    scroller.on_engine_notification(EngineNotification::InteractingEntered { request_id: None });
    assert!(!scroller.is_ticking());
}

#[test]
fn geometry_updates_reach_the_engine() {
    let mut scroller = loaded_scroller();
    assert_eq!(scroller.engine().bounds().max_position, Vec2::new(700.0, 700.0));
    scroller.set_viewport(Size::new(500.0, 400.0));
    assert_eq!(scroller.engine().bounds().max_position, Vec2::new(500.0, 600.0));
    scroller.set_extent(Size::new(500.0, 2000.0));
    assert_eq!(scroller.engine().bounds().max_position, Vec2::new(0.0, 1600.0));

    scroller.set_max_zoom_factor(0.05).unwrap();
    assert_eq!(scroller.view().min_zoom_factor(), 0.05);
    assert_eq!(scroller.engine().bounds().max_zoom_factor, 0.05);
}

#[test]
fn anchor_ratio_positions_default_zoom_center() {
    let mut scroller = loaded_scroller();
    scroller.set_anchor_ratio(Axis::Horizontal, 0.0).unwrap();
    scroller.set_anchor_ratio(Axis::Vertical, 1.0).unwrap();
    scroller.zoom_to(2.0, None, ViewChangeOptions::INSTANT).unwrap();
    tick_n(&mut scroller, 3);
    assert_eq!(
        scroller.engine().issued().last().map(|(_, c)| c.clone()),
        Some(EngineCommand::ScaleTo {
            zoom_factor: 2.0,
            center: Vec2::new(0.0, 300.0),
        })
    );

    scroller.set_anchor_ratio(Axis::Vertical, f64::NAN).unwrap();
    assert_eq!(scroller.view().anchor_point(), Vec2::new(0.0, 150.0));
}

#[test]
fn malformed_arguments_are_rejected() {
    let mut scroller = loaded_scroller();
    assert!(matches!(
        scroller.scroll_to(f64::NAN, 0.0, ViewChangeOptions::INSTANT),
        Err(ViewChangeError::InvalidArgument { name: "horizontal_offset", .. })
    ));
    assert!(scroller.scroll_by(0.0, f64::INFINITY, ViewChangeOptions::INSTANT).is_err());
    assert!(scroller.scroll_from(Vec2::new(1.0, 1.0), Some(Vec2::new(0.5, 1.5))).is_err());
    assert!(scroller.zoom_to(f64::NAN, None, ViewChangeOptions::INSTANT).is_err());
    assert!(scroller.zoom_from(1.0, None, Some(-0.1)).is_err());
    assert!(scroller.set_min_zoom_factor(0.0).is_err());
    assert!(scroller.set_max_zoom_factor(f64::INFINITY).is_err());
    assert!(scroller.set_anchor_ratio(Axis::Horizontal, 1.5).is_err());
    assert!(matches!(
        scroller.set_snap_points(SnapAxis::Vertical, vec![SnapPoint::irregular(f64::NAN)]),
        Err(ViewChangeError::SnapPoint(_))
    ));
    assert!(scroller.queue().is_empty());
    assert!(scroller.drain_events().is_empty());
}

#[test]
fn unsupported_engine_rejects_view_changes() {
    let mut config = ScrollerConfig::default();
    config.quirks.view_changes_supported = false;
    let mut scroller = loaded_scroller_with(config);
    assert!(matches!(
        scroller.scroll_to(10.0, 0.0, ViewChangeOptions::INSTANT),
        Err(ViewChangeError::NotImplemented(_))
    ));
    assert!(matches!(
        scroller.zoom_by(0.5, None, ViewChangeOptions::INSTANT),
        Err(ViewChangeError::NotImplemented(_))
    ));
    assert_eq!(scroller.on_pointer_wheel(WheelInput::vertical(-120)), None);
}

#[test]
fn disabled_animations_dispatch_instantly() {
    let mut config = ScrollerConfig::default();
    config.animation.animations_enabled = false;
    let mut scroller = loaded_scroller_with(config);
    scroller
        .scroll_to(100.0, 0.0, ViewChangeOptions::ANIMATED)
        .unwrap();
    tick_n(&mut scroller, 3);
    assert_eq!(
        scroller.engine().issued().last().map(|(_, c)| c.clone()),
        Some(EngineCommand::MoveTo(Vec2::new(100.0, 0.0)))
    );
}
