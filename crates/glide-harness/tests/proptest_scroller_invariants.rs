#![forbid(unsafe_code)]

//! Property-based invariant tests for the scroller's request lifecycle.
//!
//! 1. Every accepted request completes exactly once, whatever the engine
//!    and the host do in between.
//! 2. No completion is raised for an id that was never handed out.
//! 3. Fresh correlation ids increase; coalesced requests reuse an earlier
//!    id.
//! 4. Direct calls reach the engine once each, in issuance order.
//!
//! Run:
//!   cargo test -p glide-harness --test proptest_scroller_invariants

use std::collections::HashMap;

use glide_core::{Axis, CorrelationId, Vec2, ViewChangeOptions, WheelInput};
use glide_harness::{EngineCommand, RecordingEngine, completions, loaded_scroller, run_until_idle};
use glide_runtime::{EngineNotification, ScrollControllerRequest, Scroller, ZoomMode};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Action {
    ScrollTo { x: f64, y: f64, animated: bool },
    ScrollBy { dx: f64, dy: f64 },
    ScrollWith { vx: f64, vy: f64 },
    ScrollFrom { vy: f64 },
    ZoomTo { zoom_factor: f64, animated: bool },
    ProxyBy { vertical: bool, delta: f64 },
    Wheel { delta: i32, ctrl: bool },
    Tick(usize),
    SettleAll,
    Interact,
    IgnoreLatest,
    Reload,
}

fn options(animated: bool) -> ViewChangeOptions {
    if animated {
        ViewChangeOptions::ANIMATED
    } else {
        ViewChangeOptions::INSTANT
    }
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (-100.0f64..900.0, -100.0f64..900.0, any::<bool>())
            .prop_map(|(x, y, animated)| Action::ScrollTo { x, y, animated }),
        (-300.0f64..300.0, -300.0f64..300.0).prop_map(|(dx, dy)| Action::ScrollBy { dx, dy }),
        (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(vx, vy)| Action::ScrollWith { vx, vy }),
        (-2000.0f64..2000.0).prop_map(|vy| Action::ScrollFrom { vy }),
        (0.2f64..5.0, any::<bool>())
            .prop_map(|(zoom_factor, animated)| Action::ZoomTo { zoom_factor, animated }),
        (any::<bool>(), -200.0f64..200.0).prop_map(|(vertical, delta)| Action::ProxyBy { vertical, delta }),
        (prop_oneof![Just(-240), Just(-120), Just(120), Just(240)], any::<bool>())
            .prop_map(|(delta, ctrl)| Action::Wheel { delta, ctrl }),
        (1usize..6).prop_map(Action::Tick),
        Just(Action::SettleAll),
        Just(Action::Interact),
        Just(Action::IgnoreLatest),
        Just(Action::Reload),
    ]
}

fn script_strategy() -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(action_strategy(), 1..40)
}

// ── Driver ────────────────────────────────────────────────────────────────

fn settle_all(scroller: &mut Scroller<RecordingEngine>) {
    for request_id in scroller.engine_mut().take_unsettled() {
        for notification in scroller.engine_mut().settle(request_id) {
            scroller.on_engine_notification(notification);
        }
    }
}

/// Apply `action`, returning the correlation id it produced, if any.
fn apply(scroller: &mut Scroller<RecordingEngine>, action: &Action) -> Option<CorrelationId> {
    match *action {
        Action::ScrollTo { x, y, animated } => scroller.scroll_to(x, y, options(animated)).ok().flatten(),
        Action::ScrollBy { dx, dy } => scroller
            .scroll_by(dx, dy, ViewChangeOptions::INSTANT)
            .ok()
            .flatten(),
        Action::ScrollWith { vx, vy } => scroller.scroll_with(Vec2::new(vx, vy)).ok().flatten(),
        Action::ScrollFrom { vy } => scroller
            .scroll_from(Vec2::new(0.0, vy), None)
            .ok()
            .flatten(),
        Action::ZoomTo { zoom_factor, animated } => scroller
            .zoom_to(zoom_factor, None, options(animated))
            .ok()
            .flatten(),
        Action::ProxyBy { vertical, delta } => {
            let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
            scroller
                .on_scroll_controller_request(
                    axis,
                    ScrollControllerRequest::ScrollBy {
                        delta,
                        options: ViewChangeOptions::INSTANT,
                    },
                )
                .ok()
                .flatten()
        }
        Action::Wheel { delta, ctrl } => {
            let input = if ctrl {
                WheelInput::zoom(delta, Vec2::new(40.0, 40.0))
            } else {
                WheelInput::vertical(delta)
            };
            scroller.on_pointer_wheel(input)
        }
        Action::Tick(n) => {
            for _ in 0..n {
                scroller.on_tick();
            }
            None
        }
        Action::SettleAll => {
            settle_all(scroller);
            None
        }
        Action::Interact => {
            scroller.on_engine_notification(EngineNotification::InteractingEntered { request_id: None });
            None
        }
        Action::IgnoreLatest => {
            if let Some(request_id) = scroller.engine().last_request_id() {
                scroller.on_engine_notification(EngineNotification::RequestIgnored { request_id });
            }
            None
        }
        Action::Reload => {
            scroller.on_unloaded();
            scroller.on_loaded();
            None
        }
    }
}

fn scripted_scroller() -> Scroller<RecordingEngine> {
    let mut scroller = loaded_scroller();
    scroller.set_zoom_mode(ZoomMode::Enabled);
    scroller
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Exactly-once completion
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_request_completes_exactly_once(script in script_strategy()) {
        let mut scroller = scripted_scroller();
        let mut issued = Vec::new();
        let mut events = Vec::new();
        for action in &script {
            issued.extend(apply(&mut scroller, action));
            events.extend(scroller.drain_events());
        }
        events.extend(run_until_idle(&mut scroller, 200));
        scroller.on_unloaded();
        events.extend(scroller.drain_events());

        let mut counts: HashMap<CorrelationId, usize> = HashMap::new();
        for (id, _) in completions(&events) {
            prop_assert!(issued.contains(&id), "completion for unknown id {id}");
            *counts.entry(id).or_default() += 1;
        }
        for id in &issued {
            prop_assert_eq!(counts.get(id).copied(), Some(1), "id {} completions", id);
        }
        prop_assert!(scroller.queue().is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Monotonic correlation ids
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fresh_ids_increase(script in script_strategy()) {
        let mut scroller = scripted_scroller();
        let mut highest: Option<CorrelationId> = None;
        let mut seen = Vec::new();
        for action in &script {
            let Some(id) = apply(&mut scroller, action) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            prop_assert!(highest.is_none_or(|h| id > h), "id {id} after {highest:?}");
            highest = Some(id);
            seen.push(id);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Dispatch order follows issuance order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn direct_calls_dispatch_in_order(
        steps in proptest::collection::vec((any::<bool>(), 0usize..4), 1..20),
    ) {
        let mut scroller = loaded_scroller();
        for (index, (animated, ticks)) in steps.iter().enumerate() {
            let target = 10.0 * (index as f64 + 1.0);
            scroller.scroll_to(target, 0.0, options(*animated)).unwrap();
            for _ in 0..*ticks {
                scroller.on_tick();
            }
        }
        for _ in 0..10 {
            scroller.on_tick();
        }

        let targets: Vec<f64> = scroller
            .engine()
            .issued()
            .iter()
            .filter_map(|(_, command)| match command {
                EngineCommand::MoveTo(position) => Some(position.x),
                EngineCommand::MoveWithAnimation(animation) => Some(animation.to.x),
                _ => None,
            })
            .collect();
        prop_assert_eq!(targets.len(), steps.len());
        prop_assert!(targets.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", targets);
    }
}
