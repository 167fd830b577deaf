#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use glide_core::{Axis, CorrelationId, Vec2, ViewChangeOptions, WheelInput};
use glide_harness::{completions, loaded_scroller, run_until_idle};
use glide_runtime::{EngineNotification, ScrollControllerRequest, ZoomMode};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    ScrollTo { x: i16, y: i16, animated: bool },
    ScrollBy { dx: i16, dy: i16 },
    ScrollWith { vx: i16, vy: i16 },
    ZoomBy { delta: i8, animated: bool },
    Proxy { vertical: bool, delta: i16 },
    Wheel { notches: i8, ctrl: bool },
    Tick(u8),
    Settle,
    Interact,
    Reload,
}

fn options(animated: bool) -> ViewChangeOptions {
    if animated {
        ViewChangeOptions::ANIMATED
    } else {
        ViewChangeOptions::INSTANT
    }
}

fuzz_target!(|steps: Vec<Step>| {
    let mut scroller = loaded_scroller();
    scroller.set_zoom_mode(ZoomMode::Enabled);
    let mut issued: Vec<CorrelationId> = Vec::new();
    let mut events = Vec::new();

    for step in steps.iter().take(64) {
        let id = match *step {
            Step::ScrollTo { x, y, animated } => scroller
                .scroll_to(f64::from(x), f64::from(y), options(animated))
                .ok()
                .flatten(),
            Step::ScrollBy { dx, dy } => scroller
                .scroll_by(f64::from(dx), f64::from(dy), ViewChangeOptions::INSTANT)
                .ok()
                .flatten(),
            Step::ScrollWith { vx, vy } => scroller
                .scroll_with(Vec2::new(f64::from(vx), f64::from(vy)))
                .ok()
                .flatten(),
            Step::ZoomBy { delta, animated } => scroller
                .zoom_by(f64::from(delta) / 10.0, None, options(animated))
                .ok()
                .flatten(),
            Step::Proxy { vertical, delta } => {
                let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
                scroller
                    .on_scroll_controller_request(
                        axis,
                        ScrollControllerRequest::ScrollBy {
                            delta: f64::from(delta),
                            options: ViewChangeOptions::INSTANT,
                        },
                    )
                    .ok()
                    .flatten()
            }
            Step::Wheel { notches, ctrl } => {
                let delta = i32::from(notches) * 120;
                let input = if ctrl {
                    WheelInput::zoom(delta, Vec2::new(10.0, 10.0))
                } else {
                    WheelInput::vertical(delta)
                };
                scroller.on_pointer_wheel(input)
            }
            Step::Tick(n) => {
                for _ in 0..n % 16 {
                    scroller.on_tick();
                }
                None
            }
            Step::Settle => {
                for request_id in scroller.engine_mut().take_unsettled() {
                    for notification in scroller.engine_mut().settle(request_id) {
                        scroller.on_engine_notification(notification);
                    }
                }
                None
            }
            Step::Interact => {
                scroller.on_engine_notification(EngineNotification::InteractingEntered {
                    request_id: None,
                });
                None
            }
            Step::Reload => {
                scroller.on_unloaded();
                scroller.on_loaded();
                None
            }
        };
        issued.extend(id);
        events.extend(scroller.drain_events());

        assert!(scroller.offsets().is_finite());
        assert!(scroller.zoom_factor().is_finite());
    }

    events.extend(run_until_idle(&mut scroller, 500));
    scroller.on_unloaded();
    events.extend(scroller.drain_events());

    let mut counts: HashMap<CorrelationId, usize> = HashMap::new();
    for (id, _) in completions(&events) {
        *counts.entry(id).or_default() += 1;
    }
    for id in issued {
        assert_eq!(counts.get(&id).copied(), Some(1), "{id} completed {:?} times", counts.get(&id));
    }
});
