#![no_main]

use arbitrary::Arbitrary;
use glide_core::snap::{SnapPoint, SnapPointSet, SnapPointsAlignment};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Declared {
    Irregular { value: i16, range: Option<u8>, alignment: u8 },
    Repeated { offset: i16, interval: u8, start: i16, end: i16, range: Option<u8> },
}

#[derive(Debug, Arbitrary)]
struct Input {
    viewport: u16,
    points: Vec<Declared>,
    probes: Vec<i16>,
}

fn alignment(tag: u8) -> SnapPointsAlignment {
    match tag % 3 {
        0 => SnapPointsAlignment::Near,
        1 => SnapPointsAlignment::Center,
        _ => SnapPointsAlignment::Far,
    }
}

fn build(declared: &Declared) -> Option<SnapPoint> {
    let (point, range) = match *declared {
        Declared::Irregular { value, range, alignment: tag } => (
            SnapPoint::irregular(f64::from(value)).aligned(alignment(tag)),
            range,
        ),
        Declared::Repeated { offset, interval, start, end, range } => (
            SnapPoint::repeated(
                f64::from(offset),
                f64::from(interval),
                f64::from(start),
                f64::from(end),
            )
            .ok()?,
            range,
        ),
    };
    Some(match range {
        Some(range) => point.optional(f64::from(range)),
        None => point,
    })
}

fuzz_target!(|input: Input| {
    let points: Vec<SnapPoint> = input.points.iter().take(32).filter_map(build).collect();
    let viewport = f64::from(input.viewport);
    // Invalid declarations are reported, never a panic.
    let Ok(mut set) = SnapPointSet::consolidate(&points, viewport) else {
        return;
    };
    assert!(set.len() <= points.len());

    for &probe in input.probes.iter().take(16) {
        let value = f64::from(probe);
        let snapped = set.value_after_snap_points(value);
        assert!(snapped.is_finite(), "{value} snapped to {snapped}");

        if set.update_ignored_value(Some(value)).is_err() {
            return;
        }
        for modifier in set.inertia_modifiers() {
            if let Some(resting) = modifier.resting_value(value, true) {
                assert!(resting.is_finite());
            }
        }
    }
    let _ = set.update_ignored_value(None);
    assert!(set.wrappers().iter().all(|w| w.ignored_value().is_none()));
});
