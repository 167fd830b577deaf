#![forbid(unsafe_code)]

//! Glide public facade crate.
//!
//! Re-exports the request and snap-point types of `glide-core` and the
//! scroller of `glide-runtime` behind one dependency, with a prelude for
//! hosts wiring a [`Scroller`] to their engine.

// --- Core re-exports -------------------------------------------------------

pub use glide_core::snap::{
    ApplicableRange, InertiaModifier, SnapAxis, SnapPoint, SnapPointSet, SnapPointsAlignment,
};
pub use glide_core::{
    AnimationMode, Axis, CorrelationId, InputKinds, RequestId, Size, SnapPointError,
    SnapPointsMode, Vec2, ViewChangeError, ViewChangeOptions, WheelInput,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use glide_runtime::{
    EngineBounds, EngineNotification, InteractionEngine, InteractionState, PositionAnimation,
    ScaleAnimation, ScrollController, ScrollControllerRequest, ScrollMode, Scroller,
    ScrollerConfig, ScrollerEvent, ViewChangeResult, ZoomMode,
};

/// Result of a public view-change call.
pub type Result<T> = std::result::Result<T, ViewChangeError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Axis, CorrelationId, Result, SnapAxis, SnapPoint, Vec2, ViewChangeError, ViewChangeOptions,
        WheelInput,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        EngineNotification, InteractionEngine, Scroller, ScrollerConfig, ScrollerEvent,
        ViewChangeResult,
    };

    pub use crate::core;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use glide_core as core;
#[cfg(feature = "runtime")]
pub use glide_runtime as runtime;

#[cfg(all(test, feature = "runtime"))]
mod tests {
    use super::prelude::*;
    use crate::{EngineBounds, PositionAnimation, ScaleAnimation};
    use crate::{InertiaModifier, RequestId};

    #[derive(Default)]
    struct CountingEngine {
        next: i32,
    }

    impl CountingEngine {
        fn issue(&mut self) -> RequestId {
            self.next += 1;
            RequestId::new(self.next)
        }
    }

    impl InteractionEngine for CountingEngine {
        fn move_to(&mut self, _: Vec2) -> RequestId {
            self.issue()
        }
        fn move_by(&mut self, _: Vec2) -> RequestId {
            self.issue()
        }
        fn move_with_animation(&mut self, _: PositionAnimation) -> RequestId {
            self.issue()
        }
        fn move_with_additional_velocity(&mut self, _: Vec2) -> RequestId {
            self.issue()
        }
        fn scale_to(&mut self, _: f64, _: Vec2) -> RequestId {
            self.issue()
        }
        fn scale_with_animation(&mut self, _: ScaleAnimation, _: Vec2) -> RequestId {
            self.issue()
        }
        fn scale_with_additional_velocity(&mut self, _: f64, _: Vec2) -> RequestId {
            self.issue()
        }
        fn set_position_inertia_decay_rate(&mut self, _: Option<Vec2>) {}
        fn set_scale_inertia_decay_rate(&mut self, _: Option<f64>) {}
        fn set_bounds(&mut self, _: EngineBounds) {}
        fn set_inertia_modifiers(&mut self, _: SnapAxis, _: &[InertiaModifier], _: bool) {}
    }

    #[test]
    fn prelude_drives_a_scroller() -> Result<()> {
        let mut scroller = Scroller::new(CountingEngine::default(), ScrollerConfig::default());
        scroller.set_content(Some(crate::Size::new(800.0, 800.0)));
        scroller.set_viewport(crate::Size::new(200.0, 200.0));
        scroller.on_loaded();

        let id = scroller.scroll_to(50.0, 0.0, ViewChangeOptions::INSTANT)?;
        assert!(id.is_some());
        for _ in 0..3 {
            scroller.on_tick();
        }
        assert_eq!(scroller.engine().next, 1);
        scroller.on_engine_notification(EngineNotification::ValuesChanged {
            request_id: Some(RequestId::new(1)),
            position: Vec2::new(50.0, 0.0),
            zoom_factor: 1.0,
        });
        let completed = scroller
            .drain_events()
            .iter()
            .filter_map(ScrollerEvent::completion)
            .collect::<Vec<_>>();
        assert_eq!(completed, vec![(id.unwrap(), ViewChangeResult::Completed)]);
        Ok(())
    }
}
