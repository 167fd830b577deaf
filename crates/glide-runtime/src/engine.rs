#![forbid(unsafe_code)]

//! Contract with the external interaction engine.
//!
//! The engine runs physics and animation on its own execution context. The
//! scroller talks to it through [`InteractionEngine`]: every motion command
//! returns a [`RequestId`] immediately, and the outcome arrives later as an
//! [`EngineNotification`] that the host marshals back onto the UI thread and
//! feeds to [`Scroller::on_engine_notification`](crate::Scroller::on_engine_notification).
//!
//! # Contract
//!
//! - Request ids increase with every command.
//! - A notification carrying request id `n` reflects the engine's latest
//!   outstanding command; every command `< n` has been superseded.
//! - The engine may stay silent for a command that does not change the
//!   view (moving to the current position, for instance).

use glide_core::snap::{InertiaModifier, SnapAxis};
use glide_core::{RequestId, Vec2};
use web_time::Duration;

/// Animated position change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAnimation {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: Duration,
}

/// Animated zoom factor change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleAnimation {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

/// Range the engine may move content within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineBounds {
    pub min_position: Vec2,
    pub max_position: Vec2,
    pub min_zoom_factor: f64,
    pub max_zoom_factor: f64,
}

/// Commands the scroller issues to the engine.
pub trait InteractionEngine {
    /// Jump to an absolute position.
    fn move_to(&mut self, position: Vec2) -> RequestId;

    /// Jump by a delta from the current position.
    fn move_by(&mut self, delta: Vec2) -> RequestId;

    /// Animate to a position.
    fn move_with_animation(&mut self, animation: PositionAnimation) -> RequestId;

    /// Add velocity, in pixels per second, to the current motion.
    fn move_with_additional_velocity(&mut self, velocity: Vec2) -> RequestId;

    /// Jump to a zoom factor, keeping `center` stationary.
    fn scale_to(&mut self, zoom_factor: f64, center: Vec2) -> RequestId;

    /// Animate to a zoom factor, keeping `center` stationary.
    fn scale_with_animation(&mut self, animation: ScaleAnimation, center: Vec2) -> RequestId;

    /// Add zoom velocity to the current motion.
    fn scale_with_additional_velocity(&mut self, velocity: f64, center: Vec2) -> RequestId;

    /// Override the position inertia decay rate, or restore the default.
    fn set_position_inertia_decay_rate(&mut self, rate: Option<Vec2>);

    /// Override the zoom inertia decay rate, or restore the default.
    fn set_scale_inertia_decay_rate(&mut self, rate: Option<f64>);

    /// Update the range content may move within.
    fn set_bounds(&mut self, bounds: EngineBounds);

    /// Replace the resting-value constraints for one axis.
    fn set_inertia_modifiers(
        &mut self,
        axis: SnapAxis,
        modifiers: &[InertiaModifier],
        from_impulse: bool,
    );

    /// Hand a pointer over to the engine for direct manipulation. Returns
    /// whether the engine took it.
    fn try_redirect_for_manipulation(&mut self, pointer_id: u32) -> bool {
        let _ = pointer_id;
        false
    }
}

/// State reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineNotification {
    /// Position or zoom factor changed.
    ValuesChanged {
        request_id: Option<RequestId>,
        position: Vec2,
        zoom_factor: f64,
    },
    /// Motion settled.
    IdleEntered { request_id: Option<RequestId> },
    /// Direct manipulation began.
    InteractingEntered { request_id: Option<RequestId> },
    /// Free-running inertia began.
    InertiaEntered {
        request_id: Option<RequestId>,
        /// Initial position velocity.
        velocity: Vec2,
        natural_resting_position: Vec2,
        natural_resting_zoom_factor: f64,
    },
    /// A scroller-requested animation began.
    AnimationEntered { request_id: Option<RequestId> },
    /// The engine declined a command.
    RequestIgnored { request_id: RequestId },
}

impl EngineNotification {
    /// Request id carried by the notification.
    pub const fn request_id(&self) -> Option<RequestId> {
        match *self {
            Self::ValuesChanged { request_id, .. }
            | Self::IdleEntered { request_id }
            | Self::InteractingEntered { request_id }
            | Self::InertiaEntered { request_id, .. }
            | Self::AnimationEntered { request_id } => request_id,
            Self::RequestIgnored { request_id } => Some(request_id),
        }
    }

    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ValuesChanged { .. } => "values_changed",
            Self::IdleEntered { .. } => "idle_entered",
            Self::InteractingEntered { .. } => "interacting_entered",
            Self::InertiaEntered { .. } => "inertia_entered",
            Self::AnimationEntered { .. } => "animation_entered",
            Self::RequestIgnored { .. } => "request_ignored",
        }
    }
}
