#![forbid(unsafe_code)]

//! Deterministic engine that records commands.
//!
//! Request ids start at 1 and increase with every motion command. Nothing
//! moves until the test calls [`RecordingEngine::settle`], which resolves a
//! command to its resting view and returns the notifications a real engine
//! would raise for it:
//!
//! | command                    | notifications                                   |
//! |----------------------------|-------------------------------------------------|
//! | instant, value unchanged   | none                                            |
//! | instant                    | `ValuesChanged(id)`                             |
//! | animation                  | `AnimationEntered`, `ValuesChanged`, `IdleEntered(id)` |
//! | additional velocity        | `InertiaEntered`, `ValuesChanged`, `IdleEntered(id)`   |
//!
//! Resting values honor the bounds and the exported inertia modifiers, so
//! snap points behave as they would on a real engine.

use glide_core::geometry::clamp;
use glide_core::snap::{InertiaModifier, SnapAxis, apply_inertia_modifiers};
use glide_core::{Axis, RequestId, Vec2};
use glide_runtime::{
    EngineBounds, EngineNotification, InteractionEngine, PositionAnimation, ScaleAnimation,
    inertia_travel,
};
use serde_json::json;

/// Default inertia decay rate of the simulated engine.
const DEFAULT_DECAY_RATE: f64 = 0.95;

/// One call received by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    MoveTo(Vec2),
    MoveBy(Vec2),
    MoveWithAnimation(PositionAnimation),
    MoveWithAdditionalVelocity(Vec2),
    ScaleTo { zoom_factor: f64, center: Vec2 },
    ScaleWithAnimation { animation: ScaleAnimation, center: Vec2 },
    ScaleWithAdditionalVelocity { velocity: f64, center: Vec2 },
    SetPositionInertiaDecayRate(Option<Vec2>),
    SetScaleInertiaDecayRate(Option<f64>),
    SetBounds(EngineBounds),
    SetInertiaModifiers {
        axis: SnapAxis,
        modifiers: Vec<InertiaModifier>,
        from_impulse: bool,
    },
    RedirectPointer(u32),
}

impl EngineCommand {
    /// Whether the command returned a request id.
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Self::MoveTo(_)
                | Self::MoveBy(_)
                | Self::MoveWithAnimation(_)
                | Self::MoveWithAdditionalVelocity(_)
                | Self::ScaleTo { .. }
                | Self::ScaleWithAnimation { .. }
                | Self::ScaleWithAdditionalVelocity { .. }
        )
    }

    /// Short name, used in transcripts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveTo(_) => "move_to",
            Self::MoveBy(_) => "move_by",
            Self::MoveWithAnimation(_) => "move_with_animation",
            Self::MoveWithAdditionalVelocity(_) => "move_with_additional_velocity",
            Self::ScaleTo { .. } => "scale_to",
            Self::ScaleWithAnimation { .. } => "scale_with_animation",
            Self::ScaleWithAdditionalVelocity { .. } => "scale_with_additional_velocity",
            Self::SetPositionInertiaDecayRate(_) => "set_position_inertia_decay_rate",
            Self::SetScaleInertiaDecayRate(_) => "set_scale_inertia_decay_rate",
            Self::SetBounds(_) => "set_bounds",
            Self::SetInertiaModifiers { .. } => "set_inertia_modifiers",
            Self::RedirectPointer(_) => "redirect_pointer",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordingEngine {
    next_request_id: i32,
    commands: Vec<EngineCommand>,
    issued: Vec<(RequestId, EngineCommand)>,
    unsettled: Vec<RequestId>,
    position: Vec2,
    zoom_factor: f64,
    bounds: EngineBounds,
    position_decay: Option<Vec2>,
    scale_decay: Option<f64>,
    modifiers: [(Vec<InertiaModifier>, bool); 3],
    accept_redirect: bool,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_request_id: 0,
            commands: Vec::new(),
            issued: Vec::new(),
            unsettled: Vec::new(),
            position: Vec2::ZERO,
            zoom_factor: 1.0,
            bounds: EngineBounds {
                min_position: Vec2::ZERO,
                max_position: Vec2::splat(f64::INFINITY),
                min_zoom_factor: 0.0,
                max_zoom_factor: f64::INFINITY,
            },
            position_decay: None,
            scale_decay: None,
            modifiers: Default::default(),
            accept_redirect: false,
        }
    }

    /// Make [`InteractionEngine::try_redirect_for_manipulation`] succeed.
    #[must_use]
    pub fn accepting_redirects(mut self) -> Self {
        self.accept_redirect = true;
        self
    }

    /// Every call, in order.
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Motion commands with the request ids they returned.
    pub fn issued(&self) -> &[(RequestId, EngineCommand)] {
        &self.issued
    }

    pub fn motion_count(&self) -> usize {
        self.issued.len()
    }

    pub fn last_request_id(&self) -> Option<RequestId> {
        self.issued.last().map(|(id, _)| *id)
    }

    pub fn command_for(&self, request_id: RequestId) -> Option<&EngineCommand> {
        self.issued
            .iter()
            .find(|(id, _)| *id == request_id)
            .map(|(_, command)| command)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn bounds(&self) -> EngineBounds {
        self.bounds
    }

    pub fn position_inertia_decay_rate(&self) -> Option<Vec2> {
        self.position_decay
    }

    pub fn scale_inertia_decay_rate(&self) -> Option<f64> {
        self.scale_decay
    }

    /// Modifiers last exported for `axis` and whether they were marked as
    /// impulse-driven.
    pub fn inertia_modifiers(&self, axis: SnapAxis) -> (&[InertiaModifier], bool) {
        let (modifiers, from_impulse) = &self.modifiers[axis.index()];
        (modifiers, *from_impulse)
    }

    /// Motion commands not yet settled, oldest first.
    pub fn take_unsettled(&mut self) -> Vec<RequestId> {
        std::mem::take(&mut self.unsettled)
    }

    /// One JSON object per call, for failure transcripts.
    pub fn transcript(&self) -> String {
        self.commands
            .iter()
            .map(|command| json!({ "command": command.name() }).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn record(&mut self, command: EngineCommand) {
        self.commands.push(command);
    }

    fn issue(&mut self, command: EngineCommand) -> RequestId {
        self.next_request_id += 1;
        let request_id = RequestId::new(self.next_request_id);
        self.commands.push(command.clone());
        self.issued.push((request_id, command));
        self.unsettled.push(request_id);
        request_id
    }

    fn clamp_position(&self, position: Vec2) -> Vec2 {
        position.clamp(self.bounds.min_position, self.bounds.max_position)
    }

    fn clamp_zoom(&self, zoom_factor: f64) -> f64 {
        clamp(zoom_factor, self.bounds.min_zoom_factor, self.bounds.max_zoom_factor)
    }

    fn rest_on_modifiers(&self, axis: SnapAxis, natural: f64) -> f64 {
        let (modifiers, from_impulse) = &self.modifiers[axis.index()];
        apply_inertia_modifiers(modifiers, natural, *from_impulse)
    }

    /// Resolve `request_id` to its resting view and return the
    /// notifications it produces. Unknown ids produce nothing.
    pub fn settle(&mut self, request_id: RequestId) -> Vec<EngineNotification> {
        let Some(command) = self.command_for(request_id).cloned() else {
            return Vec::new();
        };
        let id = Some(request_id);
        let before = (self.position, self.zoom_factor);
        let mut notifications = Vec::new();
        match command {
            EngineCommand::MoveTo(target) => {
                self.position = self.clamp_position(target);
            }
            EngineCommand::MoveBy(delta) => {
                self.position = self.clamp_position(self.position + delta);
            }
            EngineCommand::ScaleTo { zoom_factor, .. } => {
                self.zoom_factor = self.clamp_zoom(zoom_factor);
            }
            EngineCommand::MoveWithAnimation(animation) => {
                notifications.push(EngineNotification::AnimationEntered { request_id: id });
                self.position = self.clamp_position(animation.to);
            }
            EngineCommand::ScaleWithAnimation { animation, .. } => {
                notifications.push(EngineNotification::AnimationEntered { request_id: id });
                self.zoom_factor = self.clamp_zoom(animation.to);
            }
            EngineCommand::MoveWithAdditionalVelocity(velocity) => {
                let decay = self.position_decay.unwrap_or(Vec2::splat(DEFAULT_DECAY_RATE));
                // A zero decay rate travels without bound and stops at the edge.
                let travel = Vec2::new(
                    inertia_travel(velocity.x, decay.x),
                    inertia_travel(velocity.y, decay.y),
                );
                let natural = self.clamp_position(self.position + travel);
                notifications.push(EngineNotification::InertiaEntered {
                    request_id: id,
                    velocity,
                    natural_resting_position: natural,
                    natural_resting_zoom_factor: self.zoom_factor,
                });
                let mut resting = natural;
                for axis in Axis::ALL {
                    resting.set(axis, self.rest_on_modifiers(SnapAxis::from(axis), natural.get(axis)));
                }
                self.position = self.clamp_position(resting);
            }
            EngineCommand::ScaleWithAdditionalVelocity { velocity, .. } => {
                let decay = self.scale_decay.unwrap_or(DEFAULT_DECAY_RATE);
                let natural = self.clamp_zoom(self.zoom_factor + inertia_travel(velocity, decay));
                notifications.push(EngineNotification::InertiaEntered {
                    request_id: id,
                    velocity: Vec2::ZERO,
                    natural_resting_position: self.position,
                    natural_resting_zoom_factor: natural,
                });
                self.zoom_factor = self.clamp_zoom(self.rest_on_modifiers(SnapAxis::Zoom, natural));
            }
            _ => return Vec::new(),
        }

        let moved = before != (self.position, self.zoom_factor);
        if notifications.is_empty() && !moved {
            tracing::trace!(target: "glide.harness", %request_id, "instant command left view unchanged");
            return Vec::new();
        }
        notifications.push(EngineNotification::ValuesChanged {
            request_id: id,
            position: self.position,
            zoom_factor: self.zoom_factor,
        });
        if !matches!(command, EngineCommand::MoveTo(_) | EngineCommand::MoveBy(_) | EngineCommand::ScaleTo { .. }) {
            notifications.push(EngineNotification::IdleEntered { request_id: id });
        }
        notifications
    }
}

impl InteractionEngine for RecordingEngine {
    fn move_to(&mut self, position: Vec2) -> RequestId {
        self.issue(EngineCommand::MoveTo(position))
    }

    fn move_by(&mut self, delta: Vec2) -> RequestId {
        self.issue(EngineCommand::MoveBy(delta))
    }

    fn move_with_animation(&mut self, animation: PositionAnimation) -> RequestId {
        self.issue(EngineCommand::MoveWithAnimation(animation))
    }

    fn move_with_additional_velocity(&mut self, velocity: Vec2) -> RequestId {
        self.issue(EngineCommand::MoveWithAdditionalVelocity(velocity))
    }

    fn scale_to(&mut self, zoom_factor: f64, center: Vec2) -> RequestId {
        self.issue(EngineCommand::ScaleTo { zoom_factor, center })
    }

    fn scale_with_animation(&mut self, animation: ScaleAnimation, center: Vec2) -> RequestId {
        self.issue(EngineCommand::ScaleWithAnimation { animation, center })
    }

    fn scale_with_additional_velocity(&mut self, velocity: f64, center: Vec2) -> RequestId {
        self.issue(EngineCommand::ScaleWithAdditionalVelocity { velocity, center })
    }

    fn set_position_inertia_decay_rate(&mut self, rate: Option<Vec2>) {
        self.position_decay = rate;
        self.record(EngineCommand::SetPositionInertiaDecayRate(rate));
    }

    fn set_scale_inertia_decay_rate(&mut self, rate: Option<f64>) {
        self.scale_decay = rate;
        self.record(EngineCommand::SetScaleInertiaDecayRate(rate));
    }

    fn set_bounds(&mut self, bounds: EngineBounds) {
        self.bounds = bounds;
        self.record(EngineCommand::SetBounds(bounds));
    }

    fn set_inertia_modifiers(&mut self, axis: SnapAxis, modifiers: &[InertiaModifier], from_impulse: bool) {
        self.modifiers[axis.index()] = (modifiers.to_vec(), from_impulse);
        self.record(EngineCommand::SetInertiaModifiers {
            axis,
            modifiers: modifiers.to_vec(),
            from_impulse,
        });
    }

    fn try_redirect_for_manipulation(&mut self, pointer_id: u32) -> bool {
        self.record(EngineCommand::RedirectPointer(pointer_id));
        self.accept_redirect
    }
}
