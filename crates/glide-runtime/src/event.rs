#![forbid(unsafe_code)]

//! Outcomes and notifications raised by the scroller.

use glide_core::{CorrelationId, Vec2};

/// Terminal outcome of an accepted view-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewChangeResult {
    /// The view reached the requested state, or already was there.
    Completed,
    /// Superseded, unloaded, or the content was swapped.
    Interrupted,
    /// The engine declined the request.
    Ignored,
}

impl ViewChangeResult {
    /// Lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Ignored => "ignored",
        }
    }
}

/// What the engine is doing with the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// At rest.
    #[default]
    Idle,
    /// Driven by touch or pen manipulation.
    Interaction,
    /// Coasting after a throw, a manipulation, or added velocity.
    Inertia,
    /// Running an animation requested by the scroller.
    Animation,
}

/// Notification drained by the host with
/// [`Scroller::drain_events`](crate::Scroller::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollerEvent {
    /// An offsets request reached a terminal state.
    ScrollCompleted {
        correlation_id: CorrelationId,
        result: ViewChangeResult,
    },
    /// A zoom request reached a terminal state.
    ZoomCompleted {
        correlation_id: CorrelationId,
        result: ViewChangeResult,
    },
    /// Offsets or zoom factor changed.
    ViewChanged { offsets: Vec2, zoom_factor: f64 },
    /// The interaction state changed.
    StateChanged(InteractionState),
    /// The per-frame tick subscription was acquired or released.
    TickSubscriptionChanged { active: bool },
    /// Motion settled after a zoom change and the restart grace period
    /// elapsed; the host may re-rasterize content at this zoom factor.
    ZoomSettled { zoom_factor: f64 },
}

impl ScrollerEvent {
    /// Correlation id and result, for completion events.
    pub fn completion(&self) -> Option<(CorrelationId, ViewChangeResult)> {
        match *self {
            Self::ScrollCompleted {
                correlation_id,
                result,
            }
            | Self::ZoomCompleted {
                correlation_id,
                result,
            } => Some((correlation_id, result)),
            _ => None,
        }
    }
}
