#![forbid(unsafe_code)]

//! Proxy scroll controllers (scrollbars and similar).
//!
//! A controller drives one axis. It receives the axis's range and offset
//! through [`ScrollController::set_values`] and raises
//! [`ScrollControllerRequest`]s that the scroller routes through the same
//! queue as direct calls, tagged with the controller's proxy trigger.

use glide_core::{CorrelationId, ViewChangeOptions};

use crate::event::ViewChangeResult;

/// Whether an axis can be scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollMode {
    #[default]
    Enabled,
    Disabled,
    /// Enabled when content overflows the viewport.
    Auto,
}

/// Whether zooming is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoomMode {
    Enabled,
    #[default]
    Disabled,
}

/// A collaborator that mirrors and drives one axis.
pub trait ScrollController {
    /// Range, current offset, and viewport length of the axis.
    fn set_values(&mut self, min_offset: f64, max_offset: f64, offset: f64, viewport_length: f64);

    /// Scroll mode of the axis.
    fn set_scroll_mode(&mut self, mode: ScrollMode);

    /// A request this controller issued (possibly coalesced with the other
    /// controller's) reached a terminal state.
    fn on_scroll_completed(&mut self, correlation_id: CorrelationId, result: ViewChangeResult);
}

/// Inbound request raised by a [`ScrollController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollControllerRequest {
    /// Move the controller's axis to `offset`.
    ScrollTo {
        offset: f64,
        options: ViewChangeOptions,
    },
    /// Move the controller's axis by `delta`.
    ScrollBy {
        delta: f64,
        options: ViewChangeOptions,
    },
    /// Add velocity on the controller's axis.
    ScrollFrom {
        velocity: f64,
        inertia_decay_rate: Option<f64>,
    },
    /// Hand a pointer to the engine for manipulation.
    Interaction { pointer_id: u32 },
}
