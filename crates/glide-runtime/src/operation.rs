#![forbid(unsafe_code)]

//! One queued or in-flight view change.
//!
//! An [`AsyncOperation`] owns exactly one [`ViewChangeRequest`] together
//! with the bookkeeping needed to get it to the engine and back: which
//! engine command to issue, who asked, how many ticks to wait, and the ids
//! correlating it with the caller and with the engine.
//!
//! # State machine
//!
//! ```text
//! Delayed ──load──► Queued ──tick──► Unqueueing ──tick──► Dispatched
//!                     │                  │                    │
//!                     └─── cancel ───────┴────► Canceled      └──► Completed
//! ```
//!
//! - **Delayed**: created while the scroller is not loaded.
//! - **Queued**: counting down `pre_ticks`, countdown not started.
//! - **Unqueueing**: countdown started. Coalescing no longer folds new
//!   requests into it.
//! - **Dispatched**: `request_id` assigned by the engine.
//!
//! # Invariants
//!
//! 1. `request_id` is assigned at most once, by dispatch, and only
//!    reassigned by the constant-velocity correction.
//! 2. A canceled operation is never dispatched.
//! 3. `post_ticks` is only armed for non-animated operations.

use glide_core::{CorrelationId, OperationTrigger, RequestId, ViewChangeRequest};

use crate::event::ViewChangeResult;

/// Engine command an operation turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    MoveToAbsolute,
    MoveByDelta,
    MoveWithAnimation,
    MoveWithVelocity,
    MoveWithAdditionalVelocity,
    ScaleToAbsolute,
    ScaleWithAnimation,
    ScaleWithAdditionalVelocity,
}

impl OperationType {
    /// Whether the engine reports the outcome through state notifications
    /// rather than a single value change.
    #[inline]
    pub const fn is_animated(self) -> bool {
        !matches!(
            self,
            Self::MoveToAbsolute | Self::MoveByDelta | Self::ScaleToAbsolute
        )
    }

    /// Whether this command changes offsets.
    #[inline]
    pub const fn is_offsets(self) -> bool {
        matches!(
            self,
            Self::MoveToAbsolute
                | Self::MoveByDelta
                | Self::MoveWithAnimation
                | Self::MoveWithVelocity
                | Self::MoveWithAdditionalVelocity
        )
    }

    /// Whether this command adds velocity, overriding the inertia decay
    /// rate for its duration.
    #[inline]
    pub const fn is_velocity(self) -> bool {
        matches!(
            self,
            Self::MoveWithVelocity | Self::MoveWithAdditionalVelocity | Self::ScaleWithAdditionalVelocity
        )
    }

    /// Name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoveToAbsolute => "move_to_absolute",
            Self::MoveByDelta => "move_by_delta",
            Self::MoveWithAnimation => "move_with_animation",
            Self::MoveWithVelocity => "move_with_velocity",
            Self::MoveWithAdditionalVelocity => "move_with_additional_velocity",
            Self::ScaleToAbsolute => "scale_to_absolute",
            Self::ScaleWithAnimation => "scale_with_animation",
            Self::ScaleWithAdditionalVelocity => "scale_with_additional_velocity",
        }
    }
}

/// Stable handle to a queued operation.
///
/// Keys are never reused, so a key whose operation has left the queue simply
/// stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey(pub(crate) u64);

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationState {
    Delayed,
    Queued,
    Unqueueing,
    Dispatched,
    Canceled,
    Completed,
}

/// One queued or in-flight view change.
#[derive(Debug, Clone)]
pub struct AsyncOperation {
    pub(crate) key: OperationKey,
    operation_type: OperationType,
    trigger: OperationTrigger,
    request: ViewChangeRequest,
    correlation_id: CorrelationId,
    request_id: Option<RequestId>,
    is_delayed: bool,
    cancel_result: Option<ViewChangeResult>,
    is_completed: bool,
    queued_ticks: u8,
    pre_ticks: u8,
    post_ticks: u8,
    required_operation: Option<OperationKey>,
}

impl AsyncOperation {
    /// Create a queued operation. The key is assigned by the queue.
    #[must_use]
    pub fn new(
        operation_type: OperationType,
        trigger: OperationTrigger,
        request: ViewChangeRequest,
        correlation_id: CorrelationId,
        pre_ticks: u8,
    ) -> Self {
        let pre_ticks = pre_ticks.max(1);
        Self {
            key: OperationKey(0),
            operation_type,
            trigger,
            request,
            correlation_id,
            request_id: None,
            is_delayed: false,
            cancel_result: None,
            is_completed: false,
            queued_ticks: pre_ticks,
            pre_ticks,
            post_ticks: 0,
            required_operation: None,
        }
    }

    #[inline]
    pub fn key(&self) -> OperationKey {
        self.key
    }

    #[inline]
    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.operation_type.is_animated()
    }

    #[inline]
    pub fn trigger(&self) -> OperationTrigger {
        self.trigger
    }

    /// Add a trigger flag after coalescing another origin's request.
    pub fn add_trigger(&mut self, trigger: OperationTrigger) {
        self.trigger |= trigger;
    }

    #[inline]
    pub fn request(&self) -> &ViewChangeRequest {
        &self.request
    }

    /// Mutable request, for coalescing into a not-yet-dispatched operation.
    #[inline]
    pub fn request_mut(&mut self) -> &mut ViewChangeRequest {
        &mut self.request
    }

    #[inline]
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    #[inline]
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    /// Record the engine id of the command issued for this operation.
    pub(crate) fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = Some(request_id);
    }

    #[inline]
    pub fn is_delayed(&self) -> bool {
        self.is_delayed
    }

    pub(crate) fn set_delayed(&mut self, delayed: bool) {
        self.is_delayed = delayed;
    }

    #[inline]
    pub fn is_canceled(&self) -> bool {
        self.cancel_result.is_some()
    }

    /// Result raised when the next scan evicts a canceled operation.
    #[inline]
    pub fn cancel_result(&self) -> Option<ViewChangeResult> {
        self.cancel_result
    }

    /// Flag for eviction on the next scan. Has no effect once dispatched.
    pub fn cancel(&mut self, result: ViewChangeResult) {
        if self.request_id.is_none() && self.cancel_result.is_none() {
            self.cancel_result = Some(result);
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub(crate) fn mark_completed(&mut self) {
        self.is_completed = true;
    }

    /// Still waiting for dispatch.
    #[inline]
    pub fn is_queued(&self) -> bool {
        self.request_id.is_none() && self.pre_ticks > 0
    }

    /// Countdown started but not yet dispatched: at least one tick has
    /// been spent from `pre_ticks`. No longer eligible for coalescing.
    #[inline]
    pub fn is_unqueueing(&self) -> bool {
        self.is_queued() && self.pre_ticks < self.queued_ticks
    }

    #[inline]
    pub fn is_dispatched(&self) -> bool {
        self.request_id.is_some()
    }

    pub fn state(&self) -> OperationState {
        if self.is_completed {
            OperationState::Completed
        } else if self.is_canceled() {
            OperationState::Canceled
        } else if self.is_delayed {
            OperationState::Delayed
        } else if self.is_dispatched() {
            OperationState::Dispatched
        } else if self.is_unqueueing() {
            OperationState::Unqueueing
        } else {
            OperationState::Queued
        }
    }

    #[inline]
    pub fn pre_ticks(&self) -> u8 {
        self.pre_ticks
    }

    /// Decrement the dispatch countdown. Returns true when it reaches zero.
    pub(crate) fn tick_queued(&mut self) -> bool {
        self.pre_ticks = self.pre_ticks.saturating_sub(1);
        self.pre_ticks == 0
    }

    #[inline]
    pub fn post_ticks(&self) -> u8 {
        self.post_ticks
    }

    pub(crate) fn arm_post_ticks(&mut self, ticks: u8) {
        self.post_ticks = ticks.max(1);
    }

    /// Decrement the completion fallback. Returns true when it reaches zero.
    pub(crate) fn tick_non_animated(&mut self) -> bool {
        self.post_ticks = self.post_ticks.saturating_sub(1);
        self.post_ticks == 0
    }

    #[inline]
    pub fn required_operation(&self) -> Option<OperationKey> {
        self.required_operation
    }

    pub(crate) fn set_required_operation(&mut self, key: Option<OperationKey>) {
        self.required_operation = key;
    }
}
