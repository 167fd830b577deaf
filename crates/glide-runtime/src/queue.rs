#![forbid(unsafe_code)]

//! Ordered collection of [`AsyncOperation`]s.
//!
//! The queue owns every operation from issuance until it reaches a terminal
//! state. It never talks to the engine: the scroller drives ticks and
//! dispatch, and asks the queue to resolve operations when notifications
//! arrive.
//!
//! # Iteration discipline
//!
//! Scans that may remove operations first snapshot the keys, then look each
//! key up again before touching it. An operation evicted as a side effect
//! of handling an earlier one is skipped instead of invalidating the scan.
//!
//! # Invariants
//!
//! 1. Operations are stored in issuance order.
//! 2. Terminal operations are removed immediately and returned to the
//!    caller, which raises exactly one completion for each.

use glide_core::{OperationTrigger, RequestId, ViewChangeOptions, ViewKind};

use crate::event::ViewChangeResult;
use crate::operation::{AsyncOperation, OperationKey, OperationType};

/// Which operations a notification names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    /// Every queued or dispatched operation matches.
    All,
    /// Every dispatched operation matches.
    Dispatched,
    /// Manipulation began: every dispatched operation and every animated
    /// operation still waiting for dispatch match. Pending instant commands
    /// stay queued.
    Manipulation,
    /// The operation dispatched with this id matches; dispatched
    /// operations with smaller ids are "prior".
    Request(RequestId),
}

/// Results applied to matching and prior operations. `None` leaves the
/// operation in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRule {
    pub matched_non_animated: Option<ViewChangeResult>,
    pub matched_animated: Option<ViewChangeResult>,
    pub prior_non_animated: Option<ViewChangeResult>,
    pub prior_animated: Option<ViewChangeResult>,
}

impl CompletionRule {
    /// Motion settled: the named request completed, earlier instant
    /// commands were absorbed, earlier animations were cut short.
    pub const SETTLED: Self = Self {
        matched_non_animated: Some(ViewChangeResult::Completed),
        matched_animated: Some(ViewChangeResult::Completed),
        prior_non_animated: Some(ViewChangeResult::Completed),
        prior_animated: Some(ViewChangeResult::Interrupted),
    };

    /// A value change for an instant command; animations keep running.
    pub const VALUES_CHANGED: Self = Self {
        matched_non_animated: Some(ViewChangeResult::Completed),
        matched_animated: None,
        prior_non_animated: Some(ViewChangeResult::Completed),
        prior_animated: Some(ViewChangeResult::Interrupted),
    };

    /// Everything matched is interrupted.
    pub const INTERRUPTED: Self = Self::uniform(ViewChangeResult::Interrupted);

    /// The named request was declined; nothing else is touched.
    pub const IGNORED: Self = Self {
        matched_non_animated: Some(ViewChangeResult::Ignored),
        matched_animated: Some(ViewChangeResult::Ignored),
        prior_non_animated: None,
        prior_animated: None,
    };

    const fn uniform(result: ViewChangeResult) -> Self {
        Self {
            matched_non_animated: Some(result),
            matched_animated: Some(result),
            prior_non_animated: Some(result),
            prior_animated: Some(result),
        }
    }

    fn result_for(&self, operation: &AsyncOperation, scope: RequestScope) -> Option<ViewChangeResult> {
        let (matched, prior) = match scope {
            RequestScope::All => (true, false),
            RequestScope::Dispatched => (operation.is_dispatched(), false),
            RequestScope::Manipulation => {
                (operation.is_dispatched() || operation.is_animated(), false)
            }
            RequestScope::Request(id) => (
                operation.request_id() == Some(id),
                operation.request_id().is_some_and(|r| r < id),
            ),
        };
        match (matched, prior, operation.is_animated()) {
            (true, _, false) => self.matched_non_animated,
            (true, _, true) => self.matched_animated,
            (false, true, false) => self.prior_non_animated,
            (false, true, true) => self.prior_animated,
            (false, false, _) => None,
        }
    }
}

/// An operation that just left the queue, with its terminal result.
#[derive(Debug, Clone)]
pub struct Completion {
    pub operation: AsyncOperation,
    pub result: ViewChangeResult,
}

/// Ordered collection of [`AsyncOperation`]s.
#[derive(Debug, Default)]
pub struct OperationQueue {
    operations: Vec<AsyncOperation>,
    next_key: u64,
}

impl OperationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations in issuance order.
    pub fn iter(&self) -> impl Iterator<Item = &AsyncOperation> {
        self.operations.iter()
    }

    /// Keys in issuance order, for snapshot-then-advance scans.
    pub fn keys(&self) -> Vec<OperationKey> {
        self.operations.iter().map(AsyncOperation::key).collect()
    }

    pub fn get(&self, key: OperationKey) -> Option<&AsyncOperation> {
        self.operations.iter().find(|op| op.key == key)
    }

    pub fn get_mut(&mut self, key: OperationKey) -> Option<&mut AsyncOperation> {
        self.operations.iter_mut().find(|op| op.key == key)
    }

    /// Append an operation, assigning its key.
    pub fn push(&mut self, mut operation: AsyncOperation) -> OperationKey {
        self.next_key += 1;
        let key = OperationKey(self.next_key);
        operation.key = key;
        tracing::trace!(
            target: "glide.queue",
            correlation_id = %operation.correlation_id(),
            operation_type = operation.operation_type().as_str(),
            pre_ticks = operation.pre_ticks(),
            delayed = operation.is_delayed(),
            "operation queued"
        );
        self.operations.push(operation);
        key
    }

    /// Remove an operation without completing it.
    pub fn remove(&mut self, key: OperationKey) -> Option<AsyncOperation> {
        let index = self.operations.iter().position(|op| op.key == key)?;
        Some(self.operations.remove(index))
    }

    /// Remove an operation and pair it with its terminal result.
    pub fn complete(&mut self, key: OperationKey, result: ViewChangeResult) -> Option<Completion> {
        let mut operation = self.remove(key)?;
        operation.mark_completed();
        Some(Completion { operation, result })
    }

    /// Largest countdown among live operations still waiting for dispatch.
    pub fn max_pre_ticks(&self) -> u8 {
        self.operations
            .iter()
            .filter(|op| op.is_queued() && !op.is_canceled())
            .map(AsyncOperation::pre_ticks)
            .max()
            .unwrap_or(0)
    }

    /// Live operation from one of `trigger`'s origins, of `operation_type`
    /// with the same view kind and options, whose countdown has not
    /// started. New requests from those origins fold into it.
    pub fn find_coalescable(
        &mut self,
        trigger: OperationTrigger,
        operation_type: OperationType,
        view_kind: ViewKind,
        options: ViewChangeOptions,
    ) -> Option<&mut AsyncOperation> {
        self.operations.iter_mut().find(|op| {
            op.trigger().intersects(trigger)
                && op.operation_type() == operation_type
                && op.is_queued()
                && !op.is_unqueueing()
                && !op.is_canceled()
                && op.request().view_kind() == Some(view_kind)
                && op.request().options() == Some(options)
        })
    }

    /// Like [`find_coalescable`](Self::find_coalescable), for
    /// additional-velocity operations.
    pub fn find_additional_velocity(
        &mut self,
        trigger: OperationTrigger,
        offsets: bool,
    ) -> Option<&mut AsyncOperation> {
        let wanted = if offsets {
            OperationType::MoveWithAdditionalVelocity
        } else {
            OperationType::ScaleWithAdditionalVelocity
        };
        self.operations.iter_mut().find(|op| {
            op.trigger().intersects(trigger)
                && op.operation_type() == wanted
                && op.is_queued()
                && !op.is_unqueueing()
                && !op.is_canceled()
        })
    }

    /// Keys of constant-velocity operations still waiting for dispatch.
    pub fn pending_constant_velocity(&self) -> Vec<OperationKey> {
        self.operations
            .iter()
            .filter(|op| {
                op.operation_type() == OperationType::MoveWithVelocity
                    && op.is_queued()
                    && !op.is_canceled()
            })
            .map(AsyncOperation::key)
            .collect()
    }

    /// Most recent live non-animated operation issued before `key`.
    pub fn last_pending_non_animated_before(&self, key: OperationKey) -> Option<OperationKey> {
        self.operations
            .iter()
            .take_while(|op| op.key != key)
            .filter(|op| !op.is_animated() && !op.is_canceled())
            .map(AsyncOperation::key)
            .last()
    }

    /// Most recent live non-animated operation.
    pub fn last_pending_non_animated(&self) -> Option<OperationKey> {
        self.operations
            .iter()
            .rev()
            .find(|op| !op.is_animated() && !op.is_canceled())
            .map(AsyncOperation::key)
    }

    pub fn find_by_request_id(&mut self, request_id: RequestId) -> Option<&mut AsyncOperation> {
        self.operations
            .iter_mut()
            .find(|op| op.request_id() == Some(request_id))
    }

    /// Remove every delayed operation with `result`.
    pub fn take_delayed(&mut self, result: ViewChangeResult) -> Vec<Completion> {
        let keys: Vec<_> = self
            .operations
            .iter()
            .filter(|op| op.is_delayed())
            .map(AsyncOperation::key)
            .collect();
        keys.into_iter()
            .filter_map(|key| self.complete(key, result))
            .collect()
    }

    /// Remove every operation `rule` resolves for `scope`.
    pub fn take_resolved(&mut self, scope: RequestScope, rule: CompletionRule) -> Vec<Completion> {
        let mut completions = Vec::new();
        for key in self.keys() {
            let Some(result) = self.get(key).and_then(|op| rule.result_for(op, scope)) else {
                continue;
            };
            if let Some(completion) = self.complete(key, result) {
                completions.push(completion);
            }
        }
        completions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{CorrelationId, OffsetsChange, Vec2, ViewChangeRequest};

    fn offsets_op(operation_type: OperationType, trigger: OperationTrigger, id: i32) -> AsyncOperation {
        AsyncOperation::new(
            operation_type,
            trigger,
            ViewChangeRequest::Offsets(OffsetsChange {
                offsets: Vec2::new(10.0, 0.0),
                view_kind: ViewKind::RelativeToCurrent,
                options: ViewChangeOptions::INSTANT,
            }),
            CorrelationId::new(id),
            3,
        )
    }

    fn dispatched(queue: &mut OperationQueue, key: OperationKey, request: i32) {
        let op = queue.get_mut(key).expect("queued");
        op.set_request_id(RequestId::new(request));
    }

    #[test]
    fn keys_follow_issuance_order() {
        let mut queue = OperationQueue::new();
        let a = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let b = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 1));
        assert_eq!(queue.keys(), vec![a, b]);
        assert!(a < b);
        assert_eq!(queue.max_pre_ticks(), 3);
    }

    #[test]
    fn settled_resolves_matched_and_prior() {
        let mut queue = OperationQueue::new();
        let instant = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let animated = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 1));
        let latest = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 2));
        let pending = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 3));
        dispatched(&mut queue, instant, 1);
        dispatched(&mut queue, animated, 2);
        dispatched(&mut queue, latest, 3);

        let done = queue.take_resolved(RequestScope::Request(RequestId::new(3)), CompletionRule::SETTLED);
        let results: Vec<_> = done
            .iter()
            .map(|c| (c.operation.correlation_id().get(), c.result))
            .collect();
        assert_eq!(
            results,
            vec![
                (0, ViewChangeResult::Completed),
                (1, ViewChangeResult::Interrupted),
                (2, ViewChangeResult::Completed),
            ]
        );
        assert!(done.iter().all(|c| c.operation.is_completed()));
        assert_eq!(queue.keys(), vec![pending]);
    }

    #[test]
    fn values_changed_leaves_matched_animation_running() {
        let mut queue = OperationQueue::new();
        let animated = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 0));
        dispatched(&mut queue, animated, 5);
        let done = queue.take_resolved(RequestScope::Request(RequestId::new(5)), CompletionRule::VALUES_CHANGED);
        assert!(done.is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn ignored_touches_only_the_match() {
        let mut queue = OperationQueue::new();
        let a = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let b = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 1));
        dispatched(&mut queue, a, 1);
        dispatched(&mut queue, b, 2);
        let done = queue.take_resolved(RequestScope::Request(RequestId::new(2)), CompletionRule::IGNORED);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].result, ViewChangeResult::Ignored);
        assert_eq!(queue.keys(), vec![a]);
    }

    #[test]
    fn scope_all_includes_undispatched() {
        let mut queue = OperationQueue::new();
        queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let b = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::WHEEL, 1));
        dispatched(&mut queue, b, 4);
        let done = queue.take_resolved(RequestScope::All, CompletionRule::INTERRUPTED);
        assert_eq!(done.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn scope_dispatched_keeps_queued() {
        let mut queue = OperationQueue::new();
        let queued = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let running = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 1));
        dispatched(&mut queue, running, 2);
        let done = queue.take_resolved(RequestScope::Dispatched, CompletionRule::INTERRUPTED);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].operation.correlation_id().get(), 1);
        assert_eq!(queue.keys(), vec![queued]);
    }

    #[test]
    fn scope_manipulation_takes_pending_animations() {
        let mut queue = OperationQueue::new();
        let instant = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let running = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 1));
        queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 2));
        dispatched(&mut queue, running, 5);
        let done = queue.take_resolved(RequestScope::Manipulation, CompletionRule::INTERRUPTED);
        let ids: Vec<_> = done.iter().map(|c| c.operation.correlation_id().get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(done.iter().all(|c| c.result == ViewChangeResult::Interrupted));
        assert_eq!(queue.keys(), vec![instant]);
    }

    #[test]
    fn coalescing_skips_started_countdowns() {
        let mut queue = OperationQueue::new();
        let key = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::HORIZONTAL_PROXY, 0));
        assert!(
            queue
                .find_coalescable(
                    OperationTrigger::PROXY,
                    OperationType::MoveByDelta,
                    ViewKind::RelativeToCurrent,
                    ViewChangeOptions::INSTANT,
                )
                .is_some()
        );
        assert!(
            queue
                .find_coalescable(
                    OperationTrigger::DIRECT_CALL,
                    OperationType::MoveByDelta,
                    ViewKind::RelativeToCurrent,
                    ViewChangeOptions::INSTANT,
                )
                .is_none()
        );
        queue.get_mut(key).expect("queued").tick_queued();
        assert!(
            queue
                .find_coalescable(
                    OperationTrigger::PROXY,
                    OperationType::MoveByDelta,
                    ViewKind::RelativeToCurrent,
                    ViewChangeOptions::INSTANT,
                )
                .is_none()
        );
    }

    #[test]
    fn last_non_animated_before_skips_animations_and_cancellations() {
        let mut queue = OperationQueue::new();
        let a = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0));
        let b = queue.push(offsets_op(OperationType::MoveToAbsolute, OperationTrigger::DIRECT_CALL, 1));
        queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 2));
        let d = queue.push(offsets_op(OperationType::MoveWithAnimation, OperationTrigger::DIRECT_CALL, 3));
        assert_eq!(queue.last_pending_non_animated_before(d), Some(b));
        queue.get_mut(b).expect("queued").cancel(ViewChangeResult::Interrupted);
        assert_eq!(queue.last_pending_non_animated_before(d), Some(a));
        assert_eq!(queue.last_pending_non_animated_before(a), None);
    }

    #[test]
    fn delayed_operations_are_taken_together() {
        let mut queue = OperationQueue::new();
        let mut delayed = offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 0);
        delayed.set_delayed(true);
        queue.push(delayed);
        let live = queue.push(offsets_op(OperationType::MoveByDelta, OperationTrigger::DIRECT_CALL, 1));
        let done = queue.take_delayed(ViewChangeResult::Interrupted);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].operation.correlation_id().get(), 0);
        assert_eq!(queue.keys(), vec![live]);
    }
}
