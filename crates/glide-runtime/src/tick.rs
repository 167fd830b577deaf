#![forbid(unsafe_code)]

//! Lazily held per-frame tick subscription.
//!
//! The scroller only wants frame callbacks while it has work: queued or
//! in-flight operations, or a restart grace countdown. The host observes
//! transitions through [`ScrollerEvent::TickSubscriptionChanged`] and hooks
//! or unhooks its frame source accordingly.
//!
//! [`ScrollerEvent::TickSubscriptionChanged`]: crate::ScrollerEvent::TickSubscriptionChanged

/// Whether the scroller currently wants [`Scroller::on_tick`] calls.
///
/// [`Scroller::on_tick`]: crate::Scroller::on_tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSubscription {
    active: bool,
}

impl TickSubscription {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true when the subscription was not already held.
    pub fn acquire(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        tracing::debug!(target: "glide.scroller", "tick subscription acquired");
        true
    }

    /// Returns true when the subscription was held.
    pub fn release(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        tracing::debug!(target: "glide.scroller", "tick subscription released");
        true
    }
}
