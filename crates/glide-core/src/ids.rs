#![forbid(unsafe_code)]

//! Correlation and request identifiers.
//!
//! A [`CorrelationId`] is handed to the caller when a view change is
//! accepted and stays stable for the life of that request. A [`RequestId`]
//! is chosen by the interaction engine each time a command is dispatched;
//! later engine notifications refer back to it.
//!
//! # Invariants
//!
//! 1. Correlation ids are strictly increasing until `i32::MAX`, then wrap
//!    to 0.
//! 2. Request ids are never allocated locally.

use std::fmt;

/// Public identifier of an accepted view-change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId(i32);

impl CorrelationId {
    /// Wrap a raw id.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the interaction engine to one dispatched command.
///
/// Engines allocate these in increasing order, which is what lets a
/// notification for request `n` resolve every dispatched command `< n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(i32);

impl RequestId {
    /// Wrap a raw engine id.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out correlation ids in issuance order.
#[derive(Debug, Clone, Default)]
pub struct CorrelationIdAllocator {
    latest: Option<i32>,
}

impl CorrelationIdAllocator {
    /// Allocator whose first id is 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: None }
    }

    /// Allocator that resumes after `latest`.
    #[must_use]
    pub const fn starting_after(latest: i32) -> Self {
        Self {
            latest: Some(latest),
        }
    }

    /// Allocate the next id, wrapping to 0 once `i32::MAX` is used.
    pub fn next_id(&mut self) -> CorrelationId {
        let next = match self.latest {
            None | Some(i32::MAX) => 0,
            Some(latest) if latest < 0 => 0,
            Some(latest) => latest + 1,
        };
        self.latest = Some(next);
        CorrelationId(next)
    }

    /// Most recently issued id.
    #[inline]
    pub fn latest(&self) -> Option<CorrelationId> {
        self.latest.map(CorrelationId)
    }
}
