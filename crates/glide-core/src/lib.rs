#![forbid(unsafe_code)]

//! Core: view-change requests, identifiers, and snap-point consolidation.
//!
//! # Role in Glide
//! `glide-core` is the engine-free layer. It owns the value types that
//! describe a requested scroll or zoom, the identifiers that correlate a
//! request with its eventual outcome, and the snap-point consolidator that
//! turns user-declared resting values into ordered, non-overlapping zones.
//!
//! # Primary responsibilities
//! - **ViewChangeRequest**: the closed set of motion requests (offsets,
//!   velocities, zoom factors) with their option bundles.
//! - **Identifiers**: monotonically allocated correlation ids and
//!   engine-assigned request ids.
//! - **Snap points**: declaration, validation, consolidation, and
//!   evaluation of per-axis resting values.
//!
//! # How it fits in the system
//! The runtime (`glide-runtime`) wraps each request in an asynchronous
//! operation, queues it, and dispatches it to an external interaction
//! engine. Nothing in this crate talks to the engine, so every type here is
//! deterministic and cheap to test in isolation.

pub mod error;
pub mod geometry;
pub mod ids;
pub mod input;
pub mod request;
pub mod snap;

pub use error::{SnapPointError, ViewChangeError};
pub use geometry::{Axis, Size, Vec2};
pub use ids::{CorrelationId, CorrelationIdAllocator, RequestId};
pub use input::{InputKinds, WheelInput};
pub use request::{
    AnimationMode, DecayRateOverride, OffsetsChange, OffsetsChangeWithAdditionalVelocity,
    OffsetsChangeWithVelocity, OperationTrigger, SnapPointsMode, ViewChangeOptions,
    ViewChangeRequest, ViewKind, ZoomFactorChange, ZoomFactorChangeWithAdditionalVelocity,
};
pub use snap::{
    ApplicableRange, ApplicableZone, InertiaModifier, SnapAxis, SnapPoint, SnapPointKind,
    SnapPointSet, SnapPointWrapper, SnapPointsAlignment, SnapTarget,
};
