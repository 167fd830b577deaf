#![forbid(unsafe_code)]

//! Glide Runtime
//!
//! Coordinates scroll and zoom requests with an external, asynchronous
//! interaction engine.
//!
//! # Key Components
//!
//! - [`Scroller`] - Public entry points, queue policy, completion fan-out
//! - [`OperationQueue`] - Ordered in-flight operations and their resolution
//! - [`AsyncOperation`] - One queued or dispatched view change
//! - [`EngineBridge`] - Dispatch and request-id correlation
//! - [`InteractionEngine`] - Contract with the physics/animation engine
//! - [`ScrollController`] - Contract with proxy controllers such as scrollbars
//! - [`ScrollerConfig`] - Every tunable constant, injected at construction
//!
//! # Role in Glide
//! `glide-runtime` sits between callers and the engine. It consumes the
//! request types and snap-point sets of `glide-core`, turns each request
//! into exactly one engine command at the right frame, and reports exactly
//! one outcome per request through [`ScrollerEvent`]s.
//!
//! # How it fits in the system
//! The host owns the frame loop and the engine. It forwards frame ticks,
//! wheel input, proxy requests, and engine notifications to the
//! [`Scroller`], and drains events after each call.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod engine;
pub mod event;
pub mod operation;
pub mod queue;
pub mod scroller;
pub mod snap_points;
pub mod tick;
pub mod view;

pub use bridge::{DispatchContext, EngineBridge};
#[cfg(feature = "config-file")]
pub use config::ConfigError;
pub use config::{
    AnimationConfig, InertiaConfig, PlatformQuirks, ScrollerConfig, TickConfig, WheelConfig,
    inertia_travel, velocity_for_travel,
};
pub use controller::{ScrollController, ScrollControllerRequest, ScrollMode, ZoomMode};
pub use engine::{
    EngineBounds, EngineNotification, InteractionEngine, PositionAnimation, ScaleAnimation,
};
pub use event::{InteractionState, ScrollerEvent, ViewChangeResult};
pub use operation::{AsyncOperation, OperationKey, OperationState, OperationType};
pub use queue::{Completion, CompletionRule, OperationQueue, RequestScope};
pub use scroller::Scroller;
pub use snap_points::SnapPointsState;
pub use tick::TickSubscription;
pub use view::ViewState;
