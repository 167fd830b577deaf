#![forbid(unsafe_code)]

//! Test harness and reference fixtures for Glide.
//!
//! # Role in Glide
//! `glide-harness` stands in for the host. [`RecordingEngine`] is a
//! deterministic engine that records every command and, when asked,
//! settles a command into the notifications a real engine would send.
//! [`RecordingScrollController`] records what a scrollbar would be told.
//! The fixtures wire both to a loaded [`Scroller`](glide_runtime::Scroller)
//! and drive its frame loop.
//!
//! Scenario, property, and tracing tests for the whole stack live in this
//! crate's `tests/` directory.

pub mod fixtures;
pub mod recording_controller;
pub mod recording_engine;

pub use fixtures::{
    EXTENT, VIEWPORT, completions, completions_for, loaded_scroller, loaded_scroller_with,
    run_until_idle, tick_n,
};
pub use recording_controller::{
    ControllerHandle, ControllerLog, ControllerValues, RecordingScrollController,
};
pub use recording_engine::{EngineCommand, RecordingEngine};
