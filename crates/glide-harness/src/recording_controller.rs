#![forbid(unsafe_code)]

//! Proxy controller that records what the scroller tells it.
//!
//! The scroller owns the controller once attached, so the log is shared
//! with a [`ControllerHandle`] kept by the test.

use std::sync::{Arc, Mutex, PoisonError};

use glide_core::CorrelationId;
use glide_runtime::{ScrollController, ScrollMode, ViewChangeResult};

/// `set_values` arguments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerValues {
    pub min_offset: f64,
    pub max_offset: f64,
    pub offset: f64,
    pub viewport_length: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerLog {
    pub values: Vec<ControllerValues>,
    pub scroll_modes: Vec<ScrollMode>,
    pub completions: Vec<(CorrelationId, ViewChangeResult)>,
}

impl ControllerLog {
    pub fn last_values(&self) -> Option<ControllerValues> {
        self.values.last().copied()
    }
}

/// Read side of a [`RecordingScrollController`].
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    log: Arc<Mutex<ControllerLog>>,
}

impl ControllerHandle {
    /// Snapshot of everything recorded so far.
    pub fn log(&self) -> ControllerLog {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug)]
pub struct RecordingScrollController {
    log: Arc<Mutex<ControllerLog>>,
}

impl RecordingScrollController {
    /// A boxed controller ready to attach, and the handle reading its log.
    pub fn new() -> (Box<Self>, ControllerHandle) {
        let log = Arc::new(Mutex::new(ControllerLog::default()));
        (
            Box::new(Self { log: log.clone() }),
            ControllerHandle { log },
        )
    }

    fn with_log(&self, f: impl FnOnce(&mut ControllerLog)) {
        f(&mut self.log.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl ScrollController for RecordingScrollController {
    fn set_values(&mut self, min_offset: f64, max_offset: f64, offset: f64, viewport_length: f64) {
        self.with_log(|log| {
            log.values.push(ControllerValues {
                min_offset,
                max_offset,
                offset,
                viewport_length,
            });
        });
    }

    fn set_scroll_mode(&mut self, mode: ScrollMode) {
        self.with_log(|log| log.scroll_modes.push(mode));
    }

    fn on_scroll_completed(&mut self, correlation_id: CorrelationId, result: ViewChangeResult) {
        self.with_log(|log| log.completions.push((correlation_id, result)));
    }
}
