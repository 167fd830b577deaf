#![forbid(unsafe_code)]

//! Cached view: offsets, zoom factor, and the geometry bounding them.
//!
//! Offsets are measured in zoomed content pixels from the top-left corner,
//! so the scrollable range of an axis is `extent * zoom - viewport`,
//! never negative.

use glide_core::geometry::clamp;
use glide_core::{Axis, Size, Vec2};

use crate::engine::EngineBounds;

/// Default smallest zoom factor.
pub const DEFAULT_MIN_ZOOM_FACTOR: f64 = 0.1;
/// Default largest zoom factor.
pub const DEFAULT_MAX_ZOOM_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    offsets: Vec2,
    zoom_factor: f64,
    extent: Size,
    viewport: Size,
    min_zoom_factor: f64,
    max_zoom_factor: f64,
    horizontal_anchor_ratio: Option<f64>,
    vertical_anchor_ratio: Option<f64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offsets: Vec2::ZERO,
            zoom_factor: 1.0,
            extent: Size::ZERO,
            viewport: Size::ZERO,
            min_zoom_factor: DEFAULT_MIN_ZOOM_FACTOR,
            max_zoom_factor: DEFAULT_MAX_ZOOM_FACTOR,
            horizontal_anchor_ratio: None,
            vertical_anchor_ratio: None,
        }
    }
}

impl ViewState {
    #[inline]
    pub fn offsets(&self) -> Vec2 {
        self.offsets
    }

    #[inline]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    #[inline]
    pub fn extent(&self) -> Size {
        self.extent
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[inline]
    pub fn min_zoom_factor(&self) -> f64 {
        self.min_zoom_factor
    }

    #[inline]
    pub fn max_zoom_factor(&self) -> f64 {
        self.max_zoom_factor
    }

    pub fn anchor_ratio(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Horizontal => self.horizontal_anchor_ratio,
            Axis::Vertical => self.vertical_anchor_ratio,
        }
    }

    pub(crate) fn set_offsets(&mut self, offsets: Vec2) {
        self.offsets = offsets;
    }

    pub(crate) fn set_zoom_factor(&mut self, zoom_factor: f64) {
        self.zoom_factor = zoom_factor;
    }

    pub(crate) fn set_extent(&mut self, extent: Size) {
        self.extent = extent;
    }

    pub(crate) fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Set both zoom bounds. A maximum below the minimum is raised to it.
    pub(crate) fn set_zoom_bounds(&mut self, min: f64, max: f64) {
        self.min_zoom_factor = min;
        self.max_zoom_factor = max.max(min);
    }

    pub(crate) fn set_anchor_ratio(&mut self, axis: Axis, ratio: Option<f64>) {
        match axis {
            Axis::Horizontal => self.horizontal_anchor_ratio = ratio,
            Axis::Vertical => self.vertical_anchor_ratio = ratio,
        }
    }

    /// Largest offsets at `zoom_factor`.
    pub fn scrollable_at(&self, zoom_factor: f64) -> Vec2 {
        Vec2::new(
            (self.extent.width * zoom_factor - self.viewport.width).max(0.0),
            (self.extent.height * zoom_factor - self.viewport.height).max(0.0),
        )
    }

    /// Largest offsets at the current zoom factor.
    pub fn scrollable(&self) -> Vec2 {
        self.scrollable_at(self.zoom_factor)
    }

    pub fn clamp_offsets_at(&self, offsets: Vec2, zoom_factor: f64) -> Vec2 {
        offsets.clamp(Vec2::ZERO, self.scrollable_at(zoom_factor))
    }

    pub fn clamp_offsets(&self, offsets: Vec2) -> Vec2 {
        self.clamp_offsets_at(offsets, self.zoom_factor)
    }

    pub fn clamp_zoom(&self, zoom_factor: f64) -> f64 {
        clamp(zoom_factor, self.min_zoom_factor, self.max_zoom_factor)
    }

    /// Viewport point kept stationary by zoom requests without a center:
    /// the anchor ratio of each axis, or the viewport center.
    pub fn anchor_point(&self) -> Vec2 {
        let center = self.viewport.center();
        Vec2::new(
            self.horizontal_anchor_ratio
                .map_or(center.x, |r| r * self.viewport.width),
            self.vertical_anchor_ratio
                .map_or(center.y, |r| r * self.viewport.height),
        )
    }

    /// Range reported to the engine.
    pub fn engine_bounds(&self) -> EngineBounds {
        EngineBounds {
            min_position: Vec2::ZERO,
            max_position: self.scrollable(),
            min_zoom_factor: self.min_zoom_factor,
            max_zoom_factor: self.max_zoom_factor,
        }
    }
}
