//! Drag engine for a horizontal slide strip.
//!
//! Like the quiz engine this is a plain state machine: the host feeds pointer
//! positions (mouse or touch, it makes no difference) and viewport sizes, and
//! applies the returned [`Transform`] to the strip.
//!
//! ```text
//! Idle -> Dragging -> (release) -> Idle, offset snapped to -(index * unit)
//! ```

use serde::Serialize;

use super::config::{CarouselConfig, ViewportClass};
use crate::error::ConfigError;

/// Translation the renderer should apply to the strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub offset: f64,
    /// 0 means jump without animation.
    pub transition_ms: u64,
}

/// Runtime layout and gesture state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselState {
    /// Committed slide index, always in `0..=max_index`.
    pub index: usize,
    pub viewport: ViewportClass,
    pub visible_slides: usize,
    pub gap: f64,
    pub slide_width: f64,
    pub dragging: bool,
    /// Pointer position where the current drag started.
    pub origin: f64,
    /// Pointer travel of the current (or last) drag.
    pub distance: f64,
    /// Offset currently shown, including a live drag.
    pub offset: f64,
    /// Offset at the start of the current drag.
    pub committed_offset: f64,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    slide_count: usize,
    state: CarouselState,
}

impl Carousel {
    /// Lay out `slide_count` slides in a container of `container_width` for a
    /// viewport of `viewport_width`.
    pub fn new(
        config: CarouselConfig,
        slide_count: usize,
        container_width: f64,
        viewport_width: f64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = ViewportClass::for_width(viewport_width, config.breakpoint_px);
        let mut carousel = Self {
            state: CarouselState {
                index: 0,
                viewport,
                visible_slides: config.slides_per_view.get(viewport),
                gap: config.gap_px.get(viewport),
                slide_width: 0.0,
                dragging: false,
                origin: 0.0,
                distance: 0.0,
                offset: 0.0,
                committed_offset: 0.0,
            },
            config,
            slide_count,
        };
        carousel.layout(container_width, viewport_width);
        Ok(carousel)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn offset(&self) -> f64 {
        self.state.offset
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// One slide width plus its trailing gap.
    pub fn slide_unit(&self) -> f64 {
        self.state.slide_width + self.state.gap
    }

    pub fn max_index(&self) -> usize {
        self.slide_count.saturating_sub(self.state.visible_slides)
    }

    pub fn min_offset(&self) -> f64 {
        -(self.max_index() as f64 * self.slide_unit())
    }

    pub fn max_offset(&self) -> f64 {
        0.0
    }

    pub fn drag_enabled(&self) -> bool {
        !(self.config.disable_drag_on_wide && self.state.viewport == ViewportClass::Wide)
    }

    // ── Gestures ─────────────────────────────────────────────────────

    /// Returns false when dragging is disabled for this viewport.
    pub fn on_drag_start(&mut self, position: f64) -> bool {
        if !self.drag_enabled() {
            tracing::debug!("drag ignored: disabled on wide viewport");
            return false;
        }
        self.state.dragging = true;
        self.state.origin = position;
        self.state.distance = 0.0;
        self.state.committed_offset = self.state.offset;
        true
    }

    /// Live offset for the pointer at `position`, or None when not dragging.
    pub fn on_drag_move(&mut self, position: f64) -> Option<f64> {
        if !self.state.dragging {
            return None;
        }
        self.state.distance = position - self.state.origin;
        let raw = self.state.committed_offset + self.state.distance;
        self.state.offset = self.resist(raw);
        Some(self.state.offset)
    }

    /// Finish the drag and snap to the resulting slide.
    pub fn on_drag_end(&mut self) -> Option<Transform> {
        if !self.state.dragging {
            return None;
        }
        self.state.dragging = false;

        let threshold = self.slide_unit() * self.config.snap_threshold;
        let distance = self.state.distance;
        if distance.abs() > threshold {
            let step: i64 = if distance < 0.0 { 1 } else { -1 };
            let target = (self.state.index as i64 + step).clamp(0, self.max_index() as i64);
            self.state.index = target as usize;
        }
        tracing::debug!(distance, index = self.state.index, "drag released");
        Some(self.snap(self.config.transition_ms))
    }

    /// Pointer left the window or the gesture was interrupted.
    pub fn on_drag_cancel(&mut self) -> Option<Transform> {
        self.on_drag_end()
    }

    /// Recompute layout for a new container/viewport size.
    ///
    /// The current offset is reapplied without animation. If the new layout
    /// shows more slides and the index falls out of range it is clamped and
    /// the strip snaps to it.
    pub fn on_viewport_resize(&mut self, container_width: f64, viewport_width: f64) -> Transform {
        self.layout(container_width, viewport_width);
        let max = self.max_index();
        if self.state.index > max {
            self.state.index = max;
            if !self.state.dragging {
                return self.snap(0);
            }
        }
        Transform {
            offset: self.state.offset,
            transition_ms: 0,
        }
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn go_to(&mut self, index: usize) -> Transform {
        self.state.dragging = false;
        self.state.index = index.min(self.max_index());
        self.snap(self.config.transition_ms)
    }

    pub fn next(&mut self) -> Transform {
        self.go_to(self.state.index + 1)
    }

    pub fn prev(&mut self) -> Transform {
        self.go_to(self.state.index.saturating_sub(1))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn layout(&mut self, container_width: f64, viewport_width: f64) {
        let viewport = ViewportClass::for_width(viewport_width, self.config.breakpoint_px);
        let visible = self.config.slides_per_view.get(viewport);
        let gap = self.config.gap_px.get(viewport);
        let total_gap = (visible - 1) as f64 * gap;

        self.state.viewport = viewport;
        self.state.visible_slides = visible;
        self.state.gap = gap;
        self.state.slide_width = ((container_width - total_gap) / visible as f64).max(0.0);
        if !self.drag_enabled() && self.state.dragging {
            self.state.dragging = false;
        }
    }

    /// Dampen travel past either end, then cap it at the overscroll allowance.
    fn resist(&self, raw: f64) -> f64 {
        let max = self.max_offset();
        let min = self.min_offset();
        let dampened = if raw > max {
            max + (raw - max) * self.config.resistance
        } else if raw < min {
            min + (raw - min) * self.config.resistance
        } else {
            raw
        };
        dampened.clamp(min - self.config.overscroll_px, max + self.config.overscroll_px)
    }

    fn snap(&mut self, transition_ms: u64) -> Transform {
        let target = -(self.state.index as f64 * self.slide_unit());
        self.state.offset = target;
        self.state.committed_offset = target;
        Transform {
            offset: target,
            transition_ms,
        }
    }
}
