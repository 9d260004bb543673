use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Viewport class selected by the breakpoint width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    Narrow,
    Wide,
}

impl ViewportClass {
    pub fn for_width(viewport_width: f64, breakpoint_px: f64) -> Self {
        if viewport_width < breakpoint_px {
            ViewportClass::Narrow
        } else {
            ViewportClass::Wide
        }
    }
}

/// A value with one setting per viewport class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints<T> {
    pub narrow: T,
    pub wide: T,
}

impl<T: Copy> Breakpoints<T> {
    pub fn get(&self, class: ViewportClass) -> T {
        match class {
            ViewportClass::Narrow => self.narrow,
            ViewportClass::Wide => self.wide,
        }
    }
}

/// Carousel layout and gesture tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Viewports narrower than this are `Narrow`.
    #[serde(default = "default_breakpoint_px")]
    pub breakpoint_px: f64,
    #[serde(default = "default_slides_per_view")]
    pub slides_per_view: Breakpoints<usize>,
    #[serde(default = "default_gap_px")]
    pub gap_px: Breakpoints<f64>,
    /// Duration of the snap animation after release.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// How far past either end a drag may pull the strip.
    #[serde(default = "default_overscroll_px")]
    pub overscroll_px: f64,
    /// Factor applied to drag distance beyond the ends.
    #[serde(default = "default_resistance")]
    pub resistance: f64,
    /// Fraction of a slide unit a drag must exceed to change slide.
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    #[serde(default)]
    pub disable_drag_on_wide: bool,
}

fn default_breakpoint_px() -> f64 {
    768.0
}
fn default_slides_per_view() -> Breakpoints<usize> {
    Breakpoints { narrow: 2, wide: 4 }
}
fn default_gap_px() -> Breakpoints<f64> {
    Breakpoints {
        narrow: 25.0,
        wide: 10.0,
    }
}
fn default_transition_ms() -> u64 {
    300
}
fn default_overscroll_px() -> f64 {
    100.0
}
fn default_resistance() -> f64 {
    0.25
}
fn default_snap_threshold() -> f64 {
    0.3
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: default_breakpoint_px(),
            slides_per_view: default_slides_per_view(),
            gap_px: default_gap_px(),
            transition_ms: default_transition_ms(),
            overscroll_px: default_overscroll_px(),
            resistance: default_resistance(),
            snap_threshold: default_snap_threshold(),
            disable_drag_on_wide: false,
        }
    }
}

impl CarouselConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: format!("carousel.{key}"),
            message: message.to_string(),
        };
        if self.slides_per_view.narrow == 0 || self.slides_per_view.wide == 0 {
            return Err(invalid("slides_per_view", "must be at least 1"));
        }
        if !(self.gap_px.narrow >= 0.0 && self.gap_px.wide >= 0.0)
            || !self.gap_px.narrow.is_finite()
            || !self.gap_px.wide.is_finite()
        {
            return Err(invalid("gap_px", "must be a non-negative number"));
        }
        if !(self.breakpoint_px.is_finite() && self.breakpoint_px > 0.0) {
            return Err(invalid("breakpoint_px", "must be positive"));
        }
        if !(self.overscroll_px.is_finite() && self.overscroll_px >= 0.0) {
            return Err(invalid("overscroll_px", "must be a non-negative number"));
        }
        if !(0.0..=1.0).contains(&self.resistance) {
            return Err(invalid("resistance", "must be between 0 and 1"));
        }
        if !(self.snap_threshold > 0.0 && self.snap_threshold <= 1.0) {
            return Err(invalid("snap_threshold", "must be in (0, 1]"));
        }
        Ok(())
    }
}
