//! Carousel gesture handling.
//!
//! Converts pointer drags over a fixed-size slide strip into a snapped slide
//! index. Layout depends on the viewport class (narrow/wide).

mod config;
mod engine;

pub use config::{Breakpoints, CarouselConfig, ViewportClass};
pub use engine::{Carousel, CarouselState, Transform};
