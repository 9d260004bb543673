use clap::Subcommand;
use eksplosa_core::{Carousel, Config, Transform};
use serde::Serialize;

#[derive(Subcommand)]
pub enum CarouselAction {
    /// Replay a gesture script and print the strip position after each step
    ///
    /// Steps: `drag:<from>:<to>`, `cancel:<from>:<to>`, `resize:<container>:<viewport>`,
    /// `goto:<index>`, `next`, `prev`.
    Simulate {
        /// Number of slides
        #[arg(long, default_value = "8")]
        slides: usize,
        /// Container width in px
        #[arg(long, default_value = "1030")]
        container: f64,
        /// Viewport width in px
        #[arg(long, default_value = "1280")]
        viewport: f64,
        steps: Vec<String>,
    },
}

#[derive(Serialize)]
struct StepReport<'a> {
    step: &'a str,
    index: usize,
    max_index: usize,
    /// Deepest live offset reached during a drag.
    peak_offset: Option<f64>,
    transform: Option<Transform>,
}

pub fn run(action: CarouselAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CarouselAction::Simulate {
            slides,
            container,
            viewport,
            steps,
        } => {
            let config = Config::load_or_default();
            let mut carousel = Carousel::new(config.carousel, slides, container, viewport)?;
            for step in &steps {
                let (peak_offset, transform) = apply(&mut carousel, step)?;
                let report = StepReport {
                    step,
                    index: carousel.index(),
                    max_index: carousel.max_index(),
                    peak_offset,
                    transform,
                };
                println!("{}", serde_json::to_string(&report)?);
            }
        }
    }
    Ok(())
}

fn apply(
    carousel: &mut Carousel,
    step: &str,
) -> Result<(Option<f64>, Option<Transform>), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = step.split(':').collect();
    let num = |i: usize| -> Result<f64, Box<dyn std::error::Error>> {
        let raw = parts
            .get(i)
            .ok_or_else(|| format!("step `{step}` is missing a value"))?;
        Ok(raw.parse::<f64>().map_err(|e| format!("step `{step}`: {e}"))?)
    };

    let result = match parts[0] {
        "drag" | "cancel" => {
            let (from, to) = (num(1)?, num(2)?);
            if !carousel.on_drag_start(from) {
                return Ok((None, None));
            }
            // Move in a few increments like a real pointer would.
            let mut peak: Option<f64> = None;
            for i in 1..=4 {
                let pos = from + (to - from) * f64::from(i) / 4.0;
                if let Some(offset) = carousel.on_drag_move(pos) {
                    peak = Some(match peak {
                        Some(p) if p.abs() >= offset.abs() => p,
                        _ => offset,
                    });
                }
            }
            let transform = if parts[0] == "cancel" {
                carousel.on_drag_cancel()
            } else {
                carousel.on_drag_end()
            };
            (peak, transform)
        }
        "resize" => (None, Some(carousel.on_viewport_resize(num(1)?, num(2)?))),
        "goto" => (None, Some(carousel.go_to(num(1)? as usize))),
        "next" => (None, Some(carousel.next())),
        "prev" => (None, Some(carousel.prev())),
        other => return Err(format!("unknown step `{other}`").into()),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eksplosa_core::CarouselConfig;

    #[test]
    fn drag_step_moves_one_slide() {
        let mut carousel = Carousel::new(CarouselConfig::default(), 8, 1030.0, 1280.0).unwrap();
        let (peak, transform) = apply(&mut carousel, "drag:600:300").unwrap();
        assert_eq!(peak, Some(-300.0));
        assert_eq!(transform.unwrap().offset, -260.0);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn unknown_step_is_rejected() {
        let mut carousel = Carousel::new(CarouselConfig::default(), 8, 1030.0, 1280.0).unwrap();
        assert!(apply(&mut carousel, "spin").is_err());
        assert!(apply(&mut carousel, "drag:1").is_err());
    }
}
