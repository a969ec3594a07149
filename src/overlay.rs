use crate::squat::Stage;

/// Live statistics shown in the top-left banner of every output frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub reps: usize,
    pub stage: Stage,
    pub average_speed: Option<f64>,
}

impl Banner {
    pub fn new(reps: usize, stage: Stage, average_speed: Option<f64>) -> Self {
        Self {
            reps,
            stage,
            average_speed,
        }
    }

    /// `(label, value, value_scale, x)` for each field.
    pub fn fields(&self) -> [(&'static str, String, f64, i32); 3] {
        [
            ("REPS", self.reps.to_string(), 0.6, 5),
            ("STAGE", self.stage.label().to_string(), 0.8, 60),
            ("AVG SPEED", self.average_text().unwrap_or_default(), 0.8, 170),
        ]
    }

    pub fn average_text(&self) -> Option<String> {
        self.average_speed.map(|avg| format!("{avg:.2} sec/rep"))
    }
}

#[cfg(feature = "vision")]
pub use draw::draw_banner;

#[cfg(feature = "vision")]
mod draw {
    use anyhow::Result;
    use opencv::{
        core::{Mat, Point, Rect, Scalar},
        imgproc,
        prelude::*,
    };

    use super::Banner;

    const BANNER_HEIGHT: i32 = 60;

    pub fn draw_banner(frame: &mut Mat, banner: &Banner) -> Result<()> {
        let white = Scalar::new(255.0, 255.0, 255.0, 0.0);
        let black = Scalar::new(0.0, 0.0, 0.0, 0.0);

        let strip = Rect::new(0, 0, frame.cols(), BANNER_HEIGHT);
        imgproc::rectangle(frame, strip, black, imgproc::FILLED, imgproc::LINE_8, 0)?;

        for (label, value, scale, x) in banner.fields() {
            put(frame, label, Point::new(x, 25), 0.4, white)?;
            if !value.is_empty() {
                put(frame, &value, Point::new(x, 50), scale, white)?;
            }
        }
        Ok(())
    }

    fn put(frame: &mut Mat, text: &str, origin: Point, scale: f64, color: Scalar) -> Result<()> {
        imgproc::put_text(
            frame,
            text,
            origin,
            imgproc::FONT_HERSHEY_SIMPLEX,
            scale,
            color,
            1,
            imgproc::LINE_AA,
            false,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_hidden_until_defined() {
        let banner = Banner::new(0, Stage::Unset, None);
        let [reps, stage, avg] = banner.fields();
        assert_eq!(reps.1, "0");
        assert_eq!(stage.1, "");
        assert_eq!(avg.0, "AVG SPEED");
        assert_eq!(avg.1, "");
    }

    #[test]
    fn test_average_two_decimals() {
        let banner = Banner::new(3, Stage::Lockout, Some(1.766_666));
        assert_eq!(banner.average_text().as_deref(), Some("1.77 sec/rep"));
        assert_eq!(banner.fields()[1].1, "lockout");
    }
}
