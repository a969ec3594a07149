use std::time::Duration;

use tracing::{debug, info};

use crate::config::Thresholds;

/// Phase of the current repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Unset,
    Bottom,
    Ongoing,
    Lockout,
}

impl Stage {
    /// Overlay label; empty until the lifter first reaches the bottom.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Unset => "",
            Stage::Bottom => "bottom",
            Stage::Ongoing => "ongoing",
            Stage::Lockout => "lockout",
        }
    }
}

/// A completed repetition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rep {
    /// 1-based
    pub number: usize,
    /// Seconds from leaving the bottom band to lockout, 2 decimals
    pub speed: f64,
}

/// Rep-counting state machine driven by the hip-flexion angle.
///
/// The gap between the bottom and lockout thresholds is a hysteresis band:
/// it must be crossed completely before a rep is credited, so an aborted
/// rep that drops back to the bottom is simply never counted.
#[derive(Debug, Clone)]
pub struct RepCounter {
    thresholds: Thresholds,
    stage: Stage,
    rep_start: Option<Duration>,
    rep_speeds: Vec<f64>,
}

impl RepCounter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            stage: Stage::Unset,
            rep_start: None,
            rep_speeds: Vec::new(),
        }
    }

    /// Feed one angle sample taken at `timestamp`.
    ///
    /// Returns the rep that this sample completed, if any.
    pub fn observe(&mut self, angle: f64, timestamp: Duration) -> Option<Rep> {
        let Thresholds { bottom, lockout } = self.thresholds;

        match self.stage {
            stage if stage != Stage::Bottom && angle < bottom => {
                debug!(angle, "bottom");
                self.stage = Stage::Bottom;
                None
            }
            Stage::Bottom if angle > bottom && angle < lockout => {
                self.stage = Stage::Ongoing;
                self.rep_start = Some(timestamp);
                None
            }
            Stage::Ongoing if angle > lockout => {
                self.stage = Stage::Lockout;
                let start = self.rep_start.take().unwrap_or(timestamp);
                let speed = round2(timestamp.saturating_sub(start).as_secs_f64());
                self.rep_speeds.push(speed);

                let rep = Rep {
                    number: self.rep_speeds.len(),
                    speed,
                };
                info!(rep = rep.number, speed = rep.speed, "rep completed");
                Some(rep)
            }
            _ => None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn count(&self) -> usize {
        self.rep_speeds.len()
    }

    pub fn rep_speeds(&self) -> &[f64] {
        &self.rep_speeds
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
