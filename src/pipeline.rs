//! Per-frame orchestration: read, estimate pose, update reps, annotate.
//!
//! Frames are processed strictly in order on the calling thread. The video,
//! pose and display collaborators sit behind traits so the loop runs the
//! same against OpenCV/ONNX or in-memory fakes.

use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::landmarks::{HipPoints, Landmark};
use crate::overlay::Banner;
use crate::session::{Session, SessionRecord};
use crate::squat::RepCounter;

/// Clock used to time reps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Timing {
    /// Position of the frame within the video
    #[default]
    Video,
    /// Time at which the frame is processed
    WallClock,
}

pub struct TimedFrame<F> {
    pub frame: F,
    /// 0-based
    pub index: u64,
    /// Position within the source video
    pub position: Duration,
}

pub trait FrameSource {
    type Frame;

    /// `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<TimedFrame<Self::Frame>>>;
}

pub trait PoseEstimator<F> {
    /// `Ok(None)` when no person is found in the frame.
    fn estimate(&mut self, frame: &F) -> Result<Option<Vec<Landmark>>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

pub trait FrameSink<F> {
    /// Annotate and emit one frame; `Control::Stop` ends the session early.
    fn present(&mut self, frame: F, banner: &Banner) -> Result<Control>;
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames: u64,
    pub frames_with_pose: u64,
    pub stopped_early: bool,
    pub record: SessionRecord,
}

pub struct Pipeline<S, E, K> {
    source: S,
    estimator: E,
    sink: K,
    counter: RepCounter,
    min_visibility: f32,
    timing: Timing,
}

impl<S, E, K> Pipeline<S, E, K>
where
    S: FrameSource,
    E: PoseEstimator<S::Frame>,
    K: FrameSink<S::Frame>,
{
    pub fn new(source: S, estimator: E, sink: K, config: &Config) -> Self {
        Self {
            source,
            estimator,
            sink,
            counter: RepCounter::new(config.thresholds),
            min_visibility: config.min_detection_confidence,
            timing: config.timing,
        }
    }

    /// Process frames until the source ends or the sink asks to stop.
    pub fn run(mut self, mut session: Session) -> Result<RunSummary> {
        let started = Instant::now();
        let mut frames = 0;
        let mut frames_with_pose = 0;
        let mut stopped_early = false;

        while let Some(TimedFrame {
            frame,
            index,
            position,
        }) = self.source.next_frame()?
        {
            frames += 1;

            let points = self
                .estimator
                .estimate(&frame)?
                .and_then(|landmarks| HipPoints::from_landmarks(&landmarks, self.min_visibility));

            match points {
                Some(points) => {
                    frames_with_pose += 1;
                    let timestamp = match self.timing {
                        Timing::Video => position,
                        Timing::WallClock => started.elapsed(),
                    };
                    if let Some(rep) = self.counter.observe(points.angle(), timestamp) {
                        session.record_rep(rep.speed);
                    }
                }
                None => debug!(frame = index, "no pose, skipping"),
            }

            let banner = Banner::new(
                self.counter.count(),
                self.counter.stage(),
                session.average_speed(),
            );
            if self.sink.present(frame, &banner)? == Control::Stop {
                info!(frame = index, "stopped by operator");
                stopped_early = true;
                break;
            }
        }

        info!(
            frames,
            frames_with_pose,
            reps = session.rep_count(),
            "analysis finished"
        );

        Ok(RunSummary {
            frames,
            frames_with_pose,
            stopped_early,
            record: session.finish(),
        })
    }
}
