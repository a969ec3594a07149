//! squat-sentinel: barbell squat rep counting and concentric speed tracking
//! from a recorded video.
//!
//! The hip-flexion angle (shoulder, hip, knee) drives a three-band state
//! machine; each completed rep records the seconds spent rising from the
//! bottom band to lockout. Pose estimation and video I/O live behind the
//! `vision` feature.

pub mod angle;
pub mod camera;
pub mod config;
pub mod error;
pub mod inference;
pub mod landmarks;
pub mod overlay;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod squat;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunSummary, Timing};
pub use session::{Session, SessionRecord};
pub use squat::{RepCounter, Stage};
