use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pipeline::Timing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model_path: String,
    /// Pose presence score and per-landmark visibility floor
    pub min_detection_confidence: f32,
    /// Session log, appended to across runs
    pub log_path: PathBuf,
    pub quit_key: char,
    pub timing: Timing,
    pub show_window: bool,
    pub thresholds: Thresholds,
    pub output: OutputConfig,
}

/// Hip-angle bands, in degrees, that drive the rep stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub bottom: f64,
    pub lockout: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub base_name: String,
    pub extension: String,
    pub fps: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: "models/pose_landmark_full.onnx".to_string(),
            min_detection_confidence: 0.5,
            log_path: PathBuf::from("squat_data.csv"),
            quit_key: 'x',
            timing: Timing::Video,
            show_window: true,
            thresholds: Thresholds::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bottom: 30.0,
            lockout: 130.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            base_name: "squat_analyzed".to_string(),
            extension: "mp4".to_string(),
            fps: 30.0,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
