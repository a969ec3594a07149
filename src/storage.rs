//! Session log: one CSV file appended to across runs.
//!
//! Layout is sparse: each session writes one row per rep speed, and only the
//! first of those rows carries the date, load and average speed.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::session::{SessionRecord, DATE_FORMAT};

pub const HEADER: [&str; 4] = [
    "Date",
    "Weight Loaded (kg/lb)",
    "Rep Speed (sec/rep)",
    "Avg. Speed (sec/rep)",
];

pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record`, writing the header first if the log is new or empty.
    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        let is_new = match self.path.metadata() {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            info!("Session log does not exist, creating {}", self.path.display());
            writer.write_record(HEADER)?;
        }
        for row in rows(record) {
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!(
            reps = record.rep_speeds.len(),
            "Session saved to {}",
            self.path.display()
        );
        Ok(())
    }
}

/// Rows for one session; a session without reps still gets one row.
pub fn rows(record: &SessionRecord) -> Vec<[String; 4]> {
    let count = record.rep_speeds.len().max(1);

    (0..count)
        .map(|i| {
            let speed = record
                .rep_speeds
                .get(i)
                .map(|s| format!("{s:.2}"))
                .unwrap_or_default();

            if i == 0 {
                [
                    record.date.format(DATE_FORMAT).to_string(),
                    record.load.to_string(),
                    speed,
                    record
                        .average_speed
                        .map(|avg| format!("{avg:.2}"))
                        .unwrap_or_default(),
                ]
            } else {
                [String::new(), String::new(), speed, String::new()]
            }
        })
        .collect()
}
