//! Console prompts that re-ask until the operator gives a valid answer.

use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::session::{parse_date, parse_load, Load};

pub const VIDEO_EXTENSIONS: [&str; 20] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpeg", "mpg", "3gp", "3g2", "m2v",
    "ts", "ogg", "ogv", "qt", "rm", "rmvb", "vob",
];

/// Existing file with a known video extension.
pub fn validate_video_path(input: &str) -> Result<PathBuf> {
    let path = Path::new(input.trim());
    let invalid = |reason| Error::InvalidVideoPath {
        path: input.to_string(),
        reason,
    };

    if !path.is_file() {
        return Err(invalid("file not found"));
    }
    let known = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !known {
        return Err(invalid("not a supported video format"));
    }

    Ok(path.to_path_buf())
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn video_path(&mut self) -> Result<PathBuf> {
        self.ask("Enter path to video: ", "video path", validate_video_path)
    }

    pub fn date(&mut self) -> Result<NaiveDate> {
        self.ask("Enter the date (YYYY-MM-DD): ", "date", parse_date)
    }

    pub fn load(&mut self) -> Result<Load> {
        self.ask(
            "Enter the weight loaded on the bar (kg/lb): ",
            "weight",
            parse_load,
        )
    }

    fn ask<T>(
        &mut self,
        question: &str,
        what: &'static str,
        validate: impl Fn(&str) -> Result<T>,
    ) -> Result<T> {
        loop {
            write!(self.output, "{question}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::InputClosed(what));
            }

            match validate(line.trim_end_matches(['\r', '\n'])) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(%err, "rejected {what}");
                    writeln!(self.output, "{err}")?;
                }
            }
        }
    }
}
