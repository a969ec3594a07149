//! Session recording: operator-supplied date and load plus the rep speeds
//! collected while the video is analyzed.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadUnit {
    Kg,
    Lb,
}

impl FromStr for LoadUnit {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kg" => Ok(LoadUnit::Kg),
            "lb" => Ok(LoadUnit::Lb),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LoadUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadUnit::Kg => f.write_str("kg"),
            LoadUnit::Lb => f.write_str("lb"),
        }
    }
}

/// Weight on the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Load {
    pub magnitude: f64,
    pub unit: LoadUnit,
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDateFormat(input.to_string()))
}

/// Parse `<positive number> <kg|lb>`, unit case-insensitive.
pub fn parse_load(input: &str) -> Result<Load> {
    let invalid = || Error::InvalidWeightFormat(input.to_string());

    let mut parts = input.split_whitespace();
    let (Some(magnitude), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let magnitude: f64 = magnitude.parse().map_err(|_| invalid())?;
    if !magnitude.is_finite() || magnitude <= 0.0 {
        return Err(invalid());
    }
    let unit = unit.parse().map_err(|_| invalid())?;

    Ok(Load { magnitude, unit })
}

/// Finalized summary of one analyzed video.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub load: Load,
    /// Chronological
    pub rep_speeds: Vec<f64>,
    /// `None` when no rep was completed
    pub average_speed: Option<f64>,
}

/// Accumulates rep speeds for the session in progress.
#[derive(Debug, Clone)]
pub struct Session {
    date: NaiveDate,
    load: Load,
    rep_speeds: Vec<f64>,
    average_speed: Option<f64>,
}

impl Session {
    pub fn begin(date: NaiveDate, load: Load) -> Self {
        Self {
            date,
            load,
            rep_speeds: Vec::new(),
            average_speed: None,
        }
    }

    /// Validate raw operator input and start a session.
    pub fn from_input(date: &str, load: &str) -> Result<Self> {
        Ok(Self::begin(parse_date(date)?, parse_load(load)?))
    }

    pub fn record_rep(&mut self, speed: f64) {
        self.rep_speeds.push(speed);
        let total: f64 = self.rep_speeds.iter().sum();
        self.average_speed = Some(total / self.rep_speeds.len() as f64);
    }

    pub fn rep_count(&self) -> usize {
        self.rep_speeds.len()
    }

    pub fn average_speed(&self) -> Option<f64> {
        self.average_speed
    }

    pub fn finish(self) -> SessionRecord {
        SessionRecord {
            date: self.date,
            load: self.load,
            rep_speeds: self.rep_speeds,
            average_speed: self.average_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::from_input("2024-01-15", "100 kg").unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(matches!(
            parse_date("2024-13-40"),
            Err(Error::InvalidDateFormat(_))
        ));
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_load() {
        assert_eq!(
            parse_load("100 kg").unwrap(),
            Load {
                magnitude: 100.0,
                unit: LoadUnit::Kg
            }
        );
        assert_eq!(parse_load("225.5 LB").unwrap().unit, LoadUnit::Lb);
        assert!(matches!(
            parse_load("100 stones"),
            Err(Error::InvalidWeightFormat(_))
        ));
    }

    #[test]
    fn test_parse_load_rejects_malformed() {
        for input in ["100", "kg 100", "100kg", "100 kg extra", "-5 kg", "0 lb", "NaN kg", "inf kg", ""] {
            assert!(parse_load(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_load_display() {
        assert_eq!(parse_load("100 KG").unwrap().to_string(), "100 kg");
        assert_eq!(parse_load("102.5 lb").unwrap().to_string(), "102.5 lb");
    }

    #[test]
    fn test_average_undefined_until_first_rep() {
        let session = session();
        assert_eq!(session.average_speed(), None);
        assert_eq!(session.finish().average_speed, None);
    }

    #[test]
    fn test_average_is_running_mean() {
        let mut session = session();
        session.record_rep(1.5);
        assert_eq!(session.average_speed(), Some(1.5));

        session.record_rep(2.0);
        session.record_rep(1.8);
        let avg = session.average_speed().unwrap();
        assert!((avg - 5.3 / 3.0).abs() < 1e-9);

        let record = session.finish();
        assert_eq!(record.rep_speeds, vec![1.5, 2.0, 1.8]);
        assert_eq!(record.load.unit, LoadUnit::Kg);
    }
}
