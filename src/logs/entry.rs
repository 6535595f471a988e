use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::time::{self, InvalidDay, InvalidDuration};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseLogError {
    #[error(transparent)]
    MalformedDate(#[from] InvalidDay),
    #[error(transparent)]
    MalformedDuration(#[from] InvalidDuration),
}

/// A single row of the time sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Log {
    day: NaiveDate,
    #[serde(serialize_with = "time::serialize_duration")]
    duration: Duration,
    description: String,
    particularities: String,
}

impl Log {
    pub fn new(
        day: NaiveDate,
        duration: Duration,
        description: impl Into<String>,
        particularities: impl Into<String>,
    ) -> Self {
        Self {
            day,
            duration,
            description: description.into(),
            particularities: particularities.into(),
        }
    }

    /// Parses the day (`DD/MM/YY`) and duration (`7h30m`) of a log,
    /// the texts are taken as they are.
    pub fn parse(
        day: &str,
        duration: &str,
        description: &str,
        particularities: &str,
    ) -> Result<Self, ParseLogError> {
        Ok(Self::new(
            time::parse_day(day)?,
            time::parse_duration(duration)?,
            description,
            particularities,
        ))
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn particularities(&self) -> &str {
        &self.particularities
    }

    /// The ISO week the log belongs to.
    #[must_use]
    pub fn week_number(&self) -> u32 {
        time::iso_week_number(self.day)
    }
}
