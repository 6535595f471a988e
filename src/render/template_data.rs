use std::time::Duration;

use serde::Serialize;

use crate::input::{Company, Config};
use crate::logs::Log;
use crate::time;

/// Everything a template can access when rendering the report of one week.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData<'a> {
    name: &'a str,
    week: u32,
    logs: &'a [Log],
    company: &'a Company,
    columns: &'a [String],
    /// The sum of all durations in `logs`.
    #[serde(serialize_with = "time::serialize_duration")]
    total: Duration,
}

impl<'a> TemplateData<'a> {
    pub fn new(config: &'a Config, week: u32, logs: &'a [Log]) -> Self {
        Self {
            name: config.name(),
            week,
            logs,
            company: config.company(),
            columns: config.sheet().columns(),
            total: logs.iter().map(Log::duration).sum(),
        }
    }

    pub fn week(&self) -> u32 {
        self.week
    }
}
