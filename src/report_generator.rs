use std::path::PathBuf;

use log::{debug, info};

use crate::input::Config;
use crate::logs::{Log, WeekBucket};
use crate::pdf::PdfConverter;
use crate::render::{TemplateData, TemplateError, TemplateRenderer};
use crate::utils;
use crate::Error;

/// Turns the logs of each week into a pdf.
pub struct ReportGenerator<'a> {
    config: &'a Config,
    renderer: &'a TemplateRenderer,
    converter: &'a PdfConverter,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(
        config: &'a Config,
        renderer: &'a TemplateRenderer,
        converter: &'a PdfConverter,
    ) -> Self {
        Self {
            config,
            renderer,
            converter,
        }
    }

    pub fn render_week(&self, week: u32, logs: &[Log]) -> Result<String, TemplateError> {
        self.renderer
            .render(&TemplateData::new(self.config, week, logs))
    }

    /// Renders and converts the report of one week, returns the path of the pdf.
    pub fn generate_week(&self, week: u32, logs: &[Log]) -> Result<PathBuf, Error> {
        info!("generating report for week {} ({} logs)", week, logs.len());
        debug!("rendering with template `{}`", self.renderer.name());
        let html = self.render_week(week, logs)?;

        let output = self.config.result_file(week);
        utils::create_parent_dir(&output).map_err(|source| Error::Output {
            path: output.clone(),
            source,
        })?;

        self.converter.convert(&html, &output)?;

        Ok(output)
    }

    /// Generates one pdf per week. The first failure stops the generation,
    /// pdfs that have already been written are kept.
    pub fn generate(&self, bucket: &WeekBucket) -> Result<Vec<PathBuf>, Error> {
        bucket
            .iter()
            .map(|(week, logs)| self.generate_week(week, logs))
            .collect()
    }
}
