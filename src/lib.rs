mod report_generator;
mod utils;

pub mod input;
pub mod logs;
pub mod pdf;
pub mod render;
pub mod sheets;
pub mod time;

pub use report_generator::ReportGenerator;

use std::io;
use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::input::Config;
use crate::logs::{GroupError, WeekBucket};
use crate::pdf::{ConversionError, PdfConverter};
use crate::render::{TemplateError, TemplateRenderer};
use crate::sheets::{DataSource, SheetError};

/// The stage of the generation that failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to retrieve data from the sheet")]
    Fetch(#[from] SheetError),
    #[error("unable to generate the records from the sheet")]
    Group(#[from] GroupError),
    #[error("unable to render html")]
    Template(#[from] TemplateError),
    #[error("unable to create the directory for `{}`", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to render pdf")]
    Conversion(#[from] ConversionError),
}

/// Creates a pdf for every week in the sheet.
///
/// Returns the paths of the generated files, ordered by week.
pub fn generate_week_reports(
    config: &Config,
    source: &impl DataSource,
) -> Result<Vec<PathBuf>, Error> {
    let sheet = config.sheet();
    let rows = source.fetch_rows(sheet.id(), sheet.selection())?;

    let bucket = WeekBucket::from_rows(&rows)?;
    info!(
        "collected {} logs in {} weeks",
        bucket.logs().count(),
        bucket.len()
    );

    let renderer = TemplateRenderer::load(config.templates_dir(), config.language())?;

    let mut converter = PdfConverter::new(config.converter());
    converter.args(config.converter_args());

    let generated = ReportGenerator::new(config, &renderer, &converter).generate(&bucket)?;
    info!("generated {} reports", generated.len());

    Ok(generated)
}
