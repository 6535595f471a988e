mod helpers;
mod template_data;

pub use template_data::*;

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use tera::{Context, Tera};
use thiserror::Error;

use crate::utils::{self, Resources};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("`{0}` is not a valid language, only letters, digits, `-` and `_` are allowed")]
    InvalidLanguage(String),
    #[error("no template for language `{language}` (looked for `{}`)", path.display())]
    NotFound { language: String, path: PathBuf },
    #[error("unable to read the template `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("the embedded template `{0}` is not valid utf-8")]
    NotUtf8(String),
    #[error("unable to parse the template `{name}`")]
    Parse {
        name: String,
        #[source]
        source: tera::Error,
    },
    #[error("unable to render the template `{name}` for week {week}")]
    Render {
        name: String,
        week: u32,
        #[source]
        source: tera::Error,
    },
}

fn is_valid_language(language: &str) -> bool {
    !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Renders the weekly reports with the html template of one language.
pub struct TemplateRenderer {
    tera: Tera,
    name: String,
}

impl TemplateRenderer {
    /// Loads `<dir>/<language>.html`, falling back to the template that is
    /// embedded in the binary.
    pub fn load(dir: impl AsRef<Path>, language: &str) -> Result<Self, TemplateError> {
        if !is_valid_language(language) {
            return Err(TemplateError::InvalidLanguage(language.to_string()));
        }

        let name = format!("{}.html", language);
        let path = dir.as_ref().join(&name);

        let source = if path.exists() {
            debug!("using template: {}", path.display());
            utils::read_to_string(&path).map_err(|source| TemplateError::Read {
                path: path.clone(),
                source,
            })?
        } else if let Some(file) = Resources::get(&format!("templates/{}", name)) {
            debug!("using embedded template: {}", name);
            String::from_utf8(file.data.into_owned())
                .map_err(|_| TemplateError::NotUtf8(name.clone()))?
        } else {
            return Err(TemplateError::NotFound {
                language: language.to_string(),
                path,
            });
        };

        Self::from_source(name, &source)
    }

    /// Parses a template from a string. The name decides about autoescaping,
    /// it is enabled for names ending in `.html`.
    pub fn from_source(name: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let name = name.into();

        let mut tera = Tera::default();
        tera.register_function("date", helpers::date);
        tera.register_function("minutes", helpers::minutes);
        tera.add_raw_template(&name, source)
            .map_err(|source| TemplateError::Parse {
                name: name.clone(),
                source,
            })?;

        Ok(Self { tera, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, data: &TemplateData<'_>) -> Result<String, TemplateError> {
        let render_error = |source| TemplateError::Render {
            name: self.name.clone(),
            week: data.week(),
            source,
        };

        let context = Context::from_serialize(data).map_err(render_error)?;
        self.tera.render(&self.name, &context).map_err(render_error)
    }
}
