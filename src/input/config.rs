use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::FilePattern;
use crate::utils;

const DEFAULT_TEMPLATES_DIR: &str = "templates";
const DEFAULT_CONVERTER: &str = "wkhtmltopdf";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read the config file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse the config file `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    name: String,
    leader: String,
}

impl Company {
    pub fn new(name: impl Into<String>, leader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            leader: leader.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn leader(&self) -> &str {
        &self.leader
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sheet {
    id: String,
    selection: String,
    #[serde(default)]
    columns: Vec<String>,
}

impl Sheet {
    /// The spreadsheet id, as found in the sheet url.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The range to read, in A1 notation (`Logs!A2:D`).
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Labels for the table header in the report.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Everything read from `config.json`.
///
/// It is loaded once and passed by reference to everything that needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    language: String,
    name: String,
    result: FilePattern,
    company: Company,
    sheet: Sheet,
    #[serde(default)]
    templates: Option<PathBuf>,
    #[serde(default)]
    converter: Option<PathBuf>,
    #[serde(default)]
    converter_args: Vec<String>,
}

impl Config {
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = utils::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Selects the template, `<templates>/<language>.html`.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the pdf that is generated for the given week.
    #[must_use]
    pub fn result_file(&self, week: u32) -> PathBuf {
        self.result.file_name(week)
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn templates_dir(&self) -> &Path {
        self.templates
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_TEMPLATES_DIR))
    }

    /// The html to pdf converter, invoked as `<converter> [args] - <output>`.
    pub fn converter(&self) -> &Path {
        self.converter
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONVERTER))
    }

    /// Additional arguments for the converter, like `["--page-size", "A4"]`.
    pub fn converter_args(&self) -> &[String] {
        &self.converter_args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"{
        "language": "de",
        "name": "John Smith",
        "result": "week-%02d.pdf",
        "company": { "name": "ACME", "leader": "Jane Doe" },
        "sheet": {
            "id": "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms",
            "selection": "Logs!A2:D",
            "columns": ["Datum", "Tätigkeit", "Besonderheiten", "Dauer"]
        }
    }"#;

    #[test]
    fn test_parse_config() {
        let config = Config::from_json(CONFIG).expect("config should be valid");

        assert_eq!(config.language(), "de");
        assert_eq!(config.name(), "John Smith");
        assert_eq!(config.result_file(3), PathBuf::from("week-03.pdf"));
        assert_eq!(config.company(), &Company::new("ACME", "Jane Doe"));
        assert_eq!(config.sheet().selection(), "Logs!A2:D");
        assert_eq!(
            config.sheet().columns(),
            &["Datum", "Tätigkeit", "Besonderheiten", "Dauer"]
        );
        assert_eq!(config.templates_dir(), Path::new("templates"));
        assert_eq!(config.converter(), Path::new("wkhtmltopdf"));
        assert!(config.converter_args().is_empty());
    }

    #[test]
    fn test_optional_paths() {
        let json = CONFIG.replacen(
            "\"language\"",
            concat!(
                "\"templates\": \"/srv/reports\",",
                "\"converter\": \"/opt/bin/wkhtmltopdf\",",
                "\"converter_args\": [\"--quiet\"],",
                "\"language\"",
            ),
            1,
        );
        let config = Config::from_json(&json).expect("config should be valid");

        assert_eq!(config.templates_dir(), Path::new("/srv/reports"));
        assert_eq!(config.converter(), Path::new("/opt/bin/wkhtmltopdf"));
        assert_eq!(config.converter_args(), &["--quiet"]);
    }

    #[test]
    fn test_invalid_result_pattern() {
        let json = CONFIG.replace("week-%02d.pdf", "week.pdf");
        assert!(Config::from_json(&json).is_err());
    }

    #[test]
    fn test_result_width_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            CONFIG.replace("week-%02d.pdf", "week-%99999999999999999999999d.pdf"),
        )
        .unwrap();

        assert!(matches!(
            Config::try_from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_field() {
        let json = CONFIG.replace("\"name\": \"John Smith\",", "");
        assert!(Config::from_json(&json).is_err());
    }

    #[test]
    fn test_try_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(matches!(
            Config::try_from_file(&path),
            Err(ConfigError::Read { .. })
        ));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::try_from_file(&path),
            Err(ConfigError::Parse { .. })
        ));

        fs::write(&path, CONFIG).unwrap();
        assert_eq!(Config::try_from_file(&path).unwrap().name(), "John Smith");
    }
}
