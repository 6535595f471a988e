use std::path::Path;

use week_logs::input::Config;
use week_logs::logs::{Cell, Row};
use week_logs::sheets::{DataSource, SheetError};

/// Builds a sheet row from text cells.
#[must_use]
#[allow(dead_code)]
pub fn row(cells: &[&str]) -> Row {
    cells.iter().copied().map(Cell::from).collect()
}

/// A data source that returns the same rows for every request.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct StaticSource {
    pub rows: Vec<Row>,
}

impl StaticSource {
    #[must_use]
    #[allow(dead_code)]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl DataSource for StaticSource {
    fn fetch_rows(&self, _id: &str, _range: &str) -> Result<Vec<Row>, SheetError> {
        Ok(self.rows.clone())
    }
}

/// The json of a config that writes `week-%02d.pdf` into `output`, reads the templates
/// from `templates` and converts with `sh -c <script>`.
///
/// The script gets the output path as `$2`, the html is on stdin.
#[must_use]
#[allow(dead_code)]
pub fn config_json(output: &Path, templates: &Path, script: &str) -> serde_json::Value {
    serde_json::json!({
        "language": "en",
        "name": "John Smith",
        "result": output.join("week-%02d.pdf"),
        "company": { "name": "ACME", "leader": "Jane Doe" },
        "sheet": {
            "id": "sheet-id",
            "selection": "Logs!A2:D",
            "columns": ["Day", "Description", "Particularities", "Duration"]
        },
        "templates": templates,
        "converter": "sh",
        "converter_args": ["-c", script, "sh"],
    })
}

#[must_use]
#[allow(dead_code)]
pub fn make_config(output: &Path, templates: &Path, script: &str) -> Config {
    Config::from_json(&config_json(output, templates, script).to_string())
        .expect("config should be valid")
}
