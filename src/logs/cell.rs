use derive_more::Display;
use serde::Deserialize;

/// A single value of a sheet row, as returned by the data source.
#[derive(Debug, Clone, Display, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[display("{}", _0)]
    Text(String),
    #[display("{}", _0)]
    Number(f64),
    #[display("{}", _0)]
    Boolean(bool),
    #[display("")]
    Empty,
}

impl Cell {
    /// Returns the text of the cell, if it holds text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// A short name of the kind of value, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Empty => "empty",
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One record of the sheet.
pub type Row = Vec<Cell>;
