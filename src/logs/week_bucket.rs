use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::logs::{Cell, Log, ParseLogError};

/// The number of cells every row must have.
pub const REQUIRED_COLUMNS: usize = 4;

// position of each field in a sheet row
const DAY_COLUMN: usize = 0;
const DESCRIPTION_COLUMN: usize = 1;
const PARTICULARITIES_COLUMN: usize = 2;
const DURATION_COLUMN: usize = 3;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MalformedRowReason {
    #[error("expected at least 4 columns, found {0}")]
    TooFewColumns(usize),
    #[error("column {column} holds {kind} `{value}` instead of text")]
    NotText {
        column: usize,
        kind: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GroupError {
    #[error("row {row} is malformed: {reason}")]
    MalformedRow {
        row: usize,
        reason: MalformedRowReason,
    },
    #[error("row {row} has an invalid log")]
    InvalidLog {
        row: usize,
        #[source]
        source: ParseLogError,
    },
}

/// The logs of a sheet, grouped by the ISO week of their day.
///
/// Within a week the logs keep the order of the rows they were read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekBucket {
    weeks: BTreeMap<u32, Vec<Log>>,
}

impl WeekBucket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses all rows and groups them by week.
    ///
    /// The first row that can not be parsed aborts the grouping, no logs are
    /// returned in that case.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, GroupError> {
        let mut bucket = Self::new();

        for (index, row) in rows.iter().enumerate() {
            // 1-based position within the fetched selection, not the sheet row
            bucket.push(parse_row(index + 1, row.as_ref())?);
        }

        debug!(
            "grouped {} logs into {} weeks",
            bucket.logs().count(),
            bucket.len()
        );

        Ok(bucket)
    }

    /// Appends the log to the end of its week.
    pub fn push(&mut self, log: Log) {
        self.weeks.entry(log.week_number()).or_default().push(log);
    }

    #[must_use]
    pub fn get(&self, week: u32) -> Option<&[Log]> {
        self.weeks.get(&week).map(Vec::as_slice)
    }

    /// Iterates over the weeks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Log])> + '_ {
        self.weeks.iter().map(|(week, logs)| (*week, logs.as_slice()))
    }

    pub fn logs(&self) -> impl Iterator<Item = &Log> + '_ {
        self.weeks.values().flatten()
    }

    /// The number of weeks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

fn text_at(row: usize, cells: &[Cell], column: usize) -> Result<&str, GroupError> {
    let cell = &cells[column];
    cell.as_text().ok_or_else(|| GroupError::MalformedRow {
        row,
        reason: MalformedRowReason::NotText {
            column,
            kind: cell.kind(),
            value: cell.to_string(),
        },
    })
}

fn parse_row(row: usize, cells: &[Cell]) -> Result<Log, GroupError> {
    if cells.len() < REQUIRED_COLUMNS {
        return Err(GroupError::MalformedRow {
            row,
            reason: MalformedRowReason::TooFewColumns(cells.len()),
        });
    }

    let day = text_at(row, cells, DAY_COLUMN)?;
    let description = text_at(row, cells, DESCRIPTION_COLUMN)?;
    let particularities = text_at(row, cells, PARTICULARITIES_COLUMN)?;
    let duration = text_at(row, cells, DURATION_COLUMN)?;

    Log::parse(day, duration, description, particularities)
        .map_err(|source| GroupError::InvalidLog { row, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn row(cells: [&str; 4]) -> Vec<Cell> {
        cells.into_iter().map(Cell::from).collect()
    }

    #[test]
    fn test_columns_are_mapped_by_position() {
        let bucket = WeekBucket::from_rows(&[row(["08/01/24", "desc", "note", "2h"])]).unwrap();

        assert_eq!(
            bucket.get(2),
            Some(&[Log::parse("08/01/24", "2h", "desc", "note").unwrap()][..])
        );
    }

    #[test]
    fn test_empty_sheet() {
        let rows: Vec<Vec<Cell>> = Vec::new();
        let bucket = WeekBucket::from_rows(&rows).unwrap();

        assert!(bucket.is_empty());
        assert_eq!(bucket.len(), 0);
    }

    #[test]
    fn test_additional_columns_are_ignored() {
        let mut cells = row(["08/01/24", "desc", "note", "2h"]);
        cells.push(Cell::Number(42.0));
        cells.push(Cell::Empty);

        let bucket = WeekBucket::from_rows(&[cells]).unwrap();
        assert_eq!(bucket.logs().count(), 1);
    }

    #[test]
    fn test_non_text_cell() {
        let mut cells = row(["08/01/24", "desc", "note", "2h"]);
        cells[3] = Cell::Number(2.0);

        assert_eq!(
            WeekBucket::from_rows(&[cells]),
            Err(GroupError::MalformedRow {
                row: 1,
                reason: MalformedRowReason::NotText {
                    column: 3,
                    kind: "number",
                    value: "2".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_empty_cell_is_not_text() {
        let mut cells = row(["08/01/24", "desc", "note", "2h"]);
        cells[2] = Cell::Empty;

        assert!(matches!(
            WeekBucket::from_rows(&[cells]),
            Err(GroupError::MalformedRow {
                row: 1,
                reason: MalformedRowReason::NotText { column: 2, .. },
            })
        ));
    }

    #[test]
    fn test_invalid_log_reports_row() {
        let rows = [
            row(["08/01/24", "desc", "note", "2h"]),
            row(["09/01/24", "desc", "note", "two hours"]),
        ];

        assert!(matches!(
            WeekBucket::from_rows(&rows),
            Err(GroupError::InvalidLog {
                row: 2,
                source: ParseLogError::MalformedDuration(_),
            })
        ));
    }

    #[test]
    fn test_push_keeps_order() {
        let mut bucket = WeekBucket::new();
        let later = Log::parse("05/01/24", "1h", "later", "").unwrap();
        let earlier = Log::parse("01/01/24", "1h", "earlier", "").unwrap();

        bucket.push(later.clone());
        bucket.push(earlier.clone());

        assert_eq!(bucket.get(1), Some(&[later, earlier][..]));
    }
}
