//! Functions available inside the report templates.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use tera::{Error, Result, Value};

use crate::time;

fn argument<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> Result<&'a Value> {
    args.get(name).ok_or_else(|| {
        Error::msg(format!(
            "`{}` is missing the argument `{}`",
            function, name
        ))
    })
}

fn str_argument<'a>(
    function: &str,
    args: &'a HashMap<String, Value>,
    name: &str,
) -> Result<&'a str> {
    argument(function, args, name)?.as_str().ok_or_else(|| {
        Error::msg(format!(
            "the argument `{}` of `{}` must be a string",
            name, function
        ))
    })
}

/// Formats a date with a strftime pattern, failing on invalid patterns.
pub fn format_date(day: NaiveDate, pattern: &str) -> Result<String> {
    let items = StrftimeItems::new(pattern).collect::<Vec<_>>();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::msg(format!("invalid date format `{}`", pattern)));
    }

    let mut result = String::new();
    write!(result, "{}", day.format_with_items(items.iter())).map_err(|_| {
        Error::msg(format!(
            "date format `{}` can not be applied to a day",
            pattern
        ))
    })?;

    Ok(result)
}

/// `date(format="%d.%m.%Y", value=log.day)`
pub fn date(args: &HashMap<String, Value>) -> Result<Value> {
    let pattern = str_argument("date", args, "format")?;
    let value = str_argument("date", args, "value")?;

    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::chain(format!("`{}` is not a date", value), e))?;

    format_date(day, pattern).map(Value::String)
}

/// `minutes(value=log.duration)`, the duration is either in its text form
/// (`7h30m0s`) or a number of seconds.
pub fn minutes(args: &HashMap<String, Value>) -> Result<Value> {
    let duration = match argument("minutes", args, "value")? {
        Value::String(text) => {
            time::parse_duration(text).map_err(|e| Error::chain("invalid duration", e))?
        }
        Value::Number(seconds) => seconds
            .as_f64()
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            .ok_or_else(|| {
                Error::msg(format!("`{}` is not a valid number of seconds", seconds))
            })?,
        other => {
            return Err(Error::msg(format!(
                "`minutes` expects a duration, found `{}`",
                other
            )))
        }
    };

    Ok(Value::String(time::format_minutes(duration)))
}
