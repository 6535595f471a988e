use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("day `{0}` does not match the format DD/MM/YY")]
pub struct InvalidDay(String);

/// Parses a day in the strict `DD/MM/YY` format.
///
/// Two-digit years from 69 onwards belong to the 20th century, everything
/// below to the 21st.
pub fn parse_day(input: &str) -> Result<NaiveDate, InvalidDay> {
    let invalid = || InvalidDay(input.to_string());

    let bytes = input.as_bytes();
    if bytes.len() != 8 || bytes[2] != b'/' || bytes[5] != b'/' {
        return Err(invalid());
    }

    let two_digits = |start: usize| -> Option<u32> {
        let (tens, ones) = (bytes[start], bytes[start + 1]);
        if tens.is_ascii_digit() && ones.is_ascii_digit() {
            Some(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
        } else {
            None
        }
    };

    let day = two_digits(0).ok_or_else(invalid)?;
    let month = two_digits(3).ok_or_else(invalid)?;
    let short_year = two_digits(6).ok_or_else(invalid)?;

    let year = if short_year >= 69 {
        1900 + short_year
    } else {
        2000 + short_year
    };

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}
