use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duration `{0}` is not a valid elapsed time (expected something like `2h30m`)")]
pub struct InvalidDuration(String);

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_in_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3600 * NANOS_PER_SEC,
        _ => return None,
    })
}

fn split_digits(input: &str) -> (&str, &str) {
    let len = input.bytes().take_while(u8::is_ascii_digit).count();
    input.split_at(len)
}

/// Parses an elapsed time like `9h`, `7h30m` or `1.5h`.
///
/// The input is a sequence of decimal numbers, each followed by a unit
/// (`h`, `m`, `s`, `ms`, `us`/`µs`, `ns`). A leading `+` is allowed, a
/// leading `-` is not. The lone string `0` is the zero duration.
pub fn parse_duration(input: &str) -> Result<Duration, InvalidDuration> {
    let invalid = || InvalidDuration(input.to_string());

    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (integer, after) = split_digits(rest);
        let (fraction, after) = match after.strip_prefix('.') {
            Some(after) => split_digits(after),
            None => ("", after),
        };

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        let scale = unit_in_nanos(unit).ok_or_else(invalid)?;

        let integer: u128 = if integer.is_empty() {
            0
        } else {
            integer.parse().map_err(|_| invalid())?
        };
        let mut value = integer.checked_mul(scale).ok_or_else(invalid)?;

        // digits beyond nanosecond precision of an hour do not matter
        let fraction = &fraction[..fraction.len().min(18)];
        if !fraction.is_empty() {
            let digits: u128 = fraction.parse().map_err(|_| invalid())?;
            value += digits * scale / 10u128.pow(fraction.len() as u32);
        }

        total = total.checked_add(value).ok_or_else(invalid)?;
        rest = after;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

fn decimal(integer: u64, fraction: u64, digits: usize) -> String {
    if fraction == 0 {
        return integer.to_string();
    }

    let fraction = format!("{:0width$}", fraction, width = digits);
    format!("{}.{}", integer, fraction.trim_end_matches('0'))
}

/// Formats a duration in its canonical form, e.g. `7h30m0s` or `1.5s`.
///
/// The output is accepted by [`parse_duration`].
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.subsec_nanos() as u64;
    let secs = duration.as_secs();

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            1..=999 => format!("{}ns", nanos),
            1_000..=999_999 => format!("{}µs", decimal(nanos / 1_000, nanos % 1_000, 3)),
            _ => format!("{}ms", decimal(nanos / 1_000_000, nanos % 1_000_000, 6)),
        };
    }

    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = decimal(secs % 60, nanos, 9);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Total number of minutes, including fractions of a minute.
#[must_use]
pub fn as_minutes(duration: Duration) -> f64 {
    duration.as_secs_f64() / 60.0
}

/// Formats the duration as minutes with a `min` suffix, e.g. `150min`.
#[must_use]
pub fn format_minutes(duration: Duration) -> String {
    format!("{}min", as_minutes(duration))
}

/// Serializes a [`Duration`] in its canonical text form.
pub fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_duration(*duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const fn mins(minutes: u64) -> Duration {
        Duration::from_secs(minutes * 60)
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("9h"), Ok(mins(9 * 60)));
        assert_eq!(parse_duration("7h30m"), Ok(mins(7 * 60 + 30)));
        assert_eq!(parse_duration("2h30m"), Ok(mins(150)));
        assert_eq!(parse_duration("90m"), Ok(mins(90)));
        assert_eq!(parse_duration("1.5h"), Ok(mins(90)));
        assert_eq!(parse_duration("+45m"), Ok(mins(45)));
        assert_eq!(parse_duration("1h0m30s"), Ok(Duration::from_secs(3630)));
        assert_eq!(parse_duration(".5s"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("3µs"), Ok(Duration::from_micros(3)));
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("0h"), Ok(Duration::ZERO));
    }

    #[test]
    fn test_parse_duration_rejects_malformed() {
        for input in [
            "", "+", "9", "h", "-1h", "9 h", "9hours", "1d", "1h30", "..5h", "1h 30m", "9:00",
        ] {
            assert_eq!(
                parse_duration(input),
                Err(InvalidDuration(input.to_string())),
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert!(parse_duration("99999999999999999999999999999999999999999h").is_err());
        assert!(parse_duration("9999999999999999999h").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(mins(9 * 60)), "9h0m0s");
        assert_eq!(format_duration(mins(7 * 60 + 30)), "7h30m0s");
        assert_eq!(format_duration(mins(45)), "45m0s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
    }

    #[test]
    fn test_canonical_form_parses_back() {
        for duration in [
            mins(150),
            Duration::from_millis(90_500),
            Duration::from_micros(1_250),
            Duration::from_secs(3 * 3600 + 1),
        ] {
            assert_eq!(parse_duration(&format_duration(duration)), Ok(duration));
        }
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(mins(150)), "150min");
        assert_eq!(format_minutes(Duration::from_secs(90 * 60 + 30)), "90.5min");
        assert_eq!(format_minutes(Duration::ZERO), "0min");
    }
}
