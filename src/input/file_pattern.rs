use std::path::PathBuf;

use derive_more::Display;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidFilePattern {
    #[error("file pattern `{0}` has no placeholder for the week number (like `%02d`)")]
    MissingPlaceholder(String),
    #[error("file pattern `{0}` has more than one placeholder for the week number")]
    TooManyPlaceholders(String),
    #[error("file pattern `{pattern}` uses unsupported directive `%{verb}`")]
    UnsupportedDirective { pattern: String, verb: char },
    #[error("file pattern `{0}` ends with an incomplete directive")]
    IncompleteDirective(String),
    #[error("file pattern `{0}` has a width larger than 1000000")]
    WidthTooLarge(String),
}

/// The largest width a placeholder may have.
const MAX_WIDTH: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Padding {
    /// `%5d`
    Spaces,
    /// `%05d`
    Zeros,
    /// `%-5d`
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder {
    padding: Padding,
    width: usize,
}

/// The name of the generated pdf files, with a printf-style placeholder
/// for the week number (`week-%02d.pdf`).
#[derive(Debug, Clone, Display, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
#[display("{}", source)]
pub struct FilePattern {
    source: String,
    prefix: String,
    placeholder: Placeholder,
    suffix: String,
}

impl FilePattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self, InvalidFilePattern> {
        let source = pattern.into();

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut placeholder = None;

        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            let literal = if placeholder.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };

            if c != '%' {
                literal.push(c);
                continue;
            }

            if chars.next_if_eq(&'%').is_some() {
                literal.push('%');
                continue;
            }

            let mut padding = Padding::Spaces;
            while let Some(flag) = chars.next_if(|&c| c == '0' || c == '-') {
                padding = match (flag, padding) {
                    ('-', _) | (_, Padding::Trailing) => Padding::Trailing,
                    _ => Padding::Zeros,
                };
            }

            let mut width: usize = 0;
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                width = width
                    .checked_mul(10)
                    .and_then(|width| width.checked_add(digit as usize - '0' as usize))
                    .filter(|&width| width <= MAX_WIDTH)
                    .ok_or_else(|| InvalidFilePattern::WidthTooLarge(source.clone()))?;
            }

            match chars.next() {
                Some('d' | 'v') if placeholder.is_none() => {
                    placeholder = Some(Placeholder { padding, width });
                }
                Some('d' | 'v') => return Err(InvalidFilePattern::TooManyPlaceholders(source)),
                Some(verb) => {
                    return Err(InvalidFilePattern::UnsupportedDirective {
                        pattern: source,
                        verb,
                    })
                }
                None => return Err(InvalidFilePattern::IncompleteDirective(source)),
            }
        }

        let placeholder =
            placeholder.ok_or_else(|| InvalidFilePattern::MissingPlaceholder(source.clone()))?;

        Ok(Self {
            source,
            prefix,
            placeholder,
            suffix,
        })
    }

    /// The file name for the given week.
    #[must_use]
    pub fn file_name(&self, week: u32) -> PathBuf {
        let width = self.placeholder.width;
        let number = match self.placeholder.padding {
            Padding::Spaces => format!("{:>width$}", week),
            Padding::Zeros => format!("{:0width$}", week),
            Padding::Trailing => format!("{:<width$}", week),
        };

        PathBuf::from(format!("{}{}{}", self.prefix, number, self.suffix))
    }
}

impl TryFrom<String> for FilePattern {
    type Error = InvalidFilePattern;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn file_name(pattern: &str, week: u32) -> String {
        FilePattern::new(pattern)
            .expect("pattern should be valid")
            .file_name(week)
            .display()
            .to_string()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("week-%02d.pdf", 3), "week-03.pdf");
        assert_eq!(file_name("week-%02d.pdf", 42), "week-42.pdf");
        assert_eq!(file_name("week-%d.pdf", 7), "week-7.pdf");
        assert_eq!(file_name("week-%v.pdf", 7), "week-7.pdf");
        assert_eq!(file_name("pdfs/%03d.pdf", 5), "pdfs/005.pdf");
        assert_eq!(file_name("[%3d]", 5), "[  5]");
        assert_eq!(file_name("[%-3d]", 5), "[5  ]");
        assert_eq!(file_name("[%0-3d]", 5), "[5  ]");
        assert_eq!(file_name("100%%-%d.pdf", 1), "100%-1.pdf");
        assert_eq!(file_name("%d", 53), "53");
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            FilePattern::new("week.pdf"),
            Err(InvalidFilePattern::MissingPlaceholder("week.pdf".into()))
        );
        assert_eq!(
            FilePattern::new("%d-%d.pdf"),
            Err(InvalidFilePattern::TooManyPlaceholders("%d-%d.pdf".into()))
        );
        assert_eq!(
            FilePattern::new("week-%s.pdf"),
            Err(InvalidFilePattern::UnsupportedDirective {
                pattern: "week-%s.pdf".into(),
                verb: 's'
            })
        );
        assert_eq!(
            FilePattern::new("week-%02"),
            Err(InvalidFilePattern::IncompleteDirective("week-%02".into()))
        );
    }

    #[test]
    fn test_width_too_large() {
        for pattern in ["week-%99999999999999999999999d.pdf", "week-%2000000000000d.pdf"] {
            assert_eq!(
                FilePattern::new(pattern),
                Err(InvalidFilePattern::WidthTooLarge(pattern.into()))
            );
        }

        assert_eq!(
            file_name("%1000000d", 1).len(),
            1_000_000,
            "the largest width is still accepted"
        );
    }

    #[test]
    fn test_deserialize_huge_width() {
        let json = "\"week-%99999999999999999999999d.pdf\"";
        assert!(serde_json::from_str::<FilePattern>(json).is_err());
    }

    #[test]
    fn test_deserialize() {
        let pattern: FilePattern = serde_json::from_str("\"week-%02d.pdf\"").unwrap();
        assert_eq!(pattern.to_string(), "week-%02d.pdf");

        assert!(serde_json::from_str::<FilePattern>("\"week.pdf\"").is_err());
    }
}
