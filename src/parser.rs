// 🏗️ Record Parser - flat file lines → typed records
//
// Both stores use the same layout: one record per line, fields separated by
// commas, no quoting and no escaping. Every line comes back either as a
// record or as a LineDefect, so data loss is visible instead of silent.

use crate::error::RecordError;
use anyhow::{Context, Result};
use std::fmt;

// ============================================================================
// CORE TYPES
// ============================================================================

/// FlatRecord - a type that lives on exactly one comma-separated line
pub trait FlatRecord: Sized {
    /// Build the record from the already split fields of one line
    fn from_fields(fields: &[String]) -> std::result::Result<Self, RecordError>;

    /// Serialize back to a single line (no trailing newline)
    fn to_line(&self) -> String;
}

/// A persisted line that did not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDefect {
    /// 1-based line number in the store
    pub line_number: u64,
    /// The line exactly as stored
    pub raw: String,
    pub error: RecordError,
}

impl fmt::Display for LineDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line_number, self.error, self.raw)
    }
}

/// Result of parsing one line: the record, or why it was rejected
pub type ParsedLine<T> = std::result::Result<T, LineDefect>;

// ============================================================================
// PARSING
// ============================================================================

/// Split store text into raw field lists, keeping line numbers
///
/// Blank lines are skipped. Quote characters carry no meaning in these
/// files, so the csv reader runs with quoting disabled.
pub fn split_lines(text: &str) -> Result<Vec<(u64, Vec<String>)>> {
    use csv::ReaderBuilder;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(b',')
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record {}", index + 1))?;

        let line_number = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);

        let fields = record.iter().map(|f| f.to_string()).collect();
        lines.push((line_number, fields));
    }

    Ok(lines)
}

/// Parse every line of a store into records or defects, in store order
pub fn parse_records<T: FlatRecord>(text: &str) -> Result<Vec<ParsedLine<T>>> {
    let parsed = split_lines(text)?
        .into_iter()
        .map(|(line_number, fields)| {
            T::from_fields(&fields).map_err(|error| LineDefect {
                line_number,
                raw: fields.join(","),
                error,
            })
        })
        .collect();

    Ok(parsed)
}

/// Keep the valid records, logging each skipped line
pub fn skip_defects<T>(parsed: Vec<ParsedLine<T>>, source: &str) -> Vec<T> {
    parsed
        .into_iter()
        .filter_map(|line| match line {
            Ok(record) => Some(record),
            Err(defect) => {
                tracing::warn!(store = source, %defect, "skipping malformed line");
                None
            }
        })
        .collect()
}

/// Ensure a field list has exactly `expected` entries
pub fn expect_fields(fields: &[String], expected: usize) -> std::result::Result<(), RecordError> {
    if fields.len() != expected {
        return Err(RecordError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        key: String,
        value: i64,
    }

    impl FlatRecord for Pair {
        fn from_fields(fields: &[String]) -> std::result::Result<Self, RecordError> {
            expect_fields(fields, 2)?;
            let value = fields[1].trim().parse().map_err(|_| RecordError::InvalidNumber {
                field: "value",
                value: fields[1].clone(),
            })?;
            Ok(Pair {
                key: fields[0].clone(),
                value,
            })
        }

        fn to_line(&self) -> String {
            format!("{},{}", self.key, self.value)
        }
    }

    #[test]
    fn test_split_lines_skips_blank_lines() {
        let lines = split_lines("a,1\n\nb,2\n").unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (1, vec!["a".to_string(), "1".to_string()]));
        assert_eq!(lines[1].0, 3, "Line numbers should count the blank line");
    }

    #[test]
    fn test_split_lines_keeps_quotes_literal() {
        let lines = split_lines("\"a,b\",1\n").unwrap();

        assert_eq!(lines[0].1, vec!["\"a", "b\"", "1"]);
    }

    #[test]
    fn test_parse_records_reports_defects() {
        let parsed: Vec<ParsedLine<Pair>> = parse_records("a,1\nbroken\nc,x\nd,4\n").unwrap();

        assert_eq!(parsed.len(), 4);
        assert_eq!(
            parsed[0],
            Ok(Pair {
                key: "a".to_string(),
                value: 1
            })
        );

        let defect = parsed[1].as_ref().unwrap_err();
        assert_eq!(defect.line_number, 2);
        assert_eq!(defect.raw, "broken");
        assert_eq!(
            defect.error,
            RecordError::FieldCount {
                expected: 2,
                found: 1
            }
        );

        let defect = parsed[2].as_ref().unwrap_err();
        assert_eq!(defect.raw, "c,x");
        assert!(matches!(defect.error, RecordError::InvalidNumber { .. }));
    }

    #[test]
    fn test_skip_defects_keeps_valid_in_order() {
        let parsed: Vec<ParsedLine<Pair>> = parse_records("a,1\nbroken\nd,4\n").unwrap();
        let valid = skip_defects(parsed, "test");

        let keys: Vec<&str> = valid.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "d"]);
    }
}
