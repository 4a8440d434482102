use chrono::NaiveDate;

use super::QueryError;

/// How the value of a qualifier is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierKind {
    /// Integer with an optional comparison operator, or an `a..b` range.
    NumberOrRange,
    /// Plain string compared for equality by GitHub (language, license).
    EqualityString,
    /// `YYYY-MM-DD` with an optional comparison operator.
    Date,
}

/// Every qualifier the service accepts. Anything else is rejected before reaching GitHub.
const QUALIFIERS: [(&str, QualifierKind); 9] = [
    ("size", QualifierKind::NumberOrRange),
    ("topics", QualifierKind::NumberOrRange),
    ("stars", QualifierKind::NumberOrRange),
    ("followers", QualifierKind::NumberOrRange),
    ("forks", QualifierKind::NumberOrRange),
    ("license", QualifierKind::EqualityString),
    ("language", QualifierKind::EqualityString),
    ("created", QualifierKind::Date),
    ("pushed", QualifierKind::Date),
];

/// Comparison prefixes, two-character operators first.
const OPERATORS: [&str; 4] = [">=", "<=", ">", "<"];

impl QualifierKind {
    pub fn of(qualifier: &str) -> Option<Self> {
        QUALIFIERS
            .iter()
            .find(|(name, _)| *name == qualifier)
            .map(|(_, kind)| *kind)
    }

    pub fn validate(self, qualifier: &str, value: &str) -> Result<(), QueryError> {
        if value.is_empty() {
            return Err(QueryError::EmptyValue(qualifier.to_string()));
        }
        match self {
            QualifierKind::NumberOrRange => validate_number(qualifier, value),
            QualifierKind::EqualityString => validate_equality(qualifier, value),
            QualifierKind::Date => validate_date(qualifier, value),
        }
    }
}

/// Strip one leading comparison operator, if any.
pub fn strip_operator(value: &str) -> &str {
    OPERATORS
        .iter()
        .find_map(|op| value.strip_prefix(*op))
        .unwrap_or(value)
}

fn is_integer(s: &str) -> bool {
    s.parse::<i64>().is_ok()
}

fn validate_number(qualifier: &str, value: &str) -> Result<(), QueryError> {
    if value.contains("..") {
        return validate_range(qualifier, value);
    }

    let number = strip_operator(value);
    if number.is_empty() {
        return Err(QueryError::MissingNumber(qualifier.to_string()));
    }
    if !is_integer(number) {
        return Err(QueryError::InvalidNumber {
            qualifier: qualifier.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn validate_range(qualifier: &str, value: &str) -> Result<(), QueryError> {
    let invalid = || QueryError::InvalidRange {
        qualifier: qualifier.to_string(),
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.split("..").collect();
    let [start, end] = parts.as_slice() else {
        return Err(invalid());
    };
    let (Ok(start), Ok(end)) = (start.parse::<i64>(), end.parse::<i64>()) else {
        return Err(invalid());
    };
    if start >= end {
        return Err(QueryError::RangeOrder {
            qualifier: qualifier.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn validate_date(qualifier: &str, value: &str) -> Result<(), QueryError> {
    let date = strip_operator(value);
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(QueryError::InvalidDate {
            qualifier: qualifier.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn validate_equality(qualifier: &str, value: &str) -> Result<(), QueryError> {
    if is_integer(value) {
        return Err(QueryError::NumericEquality(qualifier.to_string()));
    }
    if value.trim().is_empty() {
        return Err(QueryError::BlankValue(qualifier.to_string()));
    }
    Ok(())
}
