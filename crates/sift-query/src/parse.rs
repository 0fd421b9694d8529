use std::fmt;

use bson::{Bson, Document};

use crate::operator::{DisallowedOperator, validate_operators};
use crate::query::{DEFAULT_LIMIT, Query};

/// Parse error for raw query input.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParseError {
    /// The raw blob could not be decoded into a JSON object.
    Malformed(String),
    /// The filter used an operator outside the allow-list.
    DisallowedOperator(DisallowedOperator),
}

impl fmt::Display for QueryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParseError::Malformed(msg) => write!(f, "malformed query input: {msg}"),
            QueryParseError::DisallowedOperator(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for QueryParseError {}

impl From<DisallowedOperator> for QueryParseError {
    fn from(e: DisallowedOperator) -> Self {
        QueryParseError::DisallowedOperator(e)
    }
}

/// Parse a raw query blob into a [`Query`] and validate its operators
/// against `allowed`.
///
/// The raw input is a JSON-encoded object. Reserved keys (`limit`,
/// `offset`, `sort`, `count`, `justOne`; case-sensitive) are destructured
/// out; every remaining key becomes a filter entry verbatim. Blank input
/// decodes to the all-defaults query.
///
/// `limit` and `offset` accept integers, whole doubles, and numeric strings.
/// Absent, falsy, negative, or unparseable values fall back to the defaults
/// (20 and 0), so `limit` is always positive. Sort directions are accepted
/// both numerically (`1` / `-1`) and as string tokens (`"asc"` / `"desc"`
/// and friends) and are normalized to `1` / `-1`.
pub fn parse_query(raw: &str, allowed: &[&str]) -> Result<Query, QueryParseError> {
    if raw.trim().is_empty() {
        return Ok(Query::default());
    }

    let mut doc: Document =
        serde_json::from_str(raw).map_err(|e| QueryParseError::Malformed(e.to_string()))?;

    let limit = match doc.remove("limit") {
        Some(v) => match coerce_window(&v) {
            Some(n) if n > 0 => n,
            _ => DEFAULT_LIMIT,
        },
        None => DEFAULT_LIMIT,
    };

    let offset = match doc.remove("offset") {
        Some(v) => coerce_window(&v).unwrap_or(0),
        None => 0,
    };

    let sort = match doc.remove("sort") {
        None => Document::new(),
        Some(Bson::Document(spec)) => normalize_sort(spec)?,
        Some(_) => {
            return Err(QueryParseError::Malformed(
                "sort must be an object of field: direction pairs".into(),
            ));
        }
    };

    let count = doc.remove("count").as_ref().is_some_and(coerce_flag);
    let just_one = doc.remove("justOne").as_ref().is_some_and(coerce_flag);

    validate_operators(&doc, allowed)?;

    Ok(Query {
        filter: doc,
        limit,
        offset,
        sort,
        count,
        just_one,
    })
}

/// Coerce a pagination value to a non-negative integer.
fn coerce_window(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(n) => u64::try_from(*n).ok(),
        Bson::Int64(n) => u64::try_from(*n).ok(),
        Bson::Double(f) if f.fract() == 0.0 && *f >= 0.0 => Some(*f as u64),
        Bson::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn coerce_flag(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::String(s) => s == "true",
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        _ => false,
    }
}

/// Normalize every direction in a sort spec to `Int32(1)` / `Int32(-1)`.
fn normalize_sort(spec: Document) -> Result<Document, QueryParseError> {
    let mut out = Document::new();
    for (field, direction) in spec {
        let dir = sort_direction(&direction).ok_or_else(|| {
            QueryParseError::Malformed(format!("invalid sort direction for field {field}"))
        })?;
        out.insert(field, Bson::Int32(dir));
    }
    Ok(out)
}

fn sort_direction(value: &Bson) -> Option<i32> {
    match value {
        Bson::Int32(n) if *n != 0 => Some(if *n > 0 { 1 } else { -1 }),
        Bson::Int64(n) if *n != 0 => Some(if *n > 0 { 1 } else { -1 }),
        Bson::Double(f) if *f != 0.0 => Some(if *f > 0.0 { 1 } else { -1 }),
        Bson::String(s) => match s.as_str() {
            "asc" | "ascending" | "1" => Some(1),
            "desc" | "descending" | "-1" => Some(-1),
            _ => None,
        },
        _ => None,
    }
}
