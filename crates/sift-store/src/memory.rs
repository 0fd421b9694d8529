use std::cmp::Ordering;
use std::sync::RwLock;

use bson::{Bson, Document};

use crate::error::StoreError;
use crate::plan::FindPlan;
use crate::store::Datastore;

/// In-memory [`Datastore`] adapter.
///
/// Reference implementation of the contract and the fixture for integration
/// tests. Filter evaluation is an implicit AND across top-level entries; a
/// sub-document whose first key starts with `$` is an operator document
/// (`$eq $ne $gt $gte $lt $lte $in $nin $exists $regex`), anything else is an
/// equality match. Populate directives are accepted and ignored since this
/// adapter has no relations. Reads are not snapshot-isolated: a `count`
/// followed by a `find` may observe different states under concurrent
/// writes, the same race a real document store exhibits.
pub struct MemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, doc: Document) {
        self.docs.write().unwrap().push(doc);
    }

    pub fn insert_many(&self, docs: impl IntoIterator<Item = Document>) {
        self.docs.write().unwrap().extend(docs);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Datastore for MemoryStore {
    fn count(&self, filter: &Document) -> Result<u64, StoreError> {
        let docs = self.docs.read().unwrap();
        let mut n = 0u64;
        for doc in docs.iter() {
            if matches_filter(doc, filter)? {
                n += 1;
            }
        }
        Ok(n)
    }

    fn find(&self, plan: &FindPlan) -> Result<Vec<Document>, StoreError> {
        let mut matched = Vec::new();
        {
            let docs = self.docs.read().unwrap();
            for doc in docs.iter() {
                if matches_filter(doc, &plan.filter)? {
                    matched.push(doc.clone());
                }
            }
        }

        if !plan.sort.is_empty() {
            matched.sort_by(|a, b| compare_by_sort(a, b, &plan.sort));
        }

        let skip = usize::try_from(plan.skip).unwrap_or(usize::MAX);
        let take = plan
            .limit
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(skip).take(take).collect())
    }

    fn run_pipeline(&self, _stages: &[Document]) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Backend(
            "aggregation pipelines are not supported by the memory adapter".into(),
        ))
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (field, condition) in filter {
        if !matches_condition(doc, field, condition)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn matches_condition(doc: &Document, field: &str, condition: &Bson) -> Result<bool, StoreError> {
    if let Bson::Document(ops) = condition {
        if ops.keys().next().is_some_and(|k| k.starts_with('$')) {
            return matches_operators(doc.get(field), ops);
        }
    }
    Ok(doc.get(field).is_some_and(|v| bson_eq(v, condition)))
}

fn matches_operators(value: Option<&Bson>, ops: &Document) -> Result<bool, StoreError> {
    for (op, operand) in ops {
        let hit = match op.as_str() {
            "$eq" => value.is_some_and(|v| bson_eq(v, operand)),
            "$ne" => !value.is_some_and(|v| bson_eq(v, operand)),
            "$gt" => ordered(value, operand, |o| o == Ordering::Greater),
            "$gte" => ordered(value, operand, |o| o != Ordering::Less),
            "$lt" => ordered(value, operand, |o| o == Ordering::Less),
            "$lte" => ordered(value, operand, |o| o != Ordering::Greater),
            "$in" => in_set(value, operand)?,
            "$nin" => !in_set(value, operand)?,
            "$exists" => match operand {
                Bson::Boolean(want) => value.is_some() == *want,
                _ => {
                    return Err(StoreError::InvalidFilter(
                        "$exists operand must be a boolean".into(),
                    ));
                }
            },
            "$regex" => matches_regex(value, operand)?,
            other => {
                return Err(StoreError::InvalidFilter(format!(
                    "unsupported operator: {other}"
                )));
            }
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

fn ordered(value: Option<&Bson>, operand: &Bson, accept: impl Fn(Ordering) -> bool) -> bool {
    value.is_some_and(|v| accept(compare_bson(v, operand)))
}

fn in_set(value: Option<&Bson>, operand: &Bson) -> Result<bool, StoreError> {
    let Bson::Array(set) = operand else {
        return Err(StoreError::InvalidFilter(
            "$in/$nin operand must be an array".into(),
        ));
    };
    Ok(value.is_some_and(|v| set.iter().any(|member| bson_eq(v, member))))
}

fn matches_regex(value: Option<&Bson>, operand: &Bson) -> Result<bool, StoreError> {
    let Bson::String(pattern) = operand else {
        return Err(StoreError::InvalidFilter(
            "$regex operand must be a string".into(),
        ));
    };
    let re = regex::Regex::new(pattern)
        .map_err(|e| StoreError::InvalidFilter(format!("invalid $regex pattern: {e}")))?;
    Ok(matches!(value, Some(Bson::String(s)) if re.is_match(s)))
}

/// Equality that treats the numeric BSON types as one class, so an `Int32`
/// document value matches an `Int64` filter value.
fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare_by_sort(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (field, direction) in sort {
        let ord = match (a.get(field), b.get(field)) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if descending(direction) { ord.reverse() } else { ord };
        }
    }
    Ordering::Equal
}

fn descending(direction: &Bson) -> bool {
    match direction {
        Bson::Int32(n) => *n < 0,
        Bson::Int64(n) => *n < 0,
        Bson::Double(f) => *f < 0.0,
        _ => false,
    }
}

/// Ordering across mismatched non-numeric types falls back to a type rank.
fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.total_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn numeric(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::Null => 0,
        Bson::Boolean(_) => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 2,
        Bson::String(_) => 3,
        Bson::Array(_) => 4,
        Bson::Document(_) => 5,
        _ => 6,
    }
}
