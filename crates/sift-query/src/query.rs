use bson::Document;
use serde::{Deserialize, Serialize};

/// Page size used when the raw input omits `limit` or supplies a falsy value.
pub const DEFAULT_LIMIT: u64 = 20;

/// A parsed query: filter predicate, pagination window, sort spec, and the
/// `count` / `justOne` flags.
///
/// Reserved keys (`limit`, `offset`, `sort`, `count`, `justOne`) never appear
/// in `filter`; every other top-level key of the raw input lands there
/// verbatim. `limit` is always positive and `sort` directions are normalized
/// to `1` / `-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filter: Document,
    pub limit: u64,
    pub offset: u64,
    pub sort: Document,
    pub count: bool,
    pub just_one: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            filter: Document::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: Document::new(),
            count: false,
            just_one: false,
        }
    }
}
