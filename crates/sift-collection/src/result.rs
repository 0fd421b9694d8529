use bson::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_rows: u64,
    pub total_pages: u64,
}

/// Result envelope of a paginated query. Record ordering follows the
/// resolved sort spec; with no sort spec it is datastore-defined and not
/// stable across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub records: Vec<Document>,
    pub pagination: Pagination,
}
