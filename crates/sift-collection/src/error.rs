use std::fmt;

use sift_query::QueryParseError;
use sift_store::StoreError;

#[derive(Debug)]
pub enum CollectionError {
    Query(QueryParseError),
    Store(StoreError),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Query(e) => write!(f, "query error: {e}"),
            CollectionError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for CollectionError {}

impl From<QueryParseError> for CollectionError {
    fn from(e: QueryParseError) -> Self {
        CollectionError::Query(e)
    }
}

impl From<StoreError> for CollectionError {
    fn from(e: StoreError) -> Self {
        CollectionError::Store(e)
    }
}
