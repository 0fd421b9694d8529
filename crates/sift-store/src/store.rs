use bson::Document;

use crate::error::StoreError;
use crate::plan::FindPlan;

/// The capability set this layer consumes from a document store.
///
/// Any adapter implements these three operations, whether it fronts a real
/// document store or holds test fixtures in memory. Returned documents are
/// plain detached data, safe to modify without touching the store.
pub trait Datastore {
    /// Exact number of documents matching `filter`.
    fn count(&self, filter: &Document) -> Result<u64, StoreError>;

    /// Execute a configured lookup and materialize the matching documents.
    fn find(&self, plan: &FindPlan) -> Result<Vec<Document>, StoreError>;

    /// Run an aggregation pipeline and return whatever the backend produces.
    fn run_pipeline(&self, stages: &[Document]) -> Result<Vec<Document>, StoreError>;
}

impl<S: Datastore + ?Sized> Datastore for &S {
    fn count(&self, filter: &Document) -> Result<u64, StoreError> {
        (**self).count(filter)
    }

    fn find(&self, plan: &FindPlan) -> Result<Vec<Document>, StoreError> {
        (**self).find(plan)
    }

    fn run_pipeline(&self, stages: &[Document]) -> Result<Vec<Document>, StoreError> {
        (**self).run_pipeline(stages)
    }
}
