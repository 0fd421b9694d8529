use bson::Document;
use serde::{Deserialize, Serialize};

/// A configured lookup handed to [`Datastore::find`](crate::Datastore::find).
///
/// Built with chained configuration:
///
/// ```
/// use bson::doc;
/// use sift_store::FindPlan;
///
/// let plan = FindPlan::new(doc! { "status": "active" })
///     .skip(20)
///     .limit(20)
///     .sort(doc! { "age": -1 });
/// ```
///
/// `populate` directives are opaque to this layer; adapters that support
/// relations interpret them, others ignore them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindPlan {
    pub filter: Document,
    pub skip: u64,
    pub limit: Option<u64>,
    pub sort: Document,
    pub populate: Vec<Document>,
}

impl FindPlan {
    pub fn new(filter: Document) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn skip(mut self, n: u64) -> Self {
        self.skip = n;
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = sort;
        self
    }

    pub fn populate(mut self, directives: Vec<Document>) -> Self {
        self.populate = directives;
        self
    }
}
