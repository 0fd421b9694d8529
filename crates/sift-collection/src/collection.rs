use bson::Document;
use sift_query::{DEFAULT_ALLOWED_OPERATORS, parse_query};
use sift_store::{Datastore, FindPlan};

use crate::error::CollectionError;
use crate::omit::omit_fields;
use crate::options::QueryOptions;
use crate::result::{Pagination, QueryResult};

/// A paginated query façade bound to one datastore.
pub struct Collection<S> {
    store: S,
}

impl<S: Datastore> Collection<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Parse `raw` into a filter/sort/pagination request, execute it, and
    /// return the records with their pagination envelope.
    ///
    /// Parse and operator-validation failures surface before any datastore
    /// call is made. Count and find are two independent reads with no
    /// snapshot guarantee across them: `total_rows` and `records` may
    /// reflect slightly different states under concurrent writes. Datastore
    /// failures propagate unchanged; this layer never retries.
    ///
    /// The parsed `count` and `justOne` flags are exposed on the translated
    /// query but do not alter the execution path here.
    pub fn query(&self, raw: &str, options: &QueryOptions) -> Result<QueryResult, CollectionError> {
        let allowed: Vec<&str> = match &options.allowed_operators {
            Some(overrides) => overrides.iter().map(String::as_str).collect(),
            None => DEFAULT_ALLOWED_OPERATORS.to_vec(),
        };
        let query = parse_query(raw, &allowed)?;

        let mut filter = query.filter;
        if let Some(extra) = &options.extra_filter {
            for (key, value) in extra {
                filter.insert(key.clone(), value.clone());
            }
        }

        log::debug!(
            "query: filter={filter:?} limit={} offset={}",
            query.limit,
            query.offset
        );

        let total_rows = self.store.count(&filter)?;
        // limit is always positive (the translator coerces falsy values to
        // the default), and 0.div_ceil(n) == 0 covers the zero-rows case.
        let total_pages = total_rows.div_ceil(query.limit);

        let plan = FindPlan::new(filter)
            .skip(query.offset)
            .limit(query.limit)
            .sort(query.sort)
            .populate(options.populate.clone());
        let mut records = self.store.find(&plan)?;

        if !options.omit_fields.is_empty() {
            records = omit_fields(&records, &options.omit_fields);
        }

        log::debug!("query: {} of {total_rows} rows returned", records.len());

        Ok(QueryResult {
            records,
            pagination: Pagination {
                total_rows,
                total_pages,
            },
        })
    }

    /// Pass an aggregation pipeline through to the datastore unchanged.
    ///
    /// The operator allow-list covers only the simple-filter path; pipeline
    /// stages are a different and far larger surface, left to the store.
    pub fn aggregate(&self, pipeline: &[Document]) -> Result<Vec<Document>, CollectionError> {
        log::debug!("aggregate: {} stages", pipeline.len());
        let records = self.store.run_pipeline(pipeline)?;
        Ok(records)
    }
}
