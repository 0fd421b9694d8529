use std::cell::RefCell;

use bson::{Document, doc};
use sift_collection::{Collection, CollectionError, QueryOptions, omit_fields};
use sift_store::{Datastore, FindPlan, MemoryStore, StoreError};

fn seeded() -> Collection<MemoryStore> {
    let store = MemoryStore::new();
    store.insert_many(vec![
        doc! { "_id": "u-1", "name": "Ada", "age": 36, "isActive": true, "password": "a" },
        doc! { "_id": "u-2", "name": "Brin", "age": 17, "isActive": true, "password": "b" },
        doc! { "_id": "u-3", "name": "Cole", "age": 52, "isActive": false, "password": "c" },
        doc! { "_id": "u-4", "name": "Dara", "age": 29, "isActive": true, "password": "d" },
        doc! { "_id": "u-5", "name": "Eli", "age": 61, "isActive": false, "password": "e" },
    ]);
    Collection::new(store)
}

// ── query: translation + execution ──────────────────────────────

#[test]
fn query_with_window_sort_and_operator_filter() {
    let collection = seeded();
    let result = collection
        .query(
            r#"{"limit": 2, "offset": 1, "sort": {"age": -1}, "age": {"$gte": 18}}"#,
            &QueryOptions::default(),
        )
        .unwrap();

    // Adults sorted oldest-first: 61, 52, 36, 29; the window starts at 52.
    assert_eq!(result.pagination.total_rows, 4);
    assert_eq!(result.pagination.total_pages, 2);
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].get_str("name").unwrap(), "Cole");
    assert_eq!(result.records[1].get_str("name").unwrap(), "Ada");
}

#[test]
fn blank_input_returns_first_default_page() {
    let collection = seeded();
    let result = collection.query("", &QueryOptions::default()).unwrap();
    assert_eq!(result.pagination.total_rows, 5);
    assert_eq!(result.pagination.total_pages, 1);
    assert_eq!(result.records.len(), 5);
}

#[test]
fn zero_matches_yield_zero_pages() {
    let collection = seeded();
    let result = collection
        .query(r#"{"limit": 3, "name": "Nobody"}"#, &QueryOptions::default())
        .unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.pagination.total_rows, 0);
    assert_eq!(result.pagination.total_pages, 0);
}

#[test]
fn total_pages_is_the_ceiling_of_rows_over_limit() {
    let collection = seeded();
    let result = collection
        .query(r#"{"limit": 2}"#, &QueryOptions::default())
        .unwrap();
    assert_eq!(result.pagination.total_rows, 5);
    assert_eq!(result.pagination.total_pages, 3);
}

// ── query: options ──────────────────────────────────────────────

#[test]
fn extra_filter_is_merged_and_wins_on_collision() {
    let collection = seeded();
    let options = QueryOptions {
        extra_filter: Some(doc! { "isActive": true }),
        ..QueryOptions::default()
    };

    let result = collection
        .query(r#"{"age": {"$gte": 18}}"#, &options)
        .unwrap();
    assert_eq!(result.pagination.total_rows, 2); // Ada, Dara

    // The client cannot widen the server-enforced constraint.
    let result = collection
        .query(r#"{"isActive": false}"#, &options)
        .unwrap();
    assert_eq!(result.pagination.total_rows, 3);
}

#[test]
fn omit_fields_strips_every_returned_record() {
    let collection = seeded();
    let options = QueryOptions {
        omit_fields: vec!["password".into()],
        ..QueryOptions::default()
    };
    let result = collection.query("", &options).unwrap();
    assert_eq!(result.records.len(), 5);
    assert!(result.records.iter().all(|r| r.get("password").is_none()));
    assert!(result.records.iter().all(|r| r.get("name").is_some()));
}

#[test]
fn per_call_allow_list_overrides_the_default() {
    let collection = seeded();
    let options = QueryOptions {
        allowed_operators: Some(vec!["$gte".into(), "$lte".into()]),
        ..QueryOptions::default()
    };

    assert!(collection.query(r#"{"age": {"$gte": 18}}"#, &options).is_ok());

    let err = collection
        .query(r#"{"age": {"$in": [17, 29]}}"#, &options)
        .unwrap_err();
    match err {
        CollectionError::Query(e) => assert!(e.to_string().contains("$in"), "{e}"),
        other => panic!("expected query error, got {other:?}"),
    }
}

// ── failure propagation ─────────────────────────────────────────

/// Proves parse/validate failures surface before any datastore call.
struct PanicStore;

impl Datastore for PanicStore {
    fn count(&self, _filter: &Document) -> Result<u64, StoreError> {
        panic!("datastore must not be reached");
    }

    fn find(&self, _plan: &FindPlan) -> Result<Vec<Document>, StoreError> {
        panic!("datastore must not be reached");
    }

    fn run_pipeline(&self, _stages: &[Document]) -> Result<Vec<Document>, StoreError> {
        panic!("datastore must not be reached");
    }
}

#[test]
fn malformed_input_fails_before_any_store_call() {
    let collection = Collection::new(PanicStore);
    let err = collection
        .query("not json", &QueryOptions::default())
        .unwrap_err();
    assert!(matches!(err, CollectionError::Query(_)), "{err}");
}

#[test]
fn disallowed_operator_fails_before_any_store_call() {
    let collection = Collection::new(PanicStore);
    let err = collection
        .query(r#"{"age": {"$where": "1"}}"#, &QueryOptions::default())
        .unwrap_err();
    assert!(matches!(err, CollectionError::Query(_)), "{err}");
}

struct UnavailableStore;

impl Datastore for UnavailableStore {
    fn count(&self, _filter: &Document) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn find(&self, _plan: &FindPlan) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    fn run_pipeline(&self, _stages: &[Document]) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[test]
fn store_failures_propagate_unchanged() {
    let collection = Collection::new(UnavailableStore);
    let err = collection.query("", &QueryOptions::default()).unwrap_err();
    match err {
        CollectionError::Store(StoreError::Unavailable(msg)) => {
            assert_eq!(msg, "connection refused");
        }
        other => panic!("expected store error, got {other:?}"),
    }
}

// ── plan construction ───────────────────────────────────────────

/// Captures what the façade hands the datastore.
struct RecordingStore {
    plans: RefCell<Vec<FindPlan>>,
    pipelines: RefCell<Vec<Vec<Document>>>,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            plans: RefCell::new(Vec::new()),
            pipelines: RefCell::new(Vec::new()),
        }
    }
}

impl Datastore for RecordingStore {
    fn count(&self, _filter: &Document) -> Result<u64, StoreError> {
        Ok(0)
    }

    fn find(&self, plan: &FindPlan) -> Result<Vec<Document>, StoreError> {
        self.plans.borrow_mut().push(plan.clone());
        Ok(Vec::new())
    }

    fn run_pipeline(&self, stages: &[Document]) -> Result<Vec<Document>, StoreError> {
        self.pipelines.borrow_mut().push(stages.to_vec());
        Ok(vec![doc! { "_id": "g", "total": 3 }])
    }
}

#[test]
fn find_plan_carries_window_sort_and_populate() {
    let store = RecordingStore::new();
    let collection = Collection::new(&store);
    let options = QueryOptions {
        populate: vec![doc! { "path": "owner" }],
        ..QueryOptions::default()
    };
    collection
        .query(r#"{"limit": 7, "offset": 14, "sort": {"age": "desc"}}"#, &options)
        .unwrap();

    let plans = store.plans.borrow();
    let plan = &plans[0];
    assert_eq!(plan.skip, 14);
    assert_eq!(plan.limit, Some(7));
    assert_eq!(plan.sort, doc! { "age": -1_i32 });
    assert_eq!(plan.populate, vec![doc! { "path": "owner" }]);
}

// ── aggregate ───────────────────────────────────────────────────

#[test]
fn aggregate_passes_the_pipeline_through_verbatim() {
    let store = RecordingStore::new();
    let collection = Collection::new(&store);
    let pipeline = vec![
        doc! { "$match": { "isActive": true } },
        doc! { "$group": { "_id": "g", "total": { "$sum": 1 } } },
    ];

    let records = collection.aggregate(&pipeline).unwrap();
    assert_eq!(records, vec![doc! { "_id": "g", "total": 3 }]);

    assert_eq!(store.pipelines.borrow()[0], pipeline);
}

#[test]
fn aggregate_skips_operator_validation() {
    // The allow-list boundary covers only the simple-filter path.
    let collection = Collection::new(RecordingStore::new());
    let pipeline = vec![doc! { "$facet": { "a": [] } }];
    assert!(collection.aggregate(&pipeline).is_ok());
}

// ── standalone omit_fields ──────────────────────────────────────

#[test]
fn omit_fields_is_usable_without_a_collection() {
    let records = vec![doc! { "name": "A", "password": "x", "age": 1 }];
    let out = omit_fields(&records, &["password".to_string()]);
    assert_eq!(out, vec![doc! { "name": "A", "age": 1 }]);
    // Input untouched.
    assert!(records[0].get("password").is_some());
}
