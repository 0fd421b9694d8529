use bson::Document;

/// Return copies of `records` with the named top-level fields removed.
///
/// Shallow: nested documents keep their fields unless the name matches a
/// top-level key. Absent names are ignored, record order is preserved, and
/// the input slice is never mutated.
pub fn omit_fields(records: &[Document], fields: &[String]) -> Vec<Document> {
    records
        .iter()
        .map(|record| {
            let mut copy = record.clone();
            for field in fields {
                copy.remove(field);
            }
            copy
        })
        .collect()
}
