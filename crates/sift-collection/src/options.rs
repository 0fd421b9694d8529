use bson::Document;

/// Per-call configuration for a paginated query. Nothing here outlives the
/// call it is passed to.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Relationship-population directives, passed through to the datastore
    /// untouched.
    pub populate: Vec<Document>,
    /// Top-level field names stripped from every returned record.
    pub omit_fields: Vec<String>,
    /// Trusted server-side filter merged over the parsed client filter.
    /// Its keys win on collision, so server-enforced constraints (tenant
    /// scoping and the like) cannot be overridden by client input.
    pub extra_filter: Option<Document>,
    /// Replaces the default operator allow-list for this call only.
    pub allowed_operators: Option<Vec<String>>,
}
