use std::fmt;

use bson::{Bson, Document};

/// Operators permitted in filter sub-documents unless a caller supplies its
/// own allow-list. Comparison, membership, existence, and regex only;
/// `$where` / `$expr` style operators accept code-like input and stay out.
pub const DEFAULT_ALLOWED_OPERATORS: &[&str] = &[
    "$eq", "$ne", "$gt", "$gte", "$lt", "$lte", "$in", "$nin", "$exists", "$regex",
];

/// A filter used an operator outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisallowedOperator {
    pub operator: String,
    pub field: String,
}

impl fmt::Display for DisallowedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operator {} is not allowed on field {}",
            self.operator, self.field
        )
    }
}

impl std::error::Error for DisallowedOperator {}

/// Check every operator key in `filter` against `allowed`, failing fast on
/// the first violation.
///
/// Traversal is exactly one level deep: only the keys of a field's
/// sub-document are checked. Top-level names are field names, not operators,
/// and anything nested further (e.g. inside a logical combinator's array) is
/// not inspected. Shallow validation covers the common case, not every
/// conceivable nesting.
pub fn validate_operators(filter: &Document, allowed: &[&str]) -> Result<(), DisallowedOperator> {
    for (field, value) in filter {
        if let Bson::Document(conditions) = value {
            for key in conditions.keys() {
                if key.starts_with('$') && !allowed.contains(&key.as_str()) {
                    return Err(DisallowedOperator {
                        operator: key.clone(),
                        field: field.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
