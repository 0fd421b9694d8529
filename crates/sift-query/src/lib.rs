mod operator;
mod parse;
mod query;

pub use operator::{DEFAULT_ALLOWED_OPERATORS, DisallowedOperator, validate_operators};
pub use parse::{QueryParseError, parse_query};
pub use query::{DEFAULT_LIMIT, Query};
