mod collection;
mod error;
mod omit;
mod options;
mod result;

pub use collection::Collection;
pub use error::CollectionError;
pub use omit::omit_fields;
pub use options::QueryOptions;
pub use result::{Pagination, QueryResult};
