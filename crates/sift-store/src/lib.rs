mod error;
mod plan;
mod store;

pub use error::StoreError;
pub use plan::FindPlan;
pub use store::Datastore;

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
