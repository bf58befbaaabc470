pub mod manager;
pub mod models;
pub mod patch;
pub mod repositories;
pub mod scoped;

pub use manager::{connect_pool, health_check, DatabaseError, DbResultExt};
pub use patch::{FieldValue, Patch};
pub use scoped::ScopedTable;
