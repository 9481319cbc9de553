//! Infrastructure layer: PostgreSQL implementations of the application
//! repository traits.

pub mod repository;

pub use repository::{create_pg_pool, PgEventRepository, PgFamilyGroupRepository};
