pub mod fixture;
pub mod manager;
pub mod memory;
pub mod models;
pub mod populate;
pub mod postgres;
pub mod query_builder;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{AdminStore, DocumentStore, PathFilter};
