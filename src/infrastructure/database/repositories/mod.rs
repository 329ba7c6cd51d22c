//! Database repository implementations
//!
//! One generic SeaORM table repository plus per-record mappings, and the
//! unified RepositoryProvider.

mod mappings;
pub mod record_table;
pub mod repository_provider;
pub mod session_repository;

pub use record_table::{db_err, SeaOrmTable, TableRecord};
pub use repository_provider::SeaOrmRepositoryProvider;
pub use session_repository::SeaOrmSessionRepository;
