//! Storage module for direct-write mode
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Per-row inserts through a prepared statement
//! - Read-back statistics for the `--stats` mode

mod schema;
mod sqlite;
mod stats;
mod traits;

pub use schema::{initialize_schema, schema_sql};
pub use sqlite::SqliteStorage;
pub use stats::{load_statistics, print_statistics, TableStatistics};
pub use traits::{StorageError, StorageResult};
