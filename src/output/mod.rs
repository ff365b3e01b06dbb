//! Output module for persisting extracted rows
//!
//! This module handles:
//! - The [`ResultRow`] record and the [`RowSink`] persistence seam
//! - MySQL-compatible escaping and INSERT rendering
//! - File mode: one bulk INSERT appended to a dump file per run

mod dump;
pub mod sql;
mod traits;

pub use dump::SqlDumpSink;
pub use sql::{insert_header, mysql_real_escape_string, prepared_insert, COLUMNS};
pub use traits::{OutputError, OutputResult, ResultRow, RowSink, NOT_SPECIFIED};
