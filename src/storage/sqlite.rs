//! SQLite direct-write storage
//!
//! Each row is inserted the moment it is extracted, through one cached
//! prepared statement. There is no batching and no surrounding transaction.

use crate::output::{prepared_insert, ResultRow, RowSink};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StorageError, StorageResult};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

/// SQLite storage backend for direct-write mode
pub struct SqliteStorage {
    conn: Option<Connection>,
    table: String,
    insert_sql: String,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and ensures the item table exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `table` - Name of the item table rows are inserted into
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Database opened and schema in place
    /// * `Err(StorageError)` - Failed to open the file or create the table
    pub fn open(path: &Path, table: &str) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        Self::with_connection(conn, table)
    }

    /// Opens a database file that must already exist
    ///
    /// Neither the file nor the table is created, so a wrong path is an
    /// error instead of an empty table.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to an existing SQLite database file
    /// * `table` - Name of the item table to read from
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Database opened
    /// * `Err(StorageError)` - The file is missing or could not be opened
    pub fn open_existing(path: &Path, table: &str) -> StorageResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self {
            conn: Some(conn),
            table: table.to_string(),
            insert_sql: prepared_insert(table),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory(table: &str) -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: &str) -> StorageResult<Self> {
        initialize_schema(&conn, table)?;
        Ok(Self {
            conn: Some(conn),
            table: table.to_string(),
            insert_sql: prepared_insert(table),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The open connection, or `Closed` after [`close`](Self::close)
    pub fn connection(&self) -> StorageResult<&Connection> {
        self.conn.as_ref().ok_or(StorageError::Closed)
    }

    /// Inserts one row
    pub fn insert_row(&mut self, row: &ResultRow) -> StorageResult<()> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare_cached(&self.insert_sql)?;
        stmt.execute(params![
            row.title,
            row.link,
            row.players,
            row.rating,
            row.cover_image,
            row.published_id,
        ])?;
        Ok(())
    }

    /// Reads back every stored row in insertion order
    pub fn rows(&self) -> StorageResult<Vec<ResultRow>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT title, link, num_of_players, rating, cover_image, published_at_unix
             FROM `{}` ORDER BY id",
            self.table
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ResultRow {
                    title: row.get(0)?,
                    link: row.get(1)?,
                    players: row.get(2)?,
                    rating: row.get(3)?,
                    cover_image: row.get(4)?,
                    published_id: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Closes the connection; later calls are no-ops
    pub fn close(&mut self) -> StorageResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| StorageError::Sqlite(e))?;
            tracing::debug!("Closed database connection for table {}", self.table);
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

impl RowSink for SqliteStorage {
    fn record(&mut self, row: &ResultRow) -> crate::Result<()> {
        self.insert_row(row)?;
        Ok(())
    }

    /// Rows were already written by `record`; this only releases the handle
    fn finish(&mut self) -> crate::Result<usize> {
        self.close()?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(id: &str) -> ResultRow {
        ResultRow {
            title: format!("Room {}", id),
            link: format!("https://example.com/?id={}", id),
            players: "1-2".to_string(),
            rating: 3,
            cover_image: "https://img.example.com/x.png".to_string(),
            published_id: id.to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::open_in_memory("rooms");
        assert!(storage.is_ok());
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut storage = SqliteStorage::open_in_memory("rooms").unwrap();
        storage.insert_row(&sample_row("1")).unwrap();
        storage.insert_row(&sample_row("2")).unwrap();

        let rows = storage.rows().unwrap();
        assert_eq!(rows, vec![sample_row("1"), sample_row("2")]);
    }

    #[test]
    fn test_quotes_are_stored_verbatim() {
        let mut storage = SqliteStorage::open_in_memory("rooms").unwrap();
        let mut row = sample_row("7");
        row.title = "Jack's \"Lab\"".to_string();
        storage.insert_row(&row).unwrap();

        assert_eq!(storage.rows().unwrap()[0].title, "Jack's \"Lab\"");
    }

    #[test]
    fn test_finish_closes_connection() {
        let mut storage = SqliteStorage::open_in_memory("rooms").unwrap();
        storage.record(&sample_row("1")).unwrap();

        assert_eq!(storage.finish().unwrap(), 0);
        assert!(storage.is_closed());
        assert!(matches!(
            storage.insert_row(&sample_row("2")),
            Err(StorageError::Closed)
        ));
        // Closing twice is fine
        assert!(storage.close().is_ok());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("workshop.db");

        let mut storage = SqliteStorage::open(&path, "rooms").unwrap();
        storage.insert_row(&sample_row("1")).unwrap();
        storage.close().unwrap();

        let reopened = SqliteStorage::open(&path, "rooms").unwrap();
        assert_eq!(reopened.rows().unwrap().len(), 1);
    }

    #[test]
    fn test_open_existing_reads_stored_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("workshop.db");

        let mut storage = SqliteStorage::open(&path, "rooms").unwrap();
        storage.insert_row(&sample_row("1")).unwrap();
        storage.close().unwrap();

        let existing = SqliteStorage::open_existing(&path, "rooms").unwrap();
        assert_eq!(existing.rows().unwrap(), vec![sample_row("1")]);
    }

    #[test]
    fn test_open_existing_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.db");

        assert!(matches!(
            SqliteStorage::open_existing(&path, "rooms"),
            Err(StorageError::Sqlite(_))
        ));
        assert!(!path.exists());
    }
}
