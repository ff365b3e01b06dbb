//! Database schema definitions
//!
//! The item table name comes from settings, so the DDL is rendered per table.

/// Renders the DDL for the item table and its lookup index
pub fn schema_sql(table: &str) -> String {
    format!(
        r#"
-- One row per scraped workshop item
CREATE TABLE IF NOT EXISTS `{table}` (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    link TEXT NOT NULL,
    num_of_players TEXT NOT NULL,
    rating INTEGER NOT NULL,
    cover_image TEXT NOT NULL,
    published_at_unix TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS `idx_{table}_published` ON `{table}`(published_at_unix);
"#
    )
}

/// Initializes the schema for one item table
pub fn initialize_schema(conn: &rusqlite::Connection, table: &str) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&schema_sql(table))?;
    Ok(())
}
