//! Statistics over the direct-write item table
//!
//! Backs the `--stats` mode of the binary.

use crate::output::NOT_SPECIFIED;
use crate::storage::{SqliteStorage, StorageResult};
use std::collections::BTreeMap;

/// Summary of what the item table holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStatistics {
    /// Total number of stored rows
    pub total_rows: u64,

    /// Row count per star rating (0 = unrated)
    pub rows_by_rating: BTreeMap<u8, u64>,

    /// Rows whose player count is something other than the default
    pub rows_with_players: u64,

    /// Distinct published ids; lower than `total_rows` when runs overlapped
    pub distinct_items: u64,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &SqliteStorage) -> StorageResult<TableStatistics> {
    let conn = storage.connection()?;
    let table = storage.table();

    let (total_rows, rows_with_players, distinct_items): (i64, i64, i64) = conn.query_row(
        &format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN num_of_players != ?1 THEN 1 ELSE 0 END), 0),
                    COUNT(DISTINCT published_at_unix)
             FROM `{}`",
            table
        ),
        [NOT_SPECIFIED],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let mut stmt = conn.prepare(&format!(
        "SELECT rating, COUNT(*) FROM `{}` GROUP BY rating",
        table
    ))?;
    let rows_by_rating = stmt
        .query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)? as u64)))?
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(TableStatistics {
        total_rows: total_rows as u64,
        rows_by_rating,
        rows_with_players: rows_with_players as u64,
        distinct_items: distinct_items as u64,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &TableStatistics) {
    println!("=== Workshop Table Statistics ===\n");
    println!("Total rows: {}", stats.total_rows);
    println!("Distinct items: {}", stats.distinct_items);
    println!("Rows with a player count: {}", stats.rows_with_players);

    println!("\nRows by rating:");
    for (rating, count) in stats.rows_by_rating.iter().rev() {
        let label = if *rating == 0 {
            "unrated".to_string()
        } else {
            format!("{} star", rating)
        };
        println!("  {:<8} {}", label, count);
    }
}
