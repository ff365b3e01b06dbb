//! Row type and the persistence seam
//!
//! Every catalog listing becomes one [`ResultRow`]; the crawler hands each
//! row to a [`RowSink`], which either buffers it for a bulk dump or writes it
//! straight through to a database.

use thiserror::Error;

/// Value stored when a detail page gives no player count
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Errors that can occur while writing output files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The persistence-ready record for one workshop item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Listing title
    pub title: String,

    /// Detail page URL (empty when the listing had none)
    pub link: String,

    /// Player count or tag text from the detail page, [`NOT_SPECIFIED`] otherwise
    pub players: String,

    /// Star rating, 0 when the listing shows none
    pub rating: u8,

    /// Preview image URL from the detail page
    pub cover_image: String,

    /// Published file id of the item
    pub published_id: String,
}

/// Destination for extracted rows
///
/// The crawler calls [`record`](RowSink::record) once per listing and
/// [`finish`](RowSink::finish) exactly once when the crawl ends, whether it
/// ended normally or was aborted by a fetch error.
pub trait RowSink {
    /// Accepts one row
    fn record(&mut self, row: &ResultRow) -> crate::Result<()>;

    /// Flushes anything buffered and releases held resources
    ///
    /// Returns the number of rows persisted by this call.
    fn finish(&mut self) -> crate::Result<usize>;
}

/// In-memory sink for callers that want the rows themselves
///
/// Rows stay in the vector after the crawl, so embedders can inspect or
/// store them their own way. Nothing is persisted, hence `finish` reports 0.
impl RowSink for Vec<ResultRow> {
    fn record(&mut self, row: &ResultRow) -> crate::Result<()> {
        self.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> crate::Result<usize> {
        Ok(0)
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn record(&mut self, row: &ResultRow) -> crate::Result<()> {
        (**self).record(row)
    }

    fn finish(&mut self) -> crate::Result<usize> {
        (**self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> ResultRow {
        ResultRow {
            title: format!("Room {}", id),
            link: String::new(),
            players: NOT_SPECIFIED.to_string(),
            rating: 0,
            cover_image: String::new(),
            published_id: id.to_string(),
        }
    }

    #[test]
    fn test_vec_sink_keeps_rows_after_finish() {
        let mut rows: Vec<ResultRow> = Vec::new();
        rows.record(&row("1")).unwrap();
        rows.record(&row("2")).unwrap();

        assert_eq!(rows.finish().unwrap(), 0);
        assert_eq!(rows, vec![row("1"), row("2")]);
    }

    #[test]
    fn test_boxed_sink_forwards_calls() {
        let mut sink: Box<Vec<ResultRow>> = Box::default();
        sink.record(&row("1")).unwrap();

        assert_eq!(sink.finish().unwrap(), 0);
        assert_eq!(sink.len(), 1);
    }
}
