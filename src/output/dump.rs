//! File-mode sink: one bulk INSERT appended to a dump file per run

use crate::output::sql::insert_header;
use crate::output::traits::{OutputError, OutputResult, ResultRow, RowSink};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Buffers escaped value tuples and appends them as a single statement on finish
#[derive(Debug)]
pub struct SqlDumpSink {
    path: PathBuf,
    table: String,
    values: Vec<String>,
}

impl SqlDumpSink {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table: table.into(),
            values: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows waiting for the next flush
    pub fn pending(&self) -> usize {
        self.values.len()
    }

    /// Appends the buffered rows to the dump file and clears the buffer
    ///
    /// The file is created if missing and never truncated. Nothing is written
    /// when the buffer is empty, so a run that found no items leaves no
    /// dangling `VALUES` clause behind.
    pub fn flush_to_file(&mut self) -> OutputResult<usize> {
        if self.values.is_empty() {
            return Ok(0);
        }

        let statement = format!(
            "{}\n{};\n",
            insert_header(&self.table),
            self.values.join(", \n")
        );

        let write_err = |source| OutputError::Write {
            path: self.path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        file.write_all(statement.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        let written = self.values.len();
        self.values.clear();
        Ok(written)
    }
}

impl RowSink for SqlDumpSink {
    fn record(&mut self, row: &ResultRow) -> crate::Result<()> {
        self.values.push(row.to_sql_values());
        Ok(())
    }

    fn finish(&mut self) -> crate::Result<usize> {
        let written = self.flush_to_file()?;
        if written > 0 {
            tracing::info!("Appended {} rows to {}", written, self.path.display());
        } else {
            tracing::info!("No rows to write to {}", self.path.display());
        }
        Ok(written)
    }
}
