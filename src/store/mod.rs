// src/store/mod.rs
//
// The cumulative results table: one CSV that only ever grows, by rows and by
// trailing columns.

pub mod widen;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::Path,
};
use tracing::{debug, info, instrument};

use crate::schema::SchemaDiff;
pub use widen::widen_file;

/// Rows ready to be written, all cells already rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// What one append did to the results table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The file did not exist (or was empty) and was written from scratch.
    pub created: bool,
    pub rows_appended: usize,
    /// Columns added to the end of the header by this append.
    pub new_columns: Vec<String>,
    /// Historical rows that received empty cells for `new_columns`.
    pub backfilled_rows: u64,
}

/// Read only the header record of an existing results file.
/// `None` when the file has no header at all.
pub fn read_header(path: &Path) -> Result<Option<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    match rdr.records().next() {
        Some(record) => {
            let record = record.with_context(|| format!("reading header of {}", path.display()))?;
            Ok(Some(record.iter().map(str::to_string).collect()))
        }
        None => Ok(None),
    }
}

/// Merge `batch` into the results table at `path`.
///
/// A missing file is created with the batch's own column order. Otherwise the
/// batch is laid out under the file's header, with any columns the file lacks
/// appended to the header (rewriting history once, in chunks of `chunk_rows`)
/// and any columns the batch lacks left empty.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), rows = batch.rows.len()))]
pub fn append_batch(batch: &Batch, path: &Path, chunk_rows: usize) -> Result<AppendOutcome> {
    let existing = if path.exists() {
        read_header(path)?
    } else {
        None
    };

    let Some(existing) = existing else {
        write_new(batch, path)?;
        debug!(columns = batch.header.len(), "created results file");
        return Ok(AppendOutcome {
            created: true,
            rows_appended: batch.rows.len(),
            ..Default::default()
        });
    };

    let diff = SchemaDiff::between(&existing, &batch.header);
    if !diff.missing_columns.is_empty() {
        debug!(missing = ?diff.missing_columns, "batch lacks columns; leaving them empty");
    }
    let rows = diff.reorder(&batch.header, &batch.rows);

    let mut backfilled_rows = 0;
    if diff.needs_widening() {
        info!(new_columns = ?diff.new_columns, "widening results table");
        backfilled_rows = widen_file(path, &diff.unified(), diff.new_columns.len(), chunk_rows)?;
    }

    append_rows(path, &rows)?;
    Ok(AppendOutcome {
        created: false,
        rows_appended: rows.len(),
        new_columns: diff.new_columns,
        backfilled_rows,
    })
}

fn write_new(batch: &Batch, path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(&batch.header)
        .with_context(|| format!("writing header to {}", path.display()))?;
    for row in &batch.rows {
        wtr.write_record(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn append_rows(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {} for append", path.display()))?;

    if !ends_with_newline(&mut file)? {
        file.write_all(b"\n")
            .with_context(|| format!("terminating last line of {}", path.display()))?;
    }

    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    for row in rows {
        wtr.write_record(row)
            .with_context(|| format!("appending to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn ends_with_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata().context("reading file metadata")?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Header and data-row count of a results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub columns: Vec<String>,
    pub rows: u64,
}

/// Stream the whole table once to count its rows.
pub fn inspect(path: &Path) -> Result<TableInfo> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let columns = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut record = csv::StringRecord::new();
    let mut rows = 0;
    while rdr
        .read_record(&mut record)
        .with_context(|| format!("reading {}", path.display()))?
    {
        rows += 1;
    }
    Ok(TableInfo { columns, rows })
}
