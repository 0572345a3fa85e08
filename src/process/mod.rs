// src/process/mod.rs

pub mod aggregate;
pub mod date_parser;
pub mod raw_table;
pub mod utils;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::config::AggregationOptions;
use crate::jobs::Job;
pub use aggregate::{summarize, SummaryTable, Value};
pub use raw_table::RawTable;

/// Load one job's `eplusout.csv` and reduce it to monthly rows.
#[instrument(level = "debug", skip_all, fields(job = %job))]
pub fn aggregate_job(job: &Job, options: &AggregationOptions) -> Result<SummaryTable> {
    let table = RawTable::load(&job.results_file, options)
        .with_context(|| format!("loading results for job {job}"))?;
    let summary = summarize(job, &table);
    debug!(
        timesteps = table.rows.len(),
        months = summary.rows.len(),
        columns = summary.columns.len(),
        "aggregated"
    );
    Ok(summary)
}
