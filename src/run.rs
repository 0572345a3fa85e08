// src/run.rs

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info, instrument, warn};

use crate::config::AggregationOptions;
use crate::jobs::discover_jobs;
use crate::process::aggregate_job;
use crate::store::append_batch;

/// Pause before touching an output file that already exists.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub simulation_results_folder: PathBuf,
    pub options: AggregationOptions,
    /// Delete an existing results file instead of appending to it.
    pub overwrite: bool,
    /// Window in which an operator can interrupt before an existing output
    /// is deleted or appended to.
    pub grace: Duration,
    /// Discover and list jobs without reading or writing any results.
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(simulation_results_folder: impl Into<PathBuf>, options: AggregationOptions) -> Self {
        Self {
            simulation_results_folder: simulation_results_folder.into(),
            options,
            overwrite: false,
            grace: DEFAULT_GRACE,
            dry_run: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.simulation_results_folder
            .join(&self.options.results_file)
    }
}

/// How a results file found at startup was handled. A dry run reports
/// what it would have done with the file instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingOutput {
    Absent,
    Deleted,
    Appending,
    WouldDelete,
    WouldAppend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub existing: ExistingOutput,
    pub jobs: usize,
    pub rows_written: usize,
    /// Columns added to the results table during this run, in order.
    pub columns_added: Vec<String>,
}

/// Delete or keep a pre-existing results file, after `grace` has elapsed.
pub fn resolve_existing_output(
    output: &Path,
    overwrite: bool,
    grace: Duration,
) -> Result<ExistingOutput> {
    if !output.exists() {
        return Ok(ExistingOutput::Absent);
    }

    if overwrite {
        warn!(
            output = %output.display(),
            grace_secs = grace.as_secs_f64(),
            "results file exists and will be DELETED; interrupt now if overwrite was chosen in error"
        );
    } else {
        warn!(
            output = %output.display(),
            grace_secs = grace.as_secs_f64(),
            "results file exists; overwrite is off, new rows will be appended"
        );
    }
    if !grace.is_zero() {
        thread::sleep(grace);
    }

    if overwrite {
        fs::remove_file(output)
            .with_context(|| format!("deleting {}", output.display()))?;
        info!(output = %output.display(), "deleted existing results file");
        Ok(ExistingOutput::Deleted)
    } else {
        Ok(ExistingOutput::Appending)
    }
}

/// What `resolve_existing_output` would do, without waiting or deleting.
pub fn plan_existing_output(output: &Path, overwrite: bool) -> ExistingOutput {
    match (output.exists(), overwrite) {
        (false, _) => ExistingOutput::Absent,
        (true, true) => ExistingOutput::WouldDelete,
        (true, false) => ExistingOutput::WouldAppend,
    }
}

fn progress_bar(total: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

/// Discover every job under the simulation folder and fold its monthly
/// summary into the results table, one job at a time.
///
/// Any error aborts the run: skipping a job would leave the table silently
/// incomplete.
#[instrument(level = "info", skip_all, fields(root = %config.simulation_results_folder.display()))]
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    config.options.validate()?;
    let output = config.output_path();
    let started = Instant::now();

    let existing = if config.dry_run {
        let planned = plan_existing_output(&output, config.overwrite);
        if planned != ExistingOutput::Absent {
            info!(output = %output.display(), action = ?planned, "dry run: results file exists");
        }
        planned
    } else {
        resolve_existing_output(&output, config.overwrite, config.grace)?
    };

    let jobs = discover_jobs(&config.simulation_results_folder)?;
    let mut summary = RunSummary {
        output: output.clone(),
        existing,
        jobs: jobs.len(),
        rows_written: 0,
        columns_added: Vec::new(),
    };

    if config.dry_run {
        for job in &jobs {
            info!(job = %job, file = %job.results_file.display(), "would process");
        }
        return Ok(summary);
    }

    let bar = progress_bar(jobs.len())?;
    bar.set_message("Processing files");
    for (i, job) in jobs.iter().enumerate() {
        let monthly = aggregate_job(job, &config.options)?;
        let outcome = append_batch(&monthly.to_batch(), &output, config.options.chunk_rows)
            .with_context(|| format!("writing results of job {job}"))?;

        summary.rows_written += outcome.rows_appended;
        summary.columns_added.extend(outcome.new_columns);
        debug!(job = %job, processed = i + 1, total = jobs.len(), rows = outcome.rows_appended, "job done");
        bar.inc(1);
    }
    bar.finish_with_message("done");

    info!(
        jobs = summary.jobs,
        rows = summary.rows_written,
        columns_added = summary.columns_added.len(),
        elapsed = ?started.elapsed(),
        output = %output.display(),
        "run complete"
    );
    Ok(summary)
}
