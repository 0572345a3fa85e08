// src/jobs/mod.rs

pub mod parse;

use anyhow::{bail, Context, Result};
use glob::{glob, Pattern};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

use crate::error::JobError;
pub use parse::{parse_building_id, parse_year};

/// Raw per-timestep output written by the simulator into every year folder.
pub const RESULTS_FILE_NAME: &str = "eplusout.csv";

/// One simulated building / weather scenario / year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub weather_scenario: String,
    pub city: String,
    pub building_path: PathBuf,
    pub building_id: u64,
    pub year: i32,
    pub results_file: PathBuf,
}

impl Job {
    /// Build a job from `<scenario>/<city>/<building>/<year>/eplusout.csv`.
    pub fn from_results_file(results_file: &Path) -> Result<Self, JobError> {
        let year_dir = parent(results_file)?;
        let building_dir = parent(year_dir)?;
        let city_dir = parent(building_dir)?;
        let scenario_dir = parent(city_dir)?;

        let weather_scenario = folder_name(scenario_dir)?.to_string();
        let city = folder_name(city_dir)?.to_string();
        let building_id = parse_building_id(folder_name(building_dir)?)?;
        let year = parse_year(folder_name(year_dir)?, &city, &weather_scenario)?;

        Ok(Self {
            weather_scenario,
            city,
            building_path: building_dir.to_path_buf(),
            building_id,
            year,
            results_file: results_file.to_path_buf(),
        })
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/bldg {}/{}",
            self.weather_scenario, self.city, self.building_id, self.year
        )
    }
}

fn parent(path: &Path) -> Result<&Path, JobError> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| JobError::Layout(path.to_path_buf()))
}

fn folder_name(path: &Path) -> Result<&str, JobError> {
    let name = path
        .file_name()
        .ok_or_else(|| JobError::Layout(path.to_path_buf()))?;
    name.to_str()
        .ok_or_else(|| JobError::NonUtf8(path.to_path_buf()))
}

/// Walk `root/<scenario>/<city>/<building>/<year>/` and return one job per
/// year folder holding an `eplusout.csv`.
///
/// Any folder that does not follow the naming convention aborts discovery:
/// a malformed tree means the upstream simulation step went wrong.
#[instrument(level = "info", skip(root), fields(root = %root.display()))]
pub fn discover_jobs(root: &Path) -> Result<Vec<Job>> {
    if !root.is_dir() {
        bail!("simulation results folder not found: {}", root.display());
    }
    let root_str = root
        .to_str()
        .ok_or_else(|| JobError::NonUtf8(root.to_path_buf()))?;

    let pattern = format!(
        "{}/*/*/*/*/{}",
        Pattern::escape(root_str.trim_end_matches('/')),
        RESULTS_FILE_NAME
    );
    debug!(%pattern, "scanning for results files");

    let mut jobs = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("bad glob pattern {pattern}"))? {
        let results_file = entry.context("reading simulation tree")?;
        if !results_file.is_file() {
            continue;
        }
        let job = Job::from_results_file(&results_file)
            .with_context(|| format!("invalid job folder {}", results_file.display()))?;
        debug!(job = %job, "discovered");
        jobs.push(job);
    }

    info!(count = jobs.len(), "discovered jobs");
    Ok(jobs)
}
