//! Monthly aggregation of EnergyPlus timestep output into one cumulative CSV.
//!
//! The pipeline is: [`jobs::discover_jobs`] walks the simulation tree,
//! [`process::aggregate_job`] reduces one `eplusout.csv` to one row per month,
//! and [`store::append_batch`] merges those rows into the results table,
//! widening its header whenever a job brings a column the file has not seen.
//! [`run::run`] drives the three in sequence.

pub mod config;
pub mod error;
pub mod jobs;
pub mod process;
pub mod run;
pub mod schema;
pub mod store;
