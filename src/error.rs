// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// A job folder whose name does not follow the simulation tree convention.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("building folder `{name}` does not match `bldg<digits>`")]
    BuildingName { name: String },

    #[error(
        "year folder `{name}` does not embed `{city_marker}`, a year and `{scenario}` in that order"
    )]
    YearName {
        name: String,
        city_marker: String,
        scenario: String,
    },

    #[error("folder name is not valid UTF-8: {}", .0.display())]
    NonUtf8(PathBuf),

    #[error("unexpected layout below the simulation root: {}", .0.display())]
    Layout(PathBuf),
}

/// A raw results file that breaks the columns/values contract.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{}: no `Date/Time` column", .path.display())]
    MissingDateTime { path: PathBuf },

    #[error("{}: averaged column `{column}` is not present", .path.display())]
    MissingAveragedColumn { path: PathBuf, column: String },

    #[error("{}: row {row}, column `{column}`: `{value}` is not numeric", .path.display())]
    NonNumeric {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("{}: row {row}: cannot read month/day from `{value}`", .path.display())]
    BadTimestamp {
        path: PathBuf,
        row: usize,
        value: String,
    },
}
