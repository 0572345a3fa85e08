// src/schema/types.rs

use std::path::Path;

use crate::config::AggregationOptions;
use crate::error::InputError;

pub const DATE_TIME: &str = "Date/Time";
pub const MONTH: &str = "Month";
pub const BLDG_ID: &str = "bldg_id";
pub const YEAR: &str = "Year";
pub const WEATHER_SCENARIO: &str = "Weather Scenario";

/// Identifying columns that lead every summary row, in output order.
pub const KEY_COLUMNS: [&str; 4] = [MONTH, BLDG_ID, YEAR, WEATHER_SCENARIO];

/// How a raw measurement column collapses into its monthly value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reduction {
    Mean,
    Sum,
    Excluded,
}

/// One raw column and the reduction applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: String,
    /// Position in the raw file's header.
    pub index: usize,
    pub reduction: Reduction,
}

/// Typed view of a raw results header under one set of options.
///
/// Built once per file, before any data row is read, so that policy problems
/// surface before aggregation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySchema {
    date_index: usize,
    columns: Vec<Column>,
}

impl SummarySchema {
    pub fn from_header(
        path: &Path,
        header: &[String],
        options: &AggregationOptions,
    ) -> Result<Self, InputError> {
        let date_index = header
            .iter()
            .position(|h| h == DATE_TIME)
            .ok_or_else(|| InputError::MissingDateTime {
                path: path.to_path_buf(),
            })?;

        if let Some(missing) = options
            .columns_to_average
            .iter()
            .find(|c| !header.iter().any(|h| h == *c))
        {
            return Err(InputError::MissingAveragedColumn {
                path: path.to_path_buf(),
                column: missing.clone(),
            });
        }

        let columns = header
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_index)
            .map(|(index, name)| {
                // key columns are written from the job, never from raw data
                let reduction = if KEY_COLUMNS.contains(&name.as_str()) {
                    Reduction::Excluded
                } else if options.is_averaged(name) {
                    Reduction::Mean
                } else if options.is_unchanged(name) {
                    Reduction::Excluded
                } else {
                    Reduction::Sum
                };
                Column {
                    name: name.clone(),
                    index,
                    reduction,
                }
            })
            .collect();

        Ok(Self {
            date_index,
            columns,
        })
    }

    pub fn date_index(&self) -> usize {
        self.date_index
    }

    /// Columns that produce a monthly value, in raw header order.
    pub fn reduced(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.reduction != Reduction::Excluded)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|c| c.reduction == Reduction::Excluded)
    }

    /// `Month, bldg_id, Year, Weather Scenario, <reduced columns>`.
    pub fn output_header(&self) -> Vec<String> {
        KEY_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(self.reduced().map(|c| c.name.clone()))
            .collect()
    }
}
