use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

use crate::config::AggregationOptions;
use crate::error::InputError;
use crate::process::{date_parser::parse_month_day, utils::parse_measurement};
use crate::schema::SummarySchema;

/// One timestep: its month key and one value per reduced column.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestepRow {
    pub month: String,
    pub values: Vec<Option<f64>>,
}

/// A raw `eplusout.csv`, validated against the reduction policy.
///
/// Every measurement is parsed while loading, so a bad cell stops the job
/// before any reduction happens.
#[derive(Debug)]
pub struct RawTable {
    pub path: PathBuf,
    pub schema: SummarySchema,
    pub rows: Vec<TimestepRow>,
}

impl RawTable {
    pub fn load(path: &Path, options: &AggregationOptions) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(reader, path, options)
    }

    /// `path` is only used to label errors.
    pub fn from_reader<R: Read>(
        mut reader: csv::Reader<R>,
        path: &Path,
        options: &AggregationOptions,
    ) -> Result<Self> {
        let header: Vec<String> = reader
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();
        let schema = SummarySchema::from_header(path, &header, options)?;
        let reduced: Vec<_> = schema.reduced().cloned().collect();

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            // 1-based, counting the header line
            let row = idx + 2;
            let record = record
                .with_context(|| format!("CSV parse error in {} at row {}", path.display(), row))?;

            let stamp = record.get(schema.date_index()).unwrap_or_default();
            let month_day = parse_month_day(stamp).ok_or_else(|| InputError::BadTimestamp {
                path: path.to_path_buf(),
                row,
                value: stamp.to_string(),
            })?;

            let mut values = Vec::with_capacity(reduced.len());
            for col in &reduced {
                let cell = record.get(col.index).unwrap_or_default();
                let value = parse_measurement(cell).map_err(|_| InputError::NonNumeric {
                    path: path.to_path_buf(),
                    row,
                    column: col.name.clone(),
                    value: cell.to_string(),
                })?;
                values.push(value);
            }

            rows.push(TimestepRow {
                month: month_day.month,
                values,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            schema,
            rows,
        })
    }
}
