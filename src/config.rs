//! Aggregation options, loaded from YAML and overridable from the command line.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Records per chunk when an existing results file is rewritten to add columns.
pub const DEFAULT_CHUNK_ROWS: usize = 2_000;

/// Default name of the cumulative results table inside the simulation folder.
pub const DEFAULT_RESULTS_FILE: &str = "output_file.csv";

/// Reduction policy and output location.
///
/// ```yaml
/// columns_to_average:
///   - "Environment:Site Outdoor Air Drybulb Temperature [C](Hourly)"
/// unchanged_columns: [Date, Month, Day]
/// results_file: output_file.csv
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationOptions {
    /// Columns reduced to their monthly mean. Every other measurement is summed.
    pub columns_to_average: Vec<String>,
    /// Columns left out of the monthly reduction.
    pub unchanged_columns: Vec<String>,
    /// File name of the results table, relative to the simulation folder.
    pub results_file: String,
    /// Records held in memory at once while widening the results table.
    pub chunk_rows: usize,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            columns_to_average: Vec::new(),
            unchanged_columns: vec!["Date".into(), "Month".into(), "Day".into()],
            results_file: DEFAULT_RESULTS_FILE.into(),
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }
}

impl AggregationOptions {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(text).context("parsing aggregation options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading options file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("loading {}", path.display()))
    }

    /// The results file must be a bare file name and chunks must hold at least one row.
    pub fn validate(&self) -> Result<()> {
        let name = Path::new(&self.results_file);
        if self.results_file.trim().is_empty() || name.file_name() != Some(name.as_os_str()) {
            bail!(
                "results_file must be a plain file name, got `{}`",
                self.results_file
            );
        }
        if self.chunk_rows == 0 {
            bail!("chunk_rows must be greater than zero");
        }
        Ok(())
    }

    pub fn is_averaged(&self, column: &str) -> bool {
        self.columns_to_average.iter().any(|c| c == column)
    }

    pub fn is_unchanged(&self, column: &str) -> bool {
        self.unchanged_columns.iter().any(|c| c == column)
    }
}
