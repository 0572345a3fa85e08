use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use eplus_agg::{
    config::AggregationOptions,
    jobs::discover_jobs,
    run::{run, RunConfig},
    store,
};
use std::{path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Aggregate EnergyPlus timestep results into a cumulative monthly CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate every job under SIM_FOLDER and append to the results table.
    Run(RunArgs),
    /// List the jobs found under SIM_FOLDER.
    Jobs { sim_folder: PathBuf },
    /// Print the columns and row count of a results table.
    Inspect { results: PathBuf },
}

#[derive(Args)]
struct RunArgs {
    sim_folder: PathBuf,
    /// YAML file with columns_to_average, unchanged_columns, results_file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the results file name.
    #[arg(long)]
    results_file: Option<String>,
    /// Additional column to average (repeatable).
    #[arg(long = "average", value_name = "COLUMN")]
    average: Vec<String>,
    /// Additional column to leave out of the reduction (repeatable).
    #[arg(long = "unchanged", value_name = "COLUMN")]
    unchanged: Vec<String>,
    /// Delete an existing results file instead of appending to it.
    #[arg(long)]
    overwrite: bool,
    /// Seconds to wait before touching an existing results file.
    #[arg(long, default_value_t = 10)]
    grace_secs: u64,
    /// Skip the wait before touching an existing results file.
    #[arg(short, long)]
    yes: bool,
    /// Only list what would be processed.
    #[arg(long)]
    dry_run: bool,
}

impl RunArgs {
    fn into_config(self) -> Result<RunConfig> {
        let mut options = match &self.config {
            Some(path) => AggregationOptions::from_yaml_file(path)?,
            None => AggregationOptions::default(),
        };
        if let Some(name) = self.results_file {
            options.results_file = name;
        }
        options.columns_to_average.extend(self.average);
        options.unchanged_columns.extend(self.unchanged);
        options.validate()?;

        let mut config = RunConfig::new(self.sim_folder, options);
        config.overwrite = self.overwrite;
        config.grace = if self.yes {
            Duration::ZERO
        } else {
            Duration::from_secs(self.grace_secs)
        };
        config.dry_run = self.dry_run;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Run(args) => {
            let config = args.into_config()?;
            let summary = run(&config)?;
            info!(
                jobs = summary.jobs,
                rows = summary.rows_written,
                output = %summary.output.display(),
                "finished"
            );
        }
        Command::Jobs { sim_folder } => {
            for job in discover_jobs(&sim_folder)? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    job.weather_scenario,
                    job.city,
                    job.building_id,
                    job.year,
                    job.results_file.display()
                );
            }
        }
        Command::Inspect { results } => {
            let table = store::inspect(&results)?;
            println!("{}: {} rows", results.display(), table.rows);
            for (i, column) in table.columns.iter().enumerate() {
                println!("{i:>4}  {column}");
            }
        }
    }
    Ok(())
}
