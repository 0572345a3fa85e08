//! Shared fixtures: a small simulation tree laid out the way the simulator writes it.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eplus_agg::config::AggregationOptions;
use eplus_agg::run::RunConfig;

pub const SCENARIO: &str = "historical_1980-2020";
pub const CITY: &str = "Los Angeles";
pub const TEMP: &str = "Environment:Site Outdoor Air Drybulb Temperature [C](Hourly)";
pub const ELEC: &str = "Electricity:Facility [J](Hourly)";
pub const GAS: &str = "NaturalGas:Facility [J](Hourly)";

/// Write `eplusout.csv` for one building/year and return its path.
///
/// Two rows per day for January 1-3 and February 1-2. Temperature is
/// `day + hour`, electricity is `building * 100 + day`, and the optional gas
/// column is a constant 1.0.
pub fn write_job(root: &Path, building: u64, year: i32, with_gas: bool) -> PathBuf {
    let dir = root
        .join(SCENARIO)
        .join(CITY)
        .join(format!("bldg{building:07}"))
        .join(format!("TGW_{}_{year}_{SCENARIO}", CITY.replace(' ', ".")));
    fs::create_dir_all(&dir).unwrap();

    let mut header = vec!["Date/Time", TEMP, ELEC];
    if with_gas {
        header.push(GAS);
    }
    let mut text = header.join(",");
    text.push('\n');
    for (month, days) in [(1, 3), (2, 2)] {
        for day in 1..=days {
            for hour in [12, 24] {
                let temp = day as f64 + hour as f64;
                let elec = (building * 100 + day) as f64;
                text.push_str(&format!(" {month:02}/{day:02}  {hour:02}:00:00,{temp},{elec}"));
                if with_gas {
                    text.push_str(",1.0");
                }
                text.push('\n');
            }
        }
    }

    let file = dir.join("eplusout.csv");
    fs::write(&file, text).unwrap();
    file
}

pub fn config(root: &Path) -> RunConfig {
    let options = AggregationOptions {
        columns_to_average: vec![TEMP.to_string()],
        chunk_rows: 2,
        ..Default::default()
    };
    let mut config = RunConfig::new(root, options);
    config.grace = std::time::Duration::ZERO;
    config
}

/// Parse the results table into its header and rows.
pub fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::ReaderBuilder::new().from_path(path).unwrap();
    let header = rdr.headers().unwrap().iter().map(str::to_string).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}
