//! End-to-end runs over a generated simulation tree.

mod common;

use std::fs;

use common::{config, read_table, write_job, ELEC, GAS, SCENARIO, TEMP};
use eplus_agg::error::JobError;
use eplus_agg::run::{run, ExistingOutput};
use tempfile::tempdir;

fn row_for<'a>(rows: &'a [Vec<String>], building: &str, month: &str) -> &'a Vec<String> {
    rows.iter()
        .find(|r| r[1] == building && r[0] == month)
        .unwrap_or_else(|| panic!("no row for building {building} month {month}"))
}

#[test]
fn aggregates_every_job_into_one_table() {
    let tmp = tempdir().unwrap();
    write_job(tmp.path(), 1, 2001, false);
    write_job(tmp.path(), 2, 2001, false);
    write_job(tmp.path(), 2, 2002, false);

    let summary = run(&config(tmp.path())).unwrap();
    assert_eq!(summary.jobs, 3);
    assert_eq!(summary.rows_written, 6);
    assert_eq!(summary.existing, ExistingOutput::Absent);
    assert!(summary.columns_added.is_empty());

    let (header, rows) = read_table(&summary.output);
    assert_eq!(
        header,
        vec!["Month", "bldg_id", "Year", "Weather Scenario", TEMP, ELEC]
    );
    assert_eq!(rows.len(), 6);

    let jan = row_for(&rows, "1", "01");
    assert_eq!(jan[2], "2001");
    assert_eq!(jan[3], SCENARIO);
    assert_eq!(jan[4], "20.0");
    assert_eq!(jan[5], "612.0");

    let feb = row_for(&rows, "2", "02");
    assert_eq!(feb[4], "19.5");
    assert_eq!(feb[5], "806.0");
}

#[test]
fn new_column_from_a_later_job_is_backfilled() {
    let tmp = tempdir().unwrap();
    write_job(tmp.path(), 1, 2001, false);
    let cfg = config(tmp.path());
    run(&cfg).unwrap();
    let before = fs::read_to_string(cfg.output_path()).unwrap();

    // second run appends a building that also reports gas
    write_job(tmp.path(), 9, 2001, true);
    fs::remove_file(
        tmp.path()
            .join(SCENARIO)
            .join(common::CITY)
            .join("bldg0000001")
            .join(format!("TGW_Los.Angeles_2001_{SCENARIO}"))
            .join("eplusout.csv"),
    )
    .unwrap();

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.existing, ExistingOutput::Appending);
    assert_eq!(summary.columns_added, vec![GAS.to_string()]);

    let (header, rows) = read_table(&summary.output);
    assert_eq!(header.last().map(String::as_str), Some(GAS));
    assert_eq!(rows.len(), 4);

    // historical rows keep their values and gain an empty gas cell
    let old_rows: Vec<&str> = before.lines().skip(1).collect();
    for (old, new) in old_rows.iter().zip(&rows) {
        assert_eq!(new.last().unwrap(), "");
        assert_eq!(new[..new.len() - 1].join(","), *old);
    }
    assert_eq!(row_for(&rows, "9", "01")[6], "6.0");
    assert_eq!(row_for(&rows, "9", "02")[6], "4.0");
}

#[test]
fn older_jobs_without_a_column_leave_it_empty() {
    let tmp = tempdir().unwrap();
    write_job(tmp.path(), 3, 2001, true);
    write_job(tmp.path(), 4, 2001, false);
    write_job(tmp.path(), 5, 2001, true);

    let summary = run(&config(tmp.path())).unwrap();
    let (header, rows) = read_table(&summary.output);
    assert_eq!(header.len(), 7);
    assert_eq!(header[6], GAS);
    assert_eq!(rows.len(), 6);
    assert_eq!(row_for(&rows, "4", "01")[6], "");
    assert_eq!(row_for(&rows, "3", "01")[6], "6.0");
    assert_eq!(row_for(&rows, "5", "02")[6], "4.0");
}

#[test]
fn overwrite_is_repeatable_and_append_duplicates() {
    let tmp = tempdir().unwrap();
    write_job(tmp.path(), 1, 2001, true);
    write_job(tmp.path(), 2, 2001, false);

    let mut cfg = config(tmp.path());
    cfg.overwrite = true;
    run(&cfg).unwrap();
    let first = fs::read(cfg.output_path()).unwrap();

    let second = run(&cfg).unwrap();
    assert_eq!(second.existing, ExistingOutput::Deleted);
    assert_eq!(fs::read(cfg.output_path()).unwrap(), first);

    cfg.overwrite = false;
    run(&cfg).unwrap();
    let (_, rows) = read_table(&cfg.output_path());
    assert_eq!(rows.len(), 8);
}

#[test]
fn dry_run_touches_nothing() {
    let tmp = tempdir().unwrap();
    write_job(tmp.path(), 1, 2001, false);
    let mut cfg = config(tmp.path());
    cfg.dry_run = true;
    cfg.overwrite = true;

    let summary = run(&cfg).unwrap();
    assert_eq!(summary.jobs, 1);
    assert_eq!(summary.rows_written, 0);
    assert_eq!(summary.existing, ExistingOutput::Absent);
    assert!(!cfg.output_path().exists());

    fs::write(cfg.output_path(), "Month\n").unwrap();
    let summary = run(&cfg).unwrap();
    assert_eq!(summary.existing, ExistingOutput::WouldDelete);
    assert_eq!(fs::read_to_string(cfg.output_path()).unwrap(), "Month\n");

    cfg.overwrite = false;
    let summary = run(&cfg).unwrap();
    assert_eq!(summary.existing, ExistingOutput::WouldAppend);
    assert_eq!(fs::read_to_string(cfg.output_path()).unwrap(), "Month\n");
}

#[test]
fn malformed_tree_aborts_before_writing() {
    let tmp = tempdir().unwrap();
    write_job(tmp.path(), 1, 2001, false);
    let bad = tmp
        .path()
        .join(SCENARIO)
        .join(common::CITY)
        .join("building_two")
        .join("TGW_Los.Angeles_2001_historical_1980-2020");
    fs::create_dir_all(&bad).unwrap();
    fs::write(bad.join("eplusout.csv"), "Date/Time,E\n 01/01  01:00:00,1\n").unwrap();

    let cfg = config(tmp.path());
    let err = run(&cfg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<JobError>(),
        Some(JobError::BuildingName { .. })
    ));
    assert!(!cfg.output_path().exists());
}

#[test]
fn non_numeric_measurement_aborts_the_run() {
    let tmp = tempdir().unwrap();
    let file = write_job(tmp.path(), 1, 2001, false);
    let text = fs::read_to_string(&file).unwrap().replacen(",101", ",n/a", 1);
    fs::write(&file, text).unwrap();

    let err = run(&config(tmp.path())).unwrap_err();
    assert!(format!("{err:#}").contains("is not numeric"));
}
