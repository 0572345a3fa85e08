use regex::Regex;

use crate::error::JobError;

/// `bldg000123` → `123`.
pub fn parse_building_id(name: &str) -> Result<u64, JobError> {
    let err = || JobError::BuildingName {
        name: name.to_string(),
    };
    let digits = name.strip_prefix("bldg").ok_or_else(err)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    // leading zeros are fine for u64 parsing; overflow is not
    digits.parse::<u64>().map_err(|_| err())
}

/// The simulator writes city names with `.` in place of spaces.
pub fn city_marker(city: &str) -> String {
    city.replace(' ', ".")
}

/// Pull the year out of a folder name shaped like
/// `<anything>_<city marker>_<year>_<scenario><anything>`.
pub fn parse_year(name: &str, city: &str, scenario: &str) -> Result<i32, JobError> {
    let marker = city_marker(city);
    let err = || JobError::YearName {
        name: name.to_string(),
        city_marker: marker.clone(),
        scenario: scenario.to_string(),
    };
    if marker.is_empty() || scenario.is_empty() {
        return Err(err());
    }

    let pattern = format!(
        "{}_*([0-9]+)_*{}",
        regex::escape(&marker),
        regex::escape(scenario)
    );
    // both halves are escaped, so the pattern always compiles
    let re = Regex::new(&pattern).map_err(|_| err())?;
    let caps = re.captures(name).ok_or_else(err)?;
    caps[1].parse::<i32>().map_err(|_| err())
}
