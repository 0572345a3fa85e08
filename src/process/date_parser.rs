use chrono::NaiveDate;

/// Month and day as written in an EnergyPlus `Date/Time` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDay {
    pub month: String,
    pub day: String,
}

/// `" 01/31  24:00:00"` → `01` / `31`.
///
/// The date is the first whitespace-separated token and must be exactly
/// `MM/DD` naming a real calendar day. Text is returned as written so the
/// month key keeps its zero padding.
pub fn parse_month_day(raw: &str) -> Option<MonthDay> {
    let date = raw.split_whitespace().next()?;
    let mut parts = date.split('/');
    let (month, day) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let m: u32 = month.parse().ok()?;
    let d: u32 = day.parse().ok()?;
    // leap year so that 02/29 is accepted
    NaiveDate::from_ymd_opt(2000, m, d)?;

    Some(MonthDay {
        month: month.to_string(),
        day: day.to_string(),
    })
}
