use std::num::ParseFloatError;

/// Parse a measurement cell. Empty cells carry no value; anything else
/// must be a number. `NaN` and infinities parse but carry no value either,
/// so they never reach a monthly sum or mean.
pub fn parse_measurement(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    let v = raw.trim();
    if v.is_empty() {
        return Ok(None);
    }
    let value: f64 = v.parse()?;
    Ok(value.is_finite().then_some(value))
}

/// Shortest round-trip text for a float, with a trailing `.0` on whole
/// numbers (`3.0`, `21.25`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
