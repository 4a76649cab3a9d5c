//! Number formatting for explanation text. Unknown values render as "—".

const UNKNOWN: &str = "—";

/// Rounded to a whole number, followed by `unit`.
pub fn fmt0(value: Option<f64>, unit: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}{unit}", normalize(v.round())),
        None => UNKNOWN.to_string(),
    }
}

/// Rounded to one decimal place, trailing `.0` dropped.
pub fn fmt1(value: Option<f64>, unit: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}{unit}", normalize((v * 10.0).round() / 10.0)),
        None => UNKNOWN.to_string(),
    }
}

// -0.0 would otherwise print as "-0".
fn normalize(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_values() {
        assert_eq!(fmt1(Some(3.24), "°C"), "3.2°C");
        assert_eq!(fmt1(Some(4.0), "°C"), "4°C");
        assert_eq!(fmt0(Some(64.6), "%"), "65%");
        assert_eq!(fmt0(Some(35.0), " km/h"), "35 km/h");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(fmt1(Some(-0.01), "°C"), "0°C");
        assert_eq!(fmt0(Some(-0.2), ""), "0");
    }

    #[test]
    fn unknown_and_nan_render_as_dash() {
        assert_eq!(fmt1(None, "°C"), "—");
        assert_eq!(fmt0(Some(f64::NAN), "%"), "—");
    }
}
