//! Secondary meteorological quantities derived from temperature, humidity and wind.
//!
//! Every function takes and returns `Option<f64>`: an unknown input yields an
//! unknown output, never zero or NaN.

use serde::{Deserialize, Serialize};

const MAGNUS_A: f64 = 17.62;
const MAGNUS_B: f64 = 243.12;

/// Wind chill is only defined at or below this temperature, °C.
pub const WIND_CHILL_MAX_TEMP_C: f64 = 10.0;
/// Wind chill needs wind strictly above this speed, km/h.
pub const WIND_CHILL_MIN_WIND_KMH: f64 = 4.8;

/// Dew point via the Magnus approximation. Humidity is clamped to `[1, 100]`.
pub fn dew_point(temp_c: Option<f64>, humidity_pct: Option<f64>) -> Option<f64> {
    let (t, rh) = (temp_c?, humidity_pct?);
    let rh = rh.clamp(1.0, 100.0) / 100.0;
    let gamma = (MAGNUS_A * t) / (MAGNUS_B + t) + rh.ln();
    Some((MAGNUS_B * gamma) / (MAGNUS_A - gamma))
}

/// Canadian humidex from air temperature and dew point.
pub fn humidex(temp_c: Option<f64>, dew_point_c: Option<f64>) -> Option<f64> {
    let (t, dew) = (temp_c?, dew_point_c?);
    let e = 6.11 * (5417.753 * (1.0 / 273.16 - 1.0 / (dew + 273.15))).exp();
    Some(t + 0.5555 * (e - 10.0))
}

/// Environment Canada wind chill, defined for T <= 10°C and wind > 4.8 km/h.
pub fn wind_chill(temp_c: Option<f64>, wind_kmh: Option<f64>) -> Option<f64> {
    let (t, wind) = (temp_c?, wind_kmh?);
    if t > WIND_CHILL_MAX_TEMP_C || wind <= WIND_CHILL_MIN_WIND_KMH {
        return None;
    }
    let v16 = wind.max(0.0).powf(0.16);
    Some(13.12 + 0.6215 * t - 11.37 * v16 + 0.3965 * t * v16)
}

/// How muggy a dew point feels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DewPointFeel {
    DryIsh,
    ABitHumid,
    Muggy,
    VeryMuggy,
}

impl DewPointFeel {
    pub fn from_dew_point(dew_c: f64) -> Self {
        if dew_c >= 18.0 {
            DewPointFeel::VeryMuggy
        } else if dew_c >= 16.0 {
            DewPointFeel::Muggy
        } else if dew_c >= 12.0 {
            DewPointFeel::ABitHumid
        } else {
            DewPointFeel::DryIsh
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DewPointFeel::DryIsh => "dry-ish",
            DewPointFeel::ABitHumid => "a bit humid",
            DewPointFeel::Muggy => "muggy",
            DewPointFeel::VeryMuggy => "very muggy",
        }
    }
}
