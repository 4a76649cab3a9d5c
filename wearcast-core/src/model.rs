use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{condition::WeatherCode, error::PreferenceError};

/// Whether the observation was taken during daylight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayPhase {
    Day,
    Night,
    #[default]
    Unknown,
}

impl DayPhase {
    /// Open-Meteo reports `is_day` as 1/0.
    pub fn from_flag(flag: Option<f64>) -> Self {
        match flag {
            Some(v) if v == 1.0 => DayPhase::Day,
            Some(v) if v == 0.0 => DayPhase::Night,
            _ => DayPhase::Unknown,
        }
    }
}

/// Current conditions at one point in time. Every reading may be unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub observed_at: NaiveDateTime,
    pub temperature_c: Option<f64>,
    pub apparent_temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_gust_kmh: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    /// Precipitation for the current hour, mm.
    pub precipitation_mm: Option<f64>,
    pub uv_index: Option<f64>,
    pub weather_code: Option<WeatherCode>,
    pub visibility_m: Option<f64>,
    pub day_phase: DayPhase,
}

impl WeatherObservation {
    /// An observation with every reading unknown.
    pub fn empty(observed_at: NaiveDateTime) -> Self {
        Self {
            observed_at,
            temperature_c: None,
            apparent_temperature_c: None,
            humidity_pct: None,
            wind_speed_kmh: None,
            wind_gust_kmh: None,
            cloud_cover_pct: None,
            precipitation_mm: None,
            uv_index: None,
            weather_code: None,
            visibility_m: None,
            day_phase: DayPhase::Unknown,
        }
    }
}

/// Forecast values aligned to the observation hour. `None` means unknown, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyContext {
    pub precipitation_probability_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub rain_mm: Option<f64>,
    pub snowfall_cm: Option<f64>,
    /// Cumulative precipitation over the look-ahead window, mm.
    pub next_hours_precipitation_mm: Option<f64>,
}

/// Personal temperature bias. Runs-cold and runs-hot cannot both hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureBias {
    #[default]
    Neutral,
    RunsCold,
    RunsHot,
}

impl TemperatureBias {
    pub fn from_flags(runs_cold: bool, runs_hot: bool) -> Result<Self, PreferenceError> {
        match (runs_cold, runs_hot) {
            (true, true) => Err(PreferenceError::ConflictingBias),
            (true, false) => Ok(TemperatureBias::RunsCold),
            (false, true) => Ok(TemperatureBias::RunsHot),
            (false, false) => Ok(TemperatureBias::Neutral),
        }
    }

    /// Shift applied to the effective temperature, °C.
    pub fn offset_c(self) -> f64 {
        match self {
            TemperatureBias::Neutral => 0.0,
            TemperatureBias::RunsCold => -2.0,
            TemperatureBias::RunsHot => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemperatureBias::Neutral => "neutral",
            TemperatureBias::RunsCold => "runs-cold",
            TemperatureBias::RunsHot => "runs-hot",
        }
    }

    pub const fn all() -> &'static [TemperatureBias] {
        &[TemperatureBias::Neutral, TemperatureBias::RunsCold, TemperatureBias::RunsHot]
    }
}

impl TryFrom<&str> for TemperatureBias {
    type Error = PreferenceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "neutral" => Ok(TemperatureBias::Neutral),
            "runs-cold" | "cold" => Ok(TemperatureBias::RunsCold),
            "runs-hot" | "hot" => Ok(TemperatureBias::RunsHot),
            _ => Err(PreferenceError::UnknownBias(value.to_string())),
        }
    }
}

impl std::fmt::Display for TemperatureBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    #[serde(default)]
    pub bias: TemperatureBias,
    #[serde(default)]
    pub formal: bool,
    /// Commuting by bike or on foot.
    #[serde(default)]
    pub bike_walk: bool,
}

impl UserPreferences {
    /// Build from the four independent flags used by preference storage.
    pub fn from_flags(
        runs_cold: bool,
        runs_hot: bool,
        formal: bool,
        bike_walk: bool,
    ) -> Result<Self, PreferenceError> {
        Ok(Self { bias: TemperatureBias::from_flags(runs_cold, runs_hot)?, formal, bike_walk })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Benign,
    Cautionary,
    Severe,
}

impl SeverityLevel {
    pub fn title(self) -> &'static str {
        match self {
            SeverityLevel::Benign => "All clear",
            SeverityLevel::Cautionary => "Be prepared",
            SeverityLevel::Severe => "Severe conditions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityAssessment {
    pub level: SeverityLevel,
    pub score: u32,
    pub title: String,
    /// e.g. `Effective 3.2°C • Precip 40% • Gusts 35 km/h`
    pub meta: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeLevel {
    Comfortable,
    Cautionary,
    Severe,
}

impl BadgeLevel {
    pub fn text(self) -> &'static str {
        match self {
            BadgeLevel::Comfortable => "Comfortable",
            BadgeLevel::Cautionary => "Be prepared",
            BadgeLevel::Severe => "Severe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub badge: BadgeLevel,
    pub badge_text: String,
    pub outer: Vec<String>,
    pub top: Vec<String>,
    pub bottom: Vec<String>,
    pub accessories: Vec<String>,
    pub tips: Vec<String>,
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_from_flags() {
        assert_eq!(TemperatureBias::from_flags(false, false).ok(), Some(TemperatureBias::Neutral));
        assert_eq!(TemperatureBias::from_flags(true, false).ok(), Some(TemperatureBias::RunsCold));
        assert_eq!(TemperatureBias::from_flags(false, true).ok(), Some(TemperatureBias::RunsHot));
    }

    #[test]
    fn conflicting_bias_is_rejected() {
        let err = UserPreferences::from_flags(true, true, false, false).unwrap_err();
        assert!(err.to_string().contains("runs cold and runs hot"));
    }

    #[test]
    fn bias_as_str_roundtrip() {
        for bias in TemperatureBias::all() {
            let parsed = TemperatureBias::try_from(bias.as_str()).expect("roundtrip should succeed");
            assert_eq!(*bias, parsed);
        }
        assert!(matches!(
            TemperatureBias::try_from("lukewarm"),
            Err(PreferenceError::UnknownBias(_))
        ));
    }

    #[test]
    fn bias_offsets() {
        assert_eq!(TemperatureBias::RunsCold.offset_c(), -2.0);
        assert_eq!(TemperatureBias::RunsHot.offset_c(), 2.0);
        assert_eq!(TemperatureBias::Neutral.offset_c(), 0.0);
    }

    #[test]
    fn day_phase_from_flag() {
        assert_eq!(DayPhase::from_flag(Some(1.0)), DayPhase::Day);
        assert_eq!(DayPhase::from_flag(Some(0.0)), DayPhase::Night);
        assert_eq!(DayPhase::from_flag(Some(3.0)), DayPhase::Unknown);
        assert_eq!(DayPhase::from_flag(None), DayPhase::Unknown);
    }

    #[test]
    fn preferences_deserialize_with_defaults() {
        let prefs: UserPreferences = toml::from_str("bias = \"runs-hot\"").expect("valid toml");
        assert_eq!(prefs.bias, TemperatureBias::RunsHot);
        assert!(!prefs.formal);
        assert!(!prefs.bike_walk);
    }
}
