//! Slicing a forecast time series at the observation hour.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::{error::ForecastError, model::HourlyContext};

/// Hours summed for the look-ahead precipitation figure.
pub const DEFAULT_LOOKAHEAD_HOURS: usize = 2;

/// Variables read from the hourly series, keyed by their Open-Meteo names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyVariable {
    PrecipitationProbability,
    Precipitation,
    Rain,
    Snowfall,
    Temperature,
    ApparentTemperature,
    WindSpeed,
    RelativeHumidity,
    CloudCover,
    UvIndex,
}

impl HourlyVariable {
    pub fn key(self) -> &'static str {
        match self {
            HourlyVariable::PrecipitationProbability => "precipitation_probability",
            HourlyVariable::Precipitation => "precipitation",
            HourlyVariable::Rain => "rain",
            HourlyVariable::Snowfall => "snowfall",
            HourlyVariable::Temperature => "temperature_2m",
            HourlyVariable::ApparentTemperature => "apparent_temperature",
            HourlyVariable::WindSpeed => "wind_speed_10m",
            HourlyVariable::RelativeHumidity => "relative_humidity_2m",
            HourlyVariable::CloudCover => "cloud_cover",
            HourlyVariable::UvIndex => "uv_index",
        }
    }

    pub const fn all() -> &'static [HourlyVariable] {
        &[
            HourlyVariable::PrecipitationProbability,
            HourlyVariable::Precipitation,
            HourlyVariable::Rain,
            HourlyVariable::Snowfall,
            HourlyVariable::Temperature,
            HourlyVariable::ApparentTemperature,
            HourlyVariable::WindSpeed,
            HourlyVariable::RelativeHumidity,
            HourlyVariable::CloudCover,
            HourlyVariable::UvIndex,
        ]
    }
}

/// Parallel arrays keyed by timestamp, as returned in the `hourly` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlySeries {
    #[serde(deserialize_with = "deserialize_times")]
    pub time: Vec<NaiveDateTime>,
    #[serde(flatten)]
    pub columns: HashMap<String, Vec<Option<f64>>>,
}

impl HourlySeries {
    pub fn new(time: Vec<NaiveDateTime>) -> Self {
        Self { time, columns: HashMap::new() }
    }

    pub fn with_column(mut self, var: HourlyVariable, values: Vec<Option<f64>>) -> Self {
        self.columns.insert(var.key().to_string(), values);
        self
    }

    pub fn column(&self, var: HourlyVariable) -> Option<&[Option<f64>]> {
        self.columns.get(var.key()).map(Vec::as_slice)
    }

    /// Exact-match lookup; no interpolation between hours.
    pub fn index_of(&self, at: NaiveDateTime) -> Option<usize> {
        self.time.iter().position(|t| *t == at)
    }

    pub fn value(&self, var: HourlyVariable, index: usize) -> Option<f64> {
        self.column(var)?.get(index).copied().flatten()
    }
}

/// All hourly readings at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub precipitation_probability_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub rain_mm: Option<f64>,
    pub snowfall_cm: Option<f64>,
    pub temperature_c: Option<f64>,
    pub apparent_temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub uv_index: Option<f64>,
}

/// Reads every variable at `at`; `None` when the series or the timestamp is absent.
pub fn sample_at(series: Option<&HourlySeries>, at: NaiveDateTime) -> Option<HourlySample> {
    let series = series?;
    let idx = series.index_of(at)?;
    let get = |var| series.value(var, idx);

    Some(HourlySample {
        time: at,
        precipitation_probability_pct: get(HourlyVariable::PrecipitationProbability),
        precipitation_mm: get(HourlyVariable::Precipitation),
        rain_mm: get(HourlyVariable::Rain),
        snowfall_cm: get(HourlyVariable::Snowfall),
        temperature_c: get(HourlyVariable::Temperature),
        apparent_temperature_c: get(HourlyVariable::ApparentTemperature),
        wind_speed_kmh: get(HourlyVariable::WindSpeed),
        humidity_pct: get(HourlyVariable::RelativeHumidity),
        cloud_cover_pct: get(HourlyVariable::CloudCover),
        uv_index: get(HourlyVariable::UvIndex),
    })
}

/// Sum of `var` over `hours` consecutive slots starting at `at`.
///
/// Unknown or out-of-range slots contribute nothing; the result is unknown only
/// when the series, the column or the starting timestamp is missing.
pub fn sum_next_hours(
    series: Option<&HourlySeries>,
    at: NaiveDateTime,
    var: HourlyVariable,
    hours: usize,
) -> Option<f64> {
    let series = series?;
    let column = series.column(var)?;
    let start = series.index_of(at)?;

    Some(column.iter().skip(start).take(hours).flatten().sum())
}

impl HourlyContext {
    pub fn from_sample(sample: Option<&HourlySample>, next_hours_precipitation_mm: Option<f64>) -> Self {
        Self {
            precipitation_probability_pct: sample.and_then(|s| s.precipitation_probability_pct),
            precipitation_mm: sample.and_then(|s| s.precipitation_mm),
            rain_mm: sample.and_then(|s| s.rain_mm),
            snowfall_cm: sample.and_then(|s| s.snowfall_cm),
            next_hours_precipitation_mm,
        }
    }

    pub fn from_series(series: Option<&HourlySeries>, at: NaiveDateTime) -> Self {
        let sample = sample_at(series, at);
        let next = sum_next_hours(series, at, HourlyVariable::Precipitation, DEFAULT_LOOKAHEAD_HOURS);
        Self::from_sample(sample.as_ref(), next)
    }
}

/// Parses the minute-resolution local timestamps Open-Meteo emits (`2024-01-15T12:00`).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ForecastError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ForecastError::Timestamp(raw.to_string()))
}

fn deserialize_times<'de, D>(deserializer: D) -> Result<Vec<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    raw.iter()
        .map(|s| parse_timestamp(s).map_err(serde::de::Error::custom))
        .collect()
}
