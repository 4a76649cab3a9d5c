use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    condition::WeatherCode,
    error::ForecastError,
    hourly::{HourlySeries, HourlyVariable, parse_timestamp},
    model::{DayPhase, WeatherObservation},
};

use super::{ForecastProvider, ForecastSnapshot, Location, truncate_body};

pub const DEFAULT_API_BASE: &str = "https://api.open-meteo.com";

const CURRENT_VARIABLES: &[&str] = &[
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "cloud_cover",
    "precipitation",
    "weather_code",
    "wind_speed_10m",
    "wind_gusts_10m",
    "uv_index",
    "visibility",
    "is_day",
];

const FORECAST_DAYS: &str = "2";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    fn hourly_variables() -> String {
        HourlyVariable::all().iter().map(|v| v.key()).collect::<Vec<_>>().join(",")
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    #[serde(default)]
    temperature_2m: Option<f64>,
    #[serde(default)]
    apparent_temperature: Option<f64>,
    #[serde(default)]
    relative_humidity_2m: Option<f64>,
    #[serde(default)]
    cloud_cover: Option<f64>,
    #[serde(default)]
    precipitation: Option<f64>,
    #[serde(default)]
    weather_code: Option<u16>,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
    #[serde(default)]
    wind_gusts_10m: Option<f64>,
    #[serde(default)]
    uv_index: Option<f64>,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    is_day: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: Option<OmCurrent>,
    hourly: Option<HourlySeries>,
}

impl OmCurrent {
    fn into_observation(self) -> Result<WeatherObservation, ForecastError> {
        Ok(WeatherObservation {
            observed_at: parse_timestamp(&self.time)?,
            temperature_c: self.temperature_2m,
            apparent_temperature_c: self.apparent_temperature,
            humidity_pct: self.relative_humidity_2m,
            wind_speed_kmh: self.wind_speed_10m,
            wind_gust_kmh: self.wind_gusts_10m,
            cloud_cover_pct: self.cloud_cover,
            precipitation_mm: self.precipitation,
            uv_index: self.uv_index,
            weather_code: self.weather_code.map(WeatherCode),
            visibility_m: self.visibility,
            day_phase: DayPhase::from_flag(self.is_day),
        })
    }
}

/// Parse a `/v1/forecast` response body (also used for saved snapshots).
pub fn parse_forecast(body: &str) -> Result<ForecastSnapshot, ForecastError> {
    let parsed: OmResponse = serde_json::from_str(body)?;
    let current = parsed.current.ok_or(ForecastError::MissingCurrent)?;

    if parsed.hourly.is_none() {
        tracing::warn!("forecast response has no hourly block; hourly context will be unknown");
    }

    Ok(ForecastSnapshot { observation: current.into_observation()?, hourly: parsed.hourly })
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch(&self, location: &Location) -> Result<ForecastSnapshot> {
        let url = format!("{}/v1/forecast", self.base_url);
        tracing::debug!(%url, location = %location.name, "fetching forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_VARIABLES.join(",")),
                ("hourly", Self::hourly_variables()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("wind_speed_unit", "kmh".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(ForecastError::Http { status: status.as_u16(), body: truncate_body(&body) }.into());
        }

        parse_forecast(&body).context("Failed to parse Open-Meteo forecast")
    }
}
