use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{
    Config,
    hourly::{HourlySample, HourlySeries, sample_at},
    model::{HourlyContext, WeatherObservation},
    provider::{geocode::NominatimGeocoder, openmeteo::OpenMeteoProvider},
};

pub mod geocode;
pub mod openmeteo;

/// A named point to fetch weather for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Unnamed location, labelled by its coordinates.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self { name: format!("Lat {latitude:.3}, Lon {longitude:.3}"), latitude, longitude }
    }
}

/// One fetch cycle: the current observation plus the hourly series it sits in.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSnapshot {
    pub observation: WeatherObservation,
    pub hourly: Option<HourlySeries>,
}

impl ForecastSnapshot {
    pub fn hourly_sample(&self) -> Option<HourlySample> {
        sample_at(self.hourly.as_ref(), self.observation.observed_at)
    }

    pub fn hourly_context(&self) -> HourlyContext {
        HourlyContext::from_series(self.hourly.as_ref(), self.observation.observed_at)
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> anyhow::Result<ForecastSnapshot>;
}

/// Resolves place names to coordinates and back.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best match for a free-text query, `None` when nothing matches.
    async fn search(&self, query: &str) -> anyhow::Result<Option<Location>>;

    /// Name a point; unnamed points get a coordinate label.
    async fn reverse(&self, latitude: f64, longitude: f64) -> anyhow::Result<Location>;
}

/// Construct the forecast provider, honouring an `api_base` override from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let provider = match config.api_base.as_deref() {
        Some(base) => OpenMeteoProvider::with_base_url(base)?,
        None => OpenMeteoProvider::new()?,
    };

    Ok(Box::new(provider))
}

/// Construct the place-name lookup, honouring a `geocoder_base` override from config.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
    let geocoder = match config.geocoder_base.as_deref() {
        Some(base) => NominatimGeocoder::with_base_url(base)?,
        None => NominatimGeocoder::new()?,
    };

    Ok(Box::new(geocoder))
}

/// Keep error bodies short enough for a one-line message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
