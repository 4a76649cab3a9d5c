use serde::{Deserialize, Serialize};

use crate::{
    derived::{dew_point, humidex, wind_chill},
    model::WeatherObservation,
};

/// Humidex is only preferred when it exceeds air temperature by at least this much.
pub const HUMIDEX_MIN_EXCESS_C: f64 = 1.0;

/// Which quantity the effective temperature was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveSource {
    WindChill,
    Humidex,
    Apparent,
}

impl EffectiveSource {
    pub fn label(self) -> &'static str {
        match self {
            EffectiveSource::WindChill => "wind chill",
            EffectiveSource::Humidex => "humidex",
            EffectiveSource::Apparent => "apparent",
        }
    }
}

/// The single number that best represents how the temperature feels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveTemperature {
    pub value_c: Option<f64>,
    pub source: EffectiveSource,
    pub dew_point_c: Option<f64>,
}

impl EffectiveTemperature {
    /// Wind chill wins, then a humidex that adds real skew, then apparent temperature.
    pub fn select(obs: &WeatherObservation) -> Self {
        let t = obs.temperature_c;
        let dew = dew_point(t, obs.humidity_pct);

        let (value_c, source) = if let Some(wc) = wind_chill(t, obs.wind_speed_kmh) {
            (Some(wc), EffectiveSource::WindChill)
        } else if let Some(hx) =
            humidex(t, dew).filter(|hx| t.is_some_and(|t| *hx >= t + HUMIDEX_MIN_EXCESS_C))
        {
            (Some(hx), EffectiveSource::Humidex)
        } else {
            (obs.apparent_temperature_c, EffectiveSource::Apparent)
        };

        tracing::debug!(?value_c, source = source.label(), "selected effective temperature");

        Self { value_c, source, dew_point_c: dew }
    }
}
