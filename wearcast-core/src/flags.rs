//! Condition flags shared by the severity classifier and the recommendation rules.

use crate::model::{HourlyContext, WeatherObservation};

pub const WINDY_GUST_KMH: f64 = 40.0;
pub const WINDY_SPEED_KMH: f64 = 25.0;
pub const STRONG_GUST_KMH: f64 = 60.0;
pub const STRONG_SPEED_KMH: f64 = 35.0;

/// True when a known value satisfies `pred`; unknown never satisfies a threshold.
pub(crate) fn known(value: Option<f64>, pred: impl FnOnce(f64) -> bool) -> bool {
    value.is_some_and(pred)
}

pub fn is_stormy(obs: &WeatherObservation) -> bool {
    obs.weather_code.is_some_and(|c| c.is_storm())
}

pub fn is_snowy(obs: &WeatherObservation, ctx: Option<&HourlyContext>) -> bool {
    obs.weather_code.is_some_and(|c| c.is_snow())
        || known(ctx.and_then(|c| c.snowfall_cm), |s| s > 0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WindLevel {
    Calm,
    Windy,
    StrongGusts,
}

impl WindLevel {
    pub fn classify(obs: &WeatherObservation) -> Self {
        let (gust, wind) = (obs.wind_gust_kmh, obs.wind_speed_kmh);
        if known(gust, |g| g >= STRONG_GUST_KMH) || known(wind, |w| w >= STRONG_SPEED_KMH) {
            WindLevel::StrongGusts
        } else if known(gust, |g| g >= WINDY_GUST_KMH) || known(wind, |w| w >= WINDY_SPEED_KMH) {
            WindLevel::Windy
        } else {
            WindLevel::Calm
        }
    }

    pub fn is_windy(self) -> bool {
        self != WindLevel::Calm
    }
}
