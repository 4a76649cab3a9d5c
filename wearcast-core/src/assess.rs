use serde::Serialize;

use crate::{
    effective::EffectiveTemperature,
    hourly::HourlySample,
    model::{HourlyContext, Recommendation, SeverityAssessment, UserPreferences, WeatherObservation},
    provider::ForecastSnapshot,
    recommend::derive_recommendation,
    severity::classify_severity,
};

/// Everything derived from one snapshot, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub observation: WeatherObservation,
    pub hourly: Option<HourlySample>,
    pub context: HourlyContext,
    pub effective: EffectiveTemperature,
    pub severity: SeverityAssessment,
    pub recommendation: Recommendation,
}

/// Runs the full pipeline: effective temperature first, then severity and recommendation.
pub fn assess(snapshot: &ForecastSnapshot, prefs: UserPreferences) -> Assessment {
    let obs = &snapshot.observation;
    let context = snapshot.hourly_context();
    let effective = EffectiveTemperature::select(obs);

    let severity = classify_severity(obs, Some(&context), effective.value_c);
    let recommendation = derive_recommendation(obs, Some(&context), prefs);

    Assessment {
        observation: obs.clone(),
        hourly: snapshot.hourly_sample(),
        context,
        effective,
        severity,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::WeatherCode,
        hourly::{HourlySeries, HourlyVariable, parse_timestamp},
        model::{BadgeLevel, SeverityLevel},
    };

    #[test]
    fn rainy_snapshot_end_to_end() {
        let at = parse_timestamp("2024-04-02T08:00").expect("valid timestamp");
        let next = parse_timestamp("2024-04-02T09:00").expect("valid timestamp");
        let observation = WeatherObservation {
            temperature_c: Some(11.0),
            apparent_temperature_c: Some(9.0),
            humidity_pct: Some(85.0),
            wind_speed_kmh: Some(12.0),
            wind_gust_kmh: Some(22.0),
            cloud_cover_pct: Some(100.0),
            precipitation_mm: Some(0.8),
            uv_index: Some(1.0),
            weather_code: Some(WeatherCode(61)),
            ..WeatherObservation::empty(at)
        };
        let hourly = HourlySeries::new(vec![at, next])
            .with_column(HourlyVariable::PrecipitationProbability, vec![Some(65.0), Some(80.0)])
            .with_column(HourlyVariable::Precipitation, vec![Some(0.8), Some(1.2)]);

        let snapshot = ForecastSnapshot { observation, hourly: Some(hourly) };
        let a = assess(&snapshot, UserPreferences::default());

        assert_eq!(a.context.precipitation_probability_pct, Some(65.0));
        assert_eq!(a.severity.level, SeverityLevel::Benign);
        assert_eq!(a.severity.detail, "Key factors: rain risk.");
        assert_eq!(a.recommendation.badge, BadgeLevel::Cautionary);
        assert_eq!(a.recommendation.outer[0], "rain jacket / shell");
        assert!(a.recommendation.accessories.iter().any(|s| s == "avoid suede / consider spare socks"));
        assert!(a.hourly.is_some());
    }
}
