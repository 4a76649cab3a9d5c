//! Weighted-score severity alert for current conditions.
//!
//! Each rule inspects the same immutable [`Conditions`] and contributes at most
//! one [`Factor`]. Tiered categories (wind, cold, heat, UV) are a single rule
//! that reports only its strongest tier.

use crate::{
    flags::{WindLevel, is_snowy, is_stormy, known},
    format::{fmt0, fmt1},
    model::{HourlyContext, SeverityAssessment, SeverityLevel, WeatherObservation},
};

pub const SEVERE_SCORE: u32 = 6;
pub const CAUTIONARY_SCORE: u32 = 3;

const NO_STRESSORS: &str = "No major weather stressors detected.";

struct Conditions<'a> {
    obs: &'a WeatherObservation,
    ctx: Option<&'a HourlyContext>,
    effective_c: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Factor {
    label: &'static str,
    weight: u32,
}

const fn factor(label: &'static str, weight: u32) -> Option<Factor> {
    Some(Factor { label, weight })
}

type Rule = fn(&Conditions<'_>) -> Option<Factor>;

const RULES: &[Rule] = &[storm, snow, wet, wind, cold, heat, uv];

fn storm(c: &Conditions<'_>) -> Option<Factor> {
    is_stormy(c.obs).then_some(Factor { label: "thunderstorm", weight: 4 })
}

fn snow(c: &Conditions<'_>) -> Option<Factor> {
    is_snowy(c.obs, c.ctx).then_some(Factor { label: "snow/ice risk", weight: 3 })
}

fn wet(c: &Conditions<'_>) -> Option<Factor> {
    let wet = c.obs.weather_code.is_some_and(|code| code.is_wet())
        || known(c.ctx.and_then(|x| x.precipitation_probability_pct), |p| p >= 50.0)
        || known(c.ctx.and_then(|x| x.next_hours_precipitation_mm), |mm| mm >= 1.0);
    wet.then_some(Factor { label: "rain risk", weight: 2 })
}

fn wind(c: &Conditions<'_>) -> Option<Factor> {
    match WindLevel::classify(c.obs) {
        WindLevel::StrongGusts => factor("strong gusts", 3),
        WindLevel::Windy => factor("windy", 2),
        WindLevel::Calm => None,
    }
}

fn cold(c: &Conditions<'_>) -> Option<Factor> {
    match c.effective_c? {
        t if t <= -5.0 => factor("very cold", 3),
        t if t <= 2.0 => factor("cold", 1),
        _ => None,
    }
}

fn heat(c: &Conditions<'_>) -> Option<Factor> {
    match c.effective_c? {
        t if t >= 33.0 => factor("very hot", 3),
        t if t >= 28.0 => factor("hot", 1),
        _ => None,
    }
}

fn uv(c: &Conditions<'_>) -> Option<Factor> {
    match c.obs.uv_index? {
        u if u >= 8.0 => factor("very high UV", 2),
        u if u >= 6.0 => factor("high UV", 1),
        _ => None,
    }
}

pub fn level_for_score(score: u32) -> SeverityLevel {
    if score >= SEVERE_SCORE {
        SeverityLevel::Severe
    } else if score >= CAUTIONARY_SCORE {
        SeverityLevel::Cautionary
    } else {
        SeverityLevel::Benign
    }
}

/// Scores the observation into a three-level alert with a human explanation.
pub fn classify_severity(
    obs: &WeatherObservation,
    ctx: Option<&HourlyContext>,
    effective_c: Option<f64>,
) -> SeverityAssessment {
    let conditions = Conditions { obs, ctx, effective_c };

    let (score, labels) = RULES.iter().filter_map(|rule| rule(&conditions)).fold(
        (0, Vec::new()),
        |(score, mut labels), f| {
            labels.push(f.label);
            (score + f.weight, labels)
        },
    );

    let level = level_for_score(score);
    tracing::debug!(score, ?level, factors = ?labels, "classified severity");

    let precip_prob = ctx.and_then(|c| c.precipitation_probability_pct);
    let mut meta = Vec::new();
    if effective_c.is_some() {
        meta.push(format!("Effective {}", fmt1(effective_c, "°C")));
    }
    if precip_prob.is_some() {
        meta.push(format!("Precip {}", fmt0(precip_prob, "%")));
    }
    if obs.wind_gust_kmh.is_some() {
        meta.push(format!("Gusts {}", fmt0(obs.wind_gust_kmh, " km/h")));
    }

    let detail = if labels.is_empty() {
        NO_STRESSORS.to_string()
    } else {
        format!("Key factors: {}.", labels.join(", "))
    };

    SeverityAssessment {
        level,
        score,
        title: level.title().to_string(),
        meta: meta.join(" • "),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::WeatherCode;
    use chrono::NaiveDate;

    fn calm() -> WeatherObservation {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid date");
        WeatherObservation {
            temperature_c: Some(18.0),
            wind_speed_kmh: Some(8.0),
            wind_gust_kmh: Some(12.0),
            uv_index: Some(2.0),
            weather_code: Some(WeatherCode(1)),
            ..WeatherObservation::empty(at)
        }
    }

    #[test]
    fn benign_when_nothing_triggers() {
        let sev = classify_severity(&calm(), None, Some(17.0));
        assert_eq!(sev.level, SeverityLevel::Benign);
        assert_eq!(sev.score, 0);
        assert_eq!(sev.title, "All clear");
        assert_eq!(sev.detail, "No major weather stressors detected.");
        assert_eq!(sev.meta, "Effective 17°C • Gusts 12 km/h");
    }

    #[test]
    fn each_flag_adds_exactly_its_weight() {
        let base = classify_severity(&calm(), None, Some(17.0)).score;

        let mut o = calm();
        o.weather_code = Some(WeatherCode(95));
        assert_eq!(classify_severity(&o, None, Some(17.0)).score - base, 4);

        let mut o = calm();
        o.weather_code = Some(WeatherCode(73));
        assert_eq!(classify_severity(&o, None, Some(17.0)).score - base, 3);

        let mut o = calm();
        o.weather_code = Some(WeatherCode(61));
        assert_eq!(classify_severity(&o, None, Some(17.0)).score - base, 2);

        let mut o = calm();
        o.wind_gust_kmh = Some(45.0);
        assert_eq!(classify_severity(&o, None, Some(17.0)).score - base, 2);

        let mut o = calm();
        o.uv_index = Some(6.5);
        assert_eq!(classify_severity(&o, None, Some(17.0)).score - base, 1);

        assert_eq!(classify_severity(&calm(), None, Some(1.0)).score - base, 1);
        assert_eq!(classify_severity(&calm(), None, Some(29.0)).score - base, 1);
    }

    #[test]
    fn tiers_are_exclusive_per_category() {
        let mut o = calm();
        o.wind_gust_kmh = Some(70.0);
        o.wind_speed_kmh = Some(30.0);
        o.uv_index = Some(9.0);
        let sev = classify_severity(&o, None, Some(-8.0));
        // strong gusts 3 + very cold 3 + very high UV 2
        assert_eq!(sev.score, 8);
        assert_eq!(sev.level, SeverityLevel::Severe);
        assert_eq!(sev.detail, "Key factors: strong gusts, very cold, very high UV.");
        assert!(!sev.detail.contains("windy"));
    }

    #[test]
    fn sustained_wind_alone_can_be_strong() {
        let mut o = calm();
        o.wind_speed_kmh = Some(35.0);
        o.wind_gust_kmh = None;
        let sev = classify_severity(&o, None, Some(17.0));
        assert_eq!(sev.score, 3);
        assert_eq!(sev.level, SeverityLevel::Cautionary);
        assert!(!sev.meta.contains("Gusts"));
    }

    #[test]
    fn hourly_context_drives_wet_and_snow() {
        let ctx = HourlyContext {
            precipitation_probability_pct: Some(50.0),
            snowfall_cm: Some(0.3),
            ..HourlyContext::default()
        };
        let sev = classify_severity(&calm(), Some(&ctx), Some(17.0));
        assert_eq!(sev.score, 5);
        assert_eq!(sev.detail, "Key factors: snow/ice risk, rain risk.");
        assert_eq!(sev.meta, "Effective 17°C • Precip 50% • Gusts 12 km/h");

        let ctx = HourlyContext { next_hours_precipitation_mm: Some(1.0), ..HourlyContext::default() };
        assert_eq!(classify_severity(&calm(), Some(&ctx), Some(17.0)).score, 2);

        let ctx = HourlyContext {
            precipitation_probability_pct: Some(49.0),
            next_hours_precipitation_mm: Some(0.9),
            ..HourlyContext::default()
        };
        assert_eq!(classify_severity(&calm(), Some(&ctx), Some(17.0)).score, 0);
    }

    #[test]
    fn light_snow_with_wind_chill_is_at_least_cautionary() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .expect("valid date");
        let o = WeatherObservation {
            temperature_c: Some(-3.0),
            humidity_pct: Some(70.0),
            wind_speed_kmh: Some(10.0),
            wind_gust_kmh: Some(15.0),
            weather_code: Some(WeatherCode(71)),
            uv_index: Some(1.0),
            cloud_cover_pct: Some(90.0),
            ..WeatherObservation::empty(at)
        };
        let eff = crate::effective::EffectiveTemperature::select(&o);
        let sev = classify_severity(&o, None, eff.value_c);
        // snow 3 + very cold (wind chill about -6.9) 3
        assert_eq!(sev.score, 6);
        assert!(sev.level >= SeverityLevel::Cautionary);
    }

    #[test]
    fn unknown_effective_temperature_adds_nothing() {
        let sev = classify_severity(&calm(), None, None);
        assert_eq!(sev.score, 0);
        assert_eq!(sev.meta, "Gusts 12 km/h");
    }

    #[test]
    fn score_thresholds() {
        assert_eq!(level_for_score(2), SeverityLevel::Benign);
        assert_eq!(level_for_score(3), SeverityLevel::Cautionary);
        assert_eq!(level_for_score(5), SeverityLevel::Cautionary);
        assert_eq!(level_for_score(6), SeverityLevel::Severe);
    }
}
