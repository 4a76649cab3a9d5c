//! Plain-text presentation of an [`Assessment`].

use std::fmt;

use wearcast_core::{
    Assessment, DayPhase, SeverityLevel, condition,
    format::{fmt0, fmt1},
};

fn severity_marker(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Benign => "[ok]",
        SeverityLevel::Cautionary => "[!]",
        SeverityLevel::Severe => "[!!]",
    }
}

fn day_phase(phase: DayPhase) -> &'static str {
    match phase {
        DayPhase::Day => "day",
        DayPhase::Night => "night",
        DayPhase::Unknown => "—",
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "{title}:")?;
    for item in items {
        writeln!(f, "  - {item}")?;
    }
    Ok(())
}

/// Text report for one place.
pub struct Report<'a> {
    pub place: &'a str,
    pub assessment: &'a Assessment,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.assessment;
        let obs = &a.observation;

        writeln!(f, "{}, updated {}", self.place, obs.observed_at.format("%Y-%m-%d %H:%M"))?;
        let code = obs.weather_code.map(|c| format!(" ({})", c.0)).unwrap_or_default();
        writeln!(f, "{}{code}, {}", condition::describe(obs.weather_code), day_phase(obs.day_phase))?;
        writeln!(
            f,
            "Temp {} (feels {}), effective {} ({}), dew point {}",
            fmt1(obs.temperature_c, "°C"),
            fmt1(obs.apparent_temperature_c, "°C"),
            fmt1(a.effective.value_c, "°C"),
            a.effective.source.label(),
            fmt1(a.effective.dew_point_c, "°C"),
        )?;
        writeln!(
            f,
            "Wind {} (gusts {}), humidity {}, cloud {}, UV {}",
            fmt0(obs.wind_speed_kmh, " km/h"),
            fmt0(obs.wind_gust_kmh, " km/h"),
            fmt0(obs.humidity_pct, "%"),
            fmt0(obs.cloud_cover_pct, "%"),
            fmt1(obs.uv_index, ""),
        )?;
        writeln!(
            f,
            "Precip {} (chance {}), visibility {}",
            fmt1(obs.precipitation_mm, " mm"),
            fmt0(a.context.precipitation_probability_pct, "%"),
            fmt1(obs.visibility_m.map(|m| m / 1000.0), " km"),
        )?;

        let sev = &a.severity;
        writeln!(f)?;
        writeln!(f, "{} {}", severity_marker(sev.level), sev.title)?;
        if !sev.meta.is_empty() {
            writeln!(f, "  {}", sev.meta)?;
        }
        writeln!(f, "  {}", sev.detail)?;

        let rec = &a.recommendation;
        writeln!(f)?;
        writeln!(f, "What to wear: {}", rec.badge_text)?;
        section(f, "Outer layer", &rec.outer)?;
        section(f, "Upper body", &rec.top)?;
        section(f, "Lower body", &rec.bottom)?;
        section(f, "Accessories / notes", &rec.accessories)?;
        section(f, "Tips", &rec.tips)?;
        section(f, "Why", &rec.reasons)
    }
}
