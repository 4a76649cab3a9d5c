use serde::{Deserialize, Serialize};
use std::fmt;

/// Drizzle, rain, freezing rain and rain showers.
pub const WET_CODES: &[u16] = &[51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 80, 81, 82];

/// Snowfall, snow grains and snow showers.
pub const SNOW_CODES: &[u16] = &[71, 73, 75, 77, 85, 86];

/// Thunderstorm, with or without hail.
pub const STORM_CODES: &[u16] = &[95, 96, 99];

/// WMO weather interpretation code as reported by the forecast provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(pub u16);

impl WeatherCode {
    pub fn is_wet(self) -> bool {
        WET_CODES.contains(&self.0)
    }

    pub fn is_snow(self) -> bool {
        SNOW_CODES.contains(&self.0)
    }

    pub fn is_storm(self) -> bool {
        STORM_CODES.contains(&self.0)
    }

    /// Short label for a known code, `None` for codes outside the taxonomy.
    pub fn known_label(self) -> Option<&'static str> {
        let label = match self.0 {
            0 => "Clear",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Drizzle",
            55 => "Dense drizzle",
            56 | 57 => "Freezing drizzle",
            61 => "Light rain",
            63 => "Rain",
            65 => "Heavy rain",
            66 | 67 => "Freezing rain",
            71 => "Light snow",
            73 => "Snow",
            75 => "Heavy snow",
            77 => "Snow grains",
            80 | 81 => "Rain showers",
            82 => "Violent rain showers",
            85 => "Snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 | 99 => "Thunderstorm + hail",
            _ => return None,
        };
        Some(label)
    }

    /// Human label; unrecognised codes render as `Code {n}`.
    pub fn label(self) -> String {
        match self.known_label() {
            Some(label) => label.to_string(),
            None => format!("Code {}", self.0),
        }
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Label for an optional code, used in explanation text.
pub fn describe(code: Option<WeatherCode>) -> String {
    code.map(WeatherCode::label).unwrap_or_else(|| "Unknown conditions".to_string())
}
