//! Core library for the `wearcast` CLI.
//!
//! This crate defines:
//! - Derived weather quantities and the effective ("feels like") temperature
//! - A severity classifier and a wardrobe recommendation engine
//! - Configuration & saved preferences
//! - The Open-Meteo forecast provider and its wire format
//! - Place lookup (search and reverse) via Nominatim
//!
//! The derivation pipeline is pure and synchronous; only `config` and
//! `provider` perform I/O.

pub mod assess;
pub mod condition;
pub mod config;
pub mod derived;
pub mod effective;
pub mod error;
pub mod flags;
pub mod format;
pub mod hourly;
pub mod model;
pub mod provider;
pub mod recommend;
pub mod severity;

pub use assess::{Assessment, assess};
pub use condition::WeatherCode;
pub use config::Config;
pub use effective::{EffectiveSource, EffectiveTemperature};
pub use error::{ForecastError, GeocodeError, PreferenceError};
pub use hourly::{HourlySeries, HourlyVariable};
pub use model::{
    BadgeLevel, DayPhase, HourlyContext, Recommendation, SeverityAssessment, SeverityLevel,
    TemperatureBias, UserPreferences, WeatherObservation,
};
pub use provider::{ForecastProvider, ForecastSnapshot, Geocoder, Location};
pub use recommend::derive_recommendation;
pub use severity::classify_severity;
