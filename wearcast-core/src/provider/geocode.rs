//! Place lookup: free-text search to coordinates, and coordinates back to a name.
//! Uses Nominatim (OpenStreetMap), which needs no API key but asks for a
//! descriptive user agent.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::GeocodeError;

use super::{Geocoder, Location, truncate_body};

pub const DEFAULT_GEOCODER_BASE: &str = "https://nominatim.openstreetmap.org";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("wearcast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_GEOCODER_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build geocoding client")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, "geocoding request");

        let res = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("format", "json")])
            .query(query)
            .send()
            .await
            .context("Failed to send geocoding request")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(GeocodeError::Http { status: status.as_u16(), body: truncate_body(&body) }.into());
        }

        Ok(body)
    }
}

/// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
}

fn coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::Coordinate(raw.to_string()))
}

/// Parse a `/search` body; the first hit wins, an empty list means no match.
pub fn parse_search(body: &str) -> Result<Option<Location>, GeocodeError> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)?;
    let Some(first) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = coordinate(&first.lat)?;
    let longitude = coordinate(&first.lon)?;

    Ok(Some(match first.display_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => Location { name, latitude, longitude },
        None => Location::from_coordinates(latitude, longitude),
    }))
}

/// Parse a `/reverse` body. Nominatim answers unmappable points with
/// `{"error": ...}` and status 200, which falls back to a coordinate label.
pub fn parse_reverse(body: &str, latitude: f64, longitude: f64) -> Result<Location, GeocodeError> {
    let parsed: NominatimReverse = serde_json::from_str(body)?;

    Ok(match parsed.display_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => Location { name, latitude, longitude },
        None => Location::from_coordinates(latitude, longitude),
    })
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Location>> {
        let body = self
            .get("search", &[("q", query.to_string()), ("limit", "1".to_string())])
            .await?;

        let found = parse_search(&body).context("Failed to parse place search results")?;
        match &found {
            Some(loc) => tracing::info!(query, place = %loc.name, "resolved place"),
            None => tracing::debug!(query, "no place matched"),
        }

        Ok(found)
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Location> {
        let body = self
            .get("reverse", &[("lat", latitude.to_string()), ("lon", longitude.to_string())])
            .await?;

        parse_reverse(&body, latitude, longitude).context("Failed to parse reverse geocoding result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_search_hit_wins() {
        let body = r#"[
            {"place_id": 1, "lat": "52.5170365", "lon": "13.3888599", "display_name": "Berlin, Deutschland"},
            {"place_id": 2, "lat": "44.4", "lon": "-71.2", "display_name": "Berlin, New Hampshire"}
        ]"#;

        let loc = parse_search(body).expect("valid").expect("one hit");
        assert_eq!(loc.name, "Berlin, Deutschland");
        assert!((loc.latitude - 52.5170365).abs() < 1e-9);
        assert!((loc.longitude - 13.3888599).abs() < 1e-9);
    }

    #[test]
    fn empty_search_is_no_match() {
        assert_eq!(parse_search("[]").expect("valid"), None);
    }

    #[test]
    fn unnamed_hit_is_labelled_by_coordinates() {
        let loc = parse_search(r#"[{"lat": "-33.8688", "lon": "151.2093"}]"#)
            .expect("valid")
            .expect("one hit");
        assert_eq!(loc.name, "Lat -33.869, Lon 151.209");
    }

    #[test]
    fn garbage_coordinate_is_an_error() {
        let err = parse_search(r#"[{"lat": "north", "lon": "1.0"}]"#).unwrap_err();
        assert!(matches!(err, GeocodeError::Coordinate(ref raw) if raw == "north"));
    }

    #[test]
    fn reverse_uses_display_name() {
        let loc = parse_reverse(r#"{"display_name": "Zürich, Schweiz"}"#, 47.37, 8.55).expect("valid");
        assert_eq!(loc, Location { name: "Zürich, Schweiz".into(), latitude: 47.37, longitude: 8.55 });
    }

    #[test]
    fn reverse_without_name_falls_back_to_coordinates() {
        let loc = parse_reverse(r#"{"error": "Unable to geocode"}"#, 0.0, -140.0).expect("valid");
        assert_eq!(loc.name, "Lat 0.000, Lon -140.000");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let g = NominatimGeocoder::with_base_url("http://localhost:1234/").expect("client builds");
        assert_eq!(g.base_url, "http://localhost:1234");
    }
}
