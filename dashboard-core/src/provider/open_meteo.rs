//! Keyless fallback: Open-Meteo geocoding followed by the Open-Meteo forecast API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{DashboardError, truncate_body},
    model::{GeoLocation, WeatherReport},
    weather_code,
};

use super::{ProviderId, WeatherProvider};

const GEOCODING_SERVICE: &str = "open-meteo geocoding";
const FORECAST_SERVICE: &str = "open-meteo forecast";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoding_url: &str, forecast_url: &str, http: Client) -> Self {
        Self {
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Resolve a city name to its highest-ranked match. Any non-success status or an
    /// empty result list is `NotFound`.
    pub async fn geocode(&self, city: &str) -> Result<GeoLocation, DashboardError> {
        let url = format!("{}/v1/search", self.geocoding_url);
        tracing::debug!(%url, city, "Geocoding city");

        let res = self
            .http
            .get(&url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::debug!(status = res.status().as_u16(), "Geocoding returned non-success status");
            return Err(DashboardError::NotFound(city.to_string()));
        }

        let body = res.text().await?;
        let parsed: GeocodeResponse = serde_json::from_str(&body).map_err(|source| {
            DashboardError::Decode {
                service: GEOCODING_SERVICE,
                source,
            }
        })?;

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::NotFound(city.to_string()))?;

        Ok(GeoLocation {
            name: first.name,
            country_code: first.country_code,
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }

    /// Current conditions at a resolved location, normalized through the weather code table.
    pub async fn forecast(&self, location: &GeoLocation) -> Result<WeatherReport, DashboardError> {
        let url = format!("{}/v1/forecast", self.forecast_url);
        tracing::debug!(
            %url,
            latitude = location.latitude,
            longitude = location.longitude,
            "Querying Open-Meteo forecast"
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(DashboardError::Upstream {
                service: FORECAST_SERVICE,
                status: Some(status.as_u16()),
                body: truncate_body(&body),
            });
        }

        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|source| {
            DashboardError::Decode {
                service: FORECAST_SERVICE,
                source,
            }
        })?;

        let current = parsed.current;
        let mapped = weather_code::normalize(current.weather_code);

        Ok(WeatherReport {
            city: location.display_name(),
            temperature: current.temperature_2m.round() as i64,
            condition: mapped.label.to_string(),
            description: mapped.label.to_string(),
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            icon: mapped.icon.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: ForecastCurrent,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    temperature_2m: f64,
    relative_humidity_2m: u8,
    wind_speed_10m: f64,
    weather_code: i32,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    async fn current(&self, city: &str) -> Result<WeatherReport, DashboardError> {
        let location = self.geocode(city).await?;
        self.forecast(&location).await
    }
}
