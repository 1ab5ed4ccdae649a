use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{DashboardError, truncate_body},
    model::WeatherReport,
};

use super::{ProviderId, WeatherProvider};

const SERVICE: &str = "openweather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, base_url: &str, http: Client) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_current(&self, api_key: &str, city: &str) -> Result<WeatherReport, DashboardError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(%url, city, "Querying OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %truncate_body(&body), "OpenWeather request failed");
            return Err(DashboardError::Upstream {
                service: SERVICE,
                status: Some(status.as_u16()),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|source| DashboardError::Decode { service: SERVICE, source })?;

        Ok(parsed.into_report())
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_report(self) -> WeatherReport {
        let (condition, description, icon) = match self.weather.into_iter().next() {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), "Unknown".to_string(), "04d".to_string()),
        };

        WeatherReport {
            city: self.name,
            temperature: self.main.temp.round() as i64,
            condition,
            description,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            icon,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn current(&self, city: &str) -> Result<WeatherReport, DashboardError> {
        // Checked before any network traffic.
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(DashboardError::Configuration(format!(
                "{} is not set or empty",
                crate::config::OPENWEATHER_KEY_ENV
            )));
        };

        self.fetch_current(api_key, city).await
    }
}
