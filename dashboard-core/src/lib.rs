//! Core library for the dashboard proxies.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather fallback chain (OpenWeather, then Open-Meteo)
//! - Currency conversion and quote proxies
//! - Shared domain models and the error taxonomy
//!
//! It is used by `dashboard-cli`, which serves it over HTTP and from the terminal.

pub mod config;
pub mod currency;
pub mod error;
pub mod model;
pub mod provider;
pub mod quote;
pub mod resolver;
pub mod weather_code;

use std::sync::Arc;

pub use config::{Config, Endpoints, ProviderConfig};
pub use currency::CurrencyConverter;
pub use error::DashboardError;
pub use model::{CurrencyConversion, ErrorBody, GeoLocation, Quote, WeatherQuery, WeatherReport};
pub use provider::{ProviderId, WeatherProvider};
pub use quote::QuoteService;
pub use resolver::{ResolveError, WeatherResolver};

/// Every service the endpoints need, built once from configuration and shared read-only.
#[derive(Debug, Clone)]
pub struct Services {
    pub weather: WeatherResolver,
    pub currency: CurrencyConverter,
    pub quotes: QuoteService,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        let http = provider::http_client(config)?;

        let primary = provider::primary_from_config(config, http.clone());
        if !primary.has_api_key() {
            tracing::warn!(
                "{} is not set; weather requests will go straight to the fallback provider",
                config::OPENWEATHER_KEY_ENV
            );
        }
        let fallback = provider::fallback_from_config(config, http.clone());

        Ok(Self {
            weather: WeatherResolver::new(Arc::new(primary), Arc::new(fallback)),
            currency: CurrencyConverter::new(&config.endpoints.frankfurter, http.clone()),
            quotes: QuoteService::new(&config.endpoints.quotable, http),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, key: Option<&str>) -> Config {
        let base = server.uri();
        let mut cfg = Config {
            endpoints: Endpoints {
                openweather: base.clone(),
                geocoding: base.clone(),
                forecast: base.clone(),
                frankfurter: base.clone(),
                quotable: base,
            },
            ..Config::default()
        };
        if let Some(key) = key {
            cfg.upsert_provider_api_key(ProviderId::OpenWeather, key.to_string())
                .unwrap();
        }
        cfg
    }

    #[tokio::test]
    async fn nowhereistan_keeps_primary_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Nowhereistan"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Nowhereistan"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.4})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let services = Services::from_config(&config_for(&mock_server, Some("KEY"))).unwrap();
        let err = services
            .weather
            .resolve(&WeatherQuery::from_param(Some("Nowhereistan")))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), error::CITY_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn primary_name_is_returned_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "London",
                "main": { "temp": 7.49, "humidity": 70 },
                "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }],
                "wind": { "speed": 3.1 }
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let services = Services::from_config(&config_for(&mock_server, Some("KEY"))).unwrap();
        let report = services.weather.resolve(&WeatherQuery::default()).await.unwrap();

        assert_eq!(report.city, "London");
        assert_eq!(report.temperature, 7);
    }

    #[tokio::test]
    async fn unconfigured_primary_goes_straight_to_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"name": "Madrid", "latitude": 40.4, "longitude": -3.7, "country_code": "ES"}]
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "40.4"))
            .and(query_param("longitude", "-3.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": {
                    "temperature_2m": 24.6,
                    "relative_humidity_2m": 30,
                    "wind_speed_10m": 3.4,
                    "weather_code": 1
                }
            })))
            .mount(&mock_server)
            .await;

        let services = Services::from_config(&config_for(&mock_server, None)).unwrap();
        let report = services
            .weather
            .resolve(&WeatherQuery::from_param(Some("Madrid")))
            .await
            .unwrap();

        assert_eq!(report.city, "Madrid, ES");
        assert_eq!(report.temperature, 25);
        assert_eq!(report.condition, "Mainly clear");
        assert_eq!(report.icon, "02d");
    }
}
