use crate::{
    Config, WeatherReport,
    error::DashboardError,
    provider::{open_meteo::OpenMeteoProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug};

pub mod open_meteo;
pub mod openweather;

const USER_AGENT: &str = concat!("dashboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::OpenMeteo => "open-meteo",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::OpenMeteo]
    }

    /// Open-Meteo is keyless; only the primary needs a credential.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "open-meteo" | "openmeteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, open-meteo."
            )),
        }
    }
}

/// A source of current conditions for a free-text city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn current(&self, city: &str) -> Result<WeatherReport, DashboardError>;
}

/// Shared outbound client. `reqwest::Client` pools connections and is cheap to clone.
pub fn http_client(config: &Config) -> Result<Client, DashboardError> {
    Ok(Client::builder()
        .timeout(config.request_timeout())
        .user_agent(USER_AGENT)
        .build()?)
}

/// Construct the primary provider. A missing key is not an error here: the provider
/// reports it per request so the fallback chain can still answer.
pub fn primary_from_config(config: &Config, http: Client) -> OpenWeatherProvider {
    let api_key = config
        .provider_api_key(ProviderId::OpenWeather)
        .map(str::to_owned);
    OpenWeatherProvider::new(api_key, &config.endpoints.openweather, http)
}

pub fn fallback_from_config(config: &Config, http: Client) -> OpenMeteoProvider {
    OpenMeteoProvider::new(
        &config.endpoints.geocoding,
        &config.endpoints.forecast,
        http,
    )
}
