use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CITY: &str = "London";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    /// Build a query from an optional raw parameter; missing or blank input means London.
    pub fn from_param(city: Option<&str>) -> Self {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY);

        Self {
            city: city.to_string(),
        }
    }
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self::from_param(None)
    }
}

/// A geocoded place, used only to drive the fallback forecast lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub name: String,
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// "Paris, FR" when a country code is known, otherwise just the name.
    pub fn display_name(&self) -> String {
        match self.country_code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => format!("{}, {}", self.name, code),
            None => self.name.clone(),
        }
    }
}

/// The one shape every weather provider is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temperature: i64,
    pub condition: String,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub usd: f64,
    pub eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConversion {
    pub inr: f64,
    pub usd: f64,
    pub eur: f64,
    pub rates: ExchangeRates,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub author: String,
}
