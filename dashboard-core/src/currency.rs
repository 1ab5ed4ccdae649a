//! INR conversion against Frankfurter (ECB reference rates, keyless).

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{DashboardError, truncate_body},
    model::{CurrencyConversion, ExchangeRates},
};

const SERVICE: &str = "frankfurter";
pub const DEFAULT_AMOUNT: f64 = 100.0;
pub const INVALID_AMOUNT_MESSAGE: &str = "Invalid amount. Please provide a positive number.";

/// Parse the raw `amount` parameter. Missing means [`DEFAULT_AMOUNT`]; anything that is not a
/// finite positive number is a validation error.
pub fn parse_amount(raw: Option<&str>) -> Result<f64, DashboardError> {
    let amount = match raw.map(str::trim) {
        None | Some("") => DEFAULT_AMOUNT,
        Some(s) => s
            .parse::<f64>()
            .map_err(|_| DashboardError::Validation(INVALID_AMOUNT_MESSAGE.to_string()))?,
    };

    if !amount.is_finite() || amount <= 0.0 {
        return Err(DashboardError::Validation(INVALID_AMOUNT_MESSAGE.to_string()));
    }

    Ok(amount)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    date: NaiveDate,
    rates: FrankfurterRates,
}

#[derive(Debug, Deserialize)]
struct FrankfurterRates {
    #[serde(rename = "USD")]
    usd: f64,
    #[serde(rename = "EUR")]
    eur: f64,
}

#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    base_url: String,
    http: Client,
}

impl CurrencyConverter {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Latest INR → USD/EUR rates.
    pub async fn latest_rates(&self) -> Result<(ExchangeRates, NaiveDate), DashboardError> {
        let url = format!("{}/latest", self.base_url);
        tracing::debug!(%url, "Fetching exchange rates");

        let res = self
            .http
            .get(&url)
            .query(&[("from", "INR"), ("to", "USD,EUR")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Currency API error");
            return Err(DashboardError::Upstream {
                service: SERVICE,
                status: Some(status.as_u16()),
                body: truncate_body(&body),
            });
        }

        let parsed: FrankfurterResponse = serde_json::from_str(&body)
            .map_err(|source| DashboardError::Decode { service: SERVICE, source })?;

        Ok((
            ExchangeRates {
                usd: parsed.rates.usd,
                eur: parsed.rates.eur,
            },
            parsed.date,
        ))
    }

    /// Convert an already-validated INR amount.
    pub async fn convert(&self, amount: f64) -> Result<CurrencyConversion, DashboardError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DashboardError::Validation(INVALID_AMOUNT_MESSAGE.to_string()));
        }

        tracing::info!(amount, "Converting INR to USD and EUR");
        let (rates, date) = self.latest_rates().await?;

        Ok(CurrencyConversion {
            inr: amount,
            usd: round2(amount * rates.usd),
            eur: round2(amount * rates.eur),
            rates,
            date,
        })
    }
}
