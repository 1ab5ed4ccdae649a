//! Error taxonomy shared by every proxy.

use thiserror::Error;

/// Message returned when the weather chain is exhausted. Only the resolver uses it.
pub const CITY_NOT_FOUND_MESSAGE: &str = "Could not fetch weather data. Please check the city name.";

/// Message returned when the primary weather credential is missing.
pub const MISSING_KEY_MESSAGE: &str = "Weather API key not configured";

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Deployment secret missing or blank.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller supplied an unusable parameter.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A third party answered with a non-success status, or could not be reached.
    #[error("Upstream {service} failed (status {status:?}): {body}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        body: String,
    },

    /// Geocoding produced no result.
    #[error("Location not found: {0}")]
    NotFound(String),

    /// A success response whose body did not have the expected shape.
    #[error("Failed to decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// No response at all. The request URL is stripped so query-string credentials never
    /// end up in messages or logs.
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl DashboardError {
    /// HTTP status the error surfaces with at the endpoint boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) => 500,
            Self::Validation(_) => 400,
            Self::Upstream { status, .. } => status.unwrap_or(500),
            Self::NotFound(_) => 404,
            Self::Decode { .. } | Self::Transport(_) => 500,
        }
    }

    /// Message safe to hand to callers. Upstream bodies and transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(_) => MISSING_KEY_MESSAGE.to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::Upstream { service, .. } => format!("The {service} service is unavailable"),
            Self::NotFound(query) => format!("No match found for '{query}'"),
            Self::Decode { .. } | Self::Transport(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// Whether the weather orchestrator may move on to the next provider.
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Upstream { .. } | Self::Transport(_)
        )
    }
}

/// Keep upstream bodies short in logs and error values.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
