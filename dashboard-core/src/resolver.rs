//! Weather resolution: primary provider first, one fallback hop, one canonical answer.

use std::sync::Arc;

use crate::{
    error::{CITY_NOT_FOUND_MESSAGE, DashboardError, MISSING_KEY_MESSAGE},
    model::{WeatherQuery, WeatherReport},
    provider::WeatherProvider,
};

/// Terminal outcome of a failed resolution, already classified for the HTTP boundary.
#[derive(Debug)]
pub struct ResolveError {
    status: u16,
    message: String,
    cause: DashboardError,
}

impl ResolveError {
    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error that decided the outcome; for exhausted chains this is the primary's.
    pub fn cause(&self) -> &DashboardError {
        &self.cause
    }

    fn terminal(cause: DashboardError) -> Self {
        let message = match &cause {
            DashboardError::Configuration(_) => MISSING_KEY_MESSAGE,
            _ => CITY_NOT_FOUND_MESSAGE,
        };

        Self {
            status: cause.status_code(),
            message: message.to_string(),
            cause,
        }
    }

    fn unexpected(cause: DashboardError) -> Self {
        Self {
            status: 500,
            message: "An unexpected error occurred while fetching weather data".to_string(),
            cause,
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.cause)
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Sequences the primary and fallback providers. Holds no per-request state, so one
/// instance is shared across all handlers.
#[derive(Debug, Clone)]
pub struct WeatherResolver {
    primary: Arc<dyn WeatherProvider>,
    fallback: Arc<dyn WeatherProvider>,
}

impl WeatherResolver {
    pub fn new(primary: Arc<dyn WeatherProvider>, fallback: Arc<dyn WeatherProvider>) -> Self {
        Self { primary, fallback }
    }

    pub async fn resolve(&self, query: &WeatherQuery) -> Result<WeatherReport, ResolveError> {
        let city = query.city.as_str();
        tracing::info!(city, "Resolving weather");

        let primary_err = match self.primary.current(city).await {
            Ok(report) => {
                tracing::info!(city, provider = %self.primary.id(), "Weather resolved");
                return Ok(report);
            }
            Err(err) if err.allows_fallback() => err,
            Err(err) => {
                tracing::error!(city, error = %err, "Primary weather provider returned an unusable response");
                return Err(ResolveError::unexpected(err));
            }
        };

        match &primary_err {
            DashboardError::Configuration(reason) => {
                tracing::warn!(city, %reason, "Primary weather provider is not configured, trying fallback");
            }
            other => {
                tracing::warn!(city, error = %other, "Primary weather provider failed, trying fallback");
            }
        }

        match self.fallback.current(city).await {
            Ok(report) => {
                tracing::info!(city, provider = %self.fallback.id(), "Weather resolved via fallback");
                Ok(report)
            }
            Err(fallback_err) => {
                tracing::error!(
                    city,
                    primary = %primary_err,
                    fallback = %fallback_err,
                    "Weather fallback chain exhausted"
                );
                Err(ResolveError::terminal(primary_err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Scripted {
        id: ProviderId,
        outcome: fn() -> Result<WeatherReport, DashboardError>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(id: ProviderId, outcome: fn() -> Result<WeatherReport, DashboardError>) -> Arc<Self> {
            Arc::new(Self {
                id,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for Scripted {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn current(&self, _city: &str) -> Result<WeatherReport, DashboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            temperature: 10,
            condition: "Clear".into(),
            description: "clear sky".into(),
            humidity: 40,
            wind_speed: 2.0,
            icon: "01d".into(),
        }
    }

    fn upstream_404() -> Result<WeatherReport, DashboardError> {
        Err(DashboardError::Upstream {
            service: "openweather",
            status: Some(404),
            body: "city not found".into(),
        })
    }

    fn not_found() -> Result<WeatherReport, DashboardError> {
        Err(DashboardError::NotFound("Nowhereistan".into()))
    }

    fn query(city: &str) -> WeatherQuery {
        WeatherQuery::from_param(Some(city))
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = Scripted::new(ProviderId::OpenWeather, || Ok(report("London")));
        let fallback = Scripted::new(ProviderId::OpenMeteo, || Ok(report("London, GB")));
        let resolver = WeatherResolver::new(primary.clone(), fallback.clone());

        let out = resolver.resolve(&query("London")).await.unwrap();
        assert_eq!(out.city, "London");
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_uses_fallback() {
        let primary = Scripted::new(ProviderId::OpenWeather, upstream_404);
        let fallback = Scripted::new(ProviderId::OpenMeteo, || Ok(report("Paris, FR")));
        let resolver = WeatherResolver::new(primary.clone(), fallback.clone());

        let out = resolver.resolve(&query("Paris")).await.unwrap();
        assert_eq!(out.city, "Paris, FR");
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn exhausted_chain_keeps_primary_status() {
        let primary = Scripted::new(ProviderId::OpenWeather, upstream_404);
        let fallback = Scripted::new(ProviderId::OpenMeteo, not_found);
        let resolver = WeatherResolver::new(primary, fallback);

        let err = resolver.resolve(&query("Nowhereistan")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), CITY_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn missing_key_still_tries_fallback() {
        let primary = Scripted::new(ProviderId::OpenWeather, || {
            Err(DashboardError::Configuration("no key".into()))
        });
        let fallback = Scripted::new(ProviderId::OpenMeteo, || Ok(report("Berlin, DE")));
        let resolver = WeatherResolver::new(primary, fallback.clone());

        let out = resolver.resolve(&query("Berlin")).await.unwrap();
        assert_eq!(out.city, "Berlin, DE");
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn missing_key_and_failed_fallback_reports_configuration() {
        let primary = Scripted::new(ProviderId::OpenWeather, || {
            Err(DashboardError::Configuration("no key".into()))
        });
        let fallback = Scripted::new(ProviderId::OpenMeteo, not_found);
        let resolver = WeatherResolver::new(primary, fallback);

        let err = resolver.resolve(&query("Nowhereistan")).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), MISSING_KEY_MESSAGE);
        assert!(matches!(err.cause(), DashboardError::Configuration(_)));
    }

    #[tokio::test]
    async fn undecodable_primary_body_is_terminal() {
        let primary = Scripted::new(ProviderId::OpenWeather, || {
            let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
            Err(DashboardError::Decode {
                service: "openweather",
                source,
            })
        });
        let fallback = Scripted::new(ProviderId::OpenMeteo, || Ok(report("London, GB")));
        let resolver = WeatherResolver::new(primary, fallback.clone());

        let err = resolver.resolve(&query("London")).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.message().contains("unexpected"));
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn every_request_starts_from_primary() {
        let primary = Scripted::new(ProviderId::OpenWeather, upstream_404);
        let fallback = Scripted::new(ProviderId::OpenMeteo, || Ok(report("Rome, IT")));
        let resolver = WeatherResolver::new(primary.clone(), fallback);

        let first = resolver.resolve(&query("Rome")).await.unwrap();
        let second = resolver.resolve(&query("Rome")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(primary.calls(), 2);
    }

    #[tokio::test]
    async fn statusless_primary_failure_tries_fallback_then_ends_as_500() {
        let primary = Scripted::new(ProviderId::OpenWeather, || {
            Err(DashboardError::Upstream {
                service: "openweather",
                status: None,
                body: String::new(),
            })
        });
        let fallback = Scripted::new(ProviderId::OpenMeteo, not_found);
        let resolver = WeatherResolver::new(primary, fallback.clone());

        let err = resolver.resolve(&query("Oslo")).await.unwrap_err();
        assert_eq!(fallback.calls(), 1);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), CITY_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_primary_tries_fallback_then_ends_as_500() {
        use crate::provider::openweather::OpenWeatherProvider;

        let primary = Arc::new(OpenWeatherProvider::new(
            Some("KEY".into()),
            "http://127.0.0.1:9",
            reqwest::Client::new(),
        ));
        let fallback = Scripted::new(ProviderId::OpenMeteo, not_found);
        let resolver = WeatherResolver::new(primary, fallback.clone());

        let err = resolver.resolve(&query("Oslo")).await.unwrap_err();
        assert_eq!(fallback.calls(), 1);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), CITY_NOT_FOUND_MESSAGE);
        assert!(matches!(err.cause(), DashboardError::Transport(_)));
    }
}
