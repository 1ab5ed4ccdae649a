//! HTTP surface: `/weather`, `/currency` and `/quote`, each also reachable under
//! `/functions/v1/` so existing frontends keep their URLs.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderName, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use dashboard_core::{
    Config, CurrencyConversion, DashboardError, ErrorBody, Quote, Services, WeatherQuery,
    WeatherReport, currency,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Debug, Clone)]
pub struct AppState {
    services: Arc<Services>,
}

/// `{ "error": ... }` with a status. Internal details never reach the body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

/// Raw query pairs. Deserializing into pairs never rejects, so repeated keys cannot
/// produce a non-JSON 400.
type QueryPairs = Query<Vec<(String, String)>>;

/// First value for `name`; later repeats are ignored.
fn first_param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

pub fn router(services: Services) -> Router {
    let state = AppState {
        services: Arc::new(services),
    };

    Router::new()
        .merge(endpoints())
        .nest("/functions/v1", endpoints())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/weather", get(weather).options(preflight))
        .route("/currency", get(convert).options(preflight))
        .route("/quote", get(quote).options(preflight))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// OPTIONS without CORS request headers; real preflights are answered by the CORS layer.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn weather(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<WeatherReport>, ApiError> {
    let query = WeatherQuery::from_param(first_param(&pairs, "city"));

    state
        .services
        .weather
        .resolve(&query)
        .await
        .map(Json)
        .map_err(|err| ApiError::new(err.status_code(), err.message()))
}

async fn convert(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> Result<Json<CurrencyConversion>, ApiError> {
    let amount = currency::parse_amount(first_param(&pairs, "amount"))
        .map_err(|err| ApiError::new(err.status_code(), err.user_message()))?;

    state
        .services
        .currency
        .convert(amount)
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!(error = %err, "Currency conversion failed");
            match err {
                DashboardError::Validation(msg) => ApiError::new(400, msg),
                DashboardError::Upstream { .. } => ApiError::new(500, "Could not fetch exchange rates"),
                _ => ApiError::new(500, "An unexpected error occurred during conversion"),
            }
        })
}

async fn quote(State(state): State<AppState>) -> Json<Quote> {
    Json(state.services.quotes.random().await)
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let services = Services::from_config(&config).context("Failed to initialise HTTP client")?;

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!(addr = %listener.local_addr()?, "Dashboard listening");

    axum::serve(listener, router(services))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
