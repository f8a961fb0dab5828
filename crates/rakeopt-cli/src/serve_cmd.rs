use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use rakeopt_core::{ConfigSource, GeminiClient, OptimizationRequest, forecast, invoke_optimizer};

/// Message returned when the pipeline fails in an unexpected way (a panic).
/// Details stay in the server log.
pub const UNEXPECTED_FAILURE: &str = "Unexpected optimizer failure. Check server logs.";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub client: GeminiClient,
    /// Where the Gemini settings are read from on every call.
    pub env: Arc<dyn ConfigSource>,
}

impl AppState {
    pub fn new(client: GeminiClient, env: impl ConfigSource + 'static) -> Self {
        Self {
            client,
            env: Arc::new(env),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<f64>,
    pub note: &'static str,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/optimize", post(optimize))
        .route("/forecast", post(forecast_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("rakeopt serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("rakeopt serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// Every outcome is reported with 200; failures carry `{"error": ...}`.
async fn optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizationRequest>,
) -> Json<Value> {
    let span = info_span!("optimize", request_id = %Uuid::new_v4());

    async move {
        let summary = request.summary();
        info!(
            orders = summary.orders,
            stockyards = summary.stockyards,
            loading_points = summary.loading_points,
            rakes = summary.rakes,
            costs = summary.costs,
            ordered_tonnage = summary.ordered_tonnage,
            "/optimize called"
        );

        let outcome = AssertUnwindSafe(invoke_optimizer(
            &state.client,
            state.env.as_ref(),
            &request,
        ))
        .catch_unwind()
        .await;

        match outcome {
            Ok(Ok(result)) => Json(result.into_value()),
            Ok(Err(err)) => {
                error!(kind = err.kind(), "Gemini optimizer error: {err}");
                error_body(err.to_string())
            }
            Err(_) => {
                error!("unexpected optimizer failure");
                error_body(UNEXPECTED_FAILURE.to_string())
            }
        }
    }
    .instrument(span)
    .await
}

async fn forecast_handler(Json(req): Json<ForecastRequest>) -> Json<ForecastResponse> {
    Json(ForecastResponse {
        forecast: forecast::predict_mock(&req.data),
        note: forecast::NOTE,
    })
}

fn error_body(message: String) -> Json<Value> {
    Json(serde_json::json!({ "error": message }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
