use crate::calendar;
use crate::models::{BidBoardEntry, SignalBundle};
use crate::signals::SignalEngine;
use anyhow::{Context, Result};
use axum::{Router, extract::State, response::Json, routing::get};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

// -----------------------------------------------
// API RESPONSE MODELS
// -----------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub processing_time_ms: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T, start_time: Instant) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
        }
    }

    fn failed(error: String, start_time: Instant) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            processing_time_ms: Some(start_time.elapsed().as_millis() as u64),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub exchange_time: String,
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    engine: SignalEngine,
    clock: Clock,
}

impl AppState {
    /// State reading the exchange wall clock
    pub fn new(engine: SignalEngine) -> Self {
        Self::with_clock(engine, Arc::new(calendar::exchange_now))
    }

    pub fn with_clock(engine: SignalEngine, clock: Clock) -> Self {
        Self { engine, clock }
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /api/signals - full signal bundle for the selected instrument
async fn get_signals(State(app_state): State<AppState>) -> Json<ApiResponse<SignalBundle>> {
    let start_time = Instant::now();
    let now = (app_state.clock)();

    match app_state.engine.bundle(now).await {
        Ok(bundle) => {
            info!(instrument = %bundle.instrument, "Served signal bundle");
            Json(ApiResponse::ok(bundle, start_time))
        }
        Err(e) => {
            warn!(error = %e, "Signal bundle unavailable");
            Json(ApiResponse::failed(e.to_string(), start_time))
        }
    }
}

/// GET /api/bid - BID signal for every board instrument
async fn get_bid_board(State(app_state): State<AppState>) -> Json<ApiResponse<Vec<BidBoardEntry>>> {
    let start_time = Instant::now();
    let now = (app_state.clock)();

    let board = app_state.engine.bid_board(now).await;
    Json(ApiResponse::ok(board, start_time))
}

/// GET /api/health
async fn get_health(State(app_state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let start_time = Instant::now();
    let now = (app_state.clock)();

    Json(ApiResponse::ok(
        HealthResponse {
            status: "ok",
            exchange_time: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
        },
        start_time,
    ))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/signals", get(get_signals))
        .route("/api/bid", get(get_bid_board))
        .route("/api/health", get(get_health))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn start_server(port: u16, app_state: AppState) -> Result<()> {
    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "Signal API server listening");
    println!("🚀 Index Signals API running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   GET  /api/signals");
    println!("   GET  /api/bid");
    println!("   GET  /api/health");
    println!();

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
