//! REST API Server for the FP&A copilot
//!
//! Exposes routing, question answering and direct metric calls over HTTP.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::agent::Copilot;
use crate::error::CopilotError;
use crate::models::SUPPORTED_INTENTS;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuestionRequest {
    pub question: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub copilot: Arc<Copilot>,
}

fn status_for(err: &CopilotError) -> StatusCode {
    match err {
        CopilotError::ToolNotFound(_) => StatusCode::NOT_FOUND,
        CopilotError::InvalidMonth(_) | CopilotError::InvalidParameter(_) => {
            StatusCode::BAD_REQUEST
        }
        CopilotError::EmptyDataset => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(err: CopilotError) -> (StatusCode, Json<ApiResponse>) {
    (status_for(&err), Json(ApiResponse::error(err.to_string())))
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "intents": SUPPORTED_INTENTS,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Routing Endpoint
/// =============================

async fn route_question(
    State(state): State<ApiState>,
    Json(req): Json<QuestionRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let intent = state.copilot.route(&req.question);
    (StatusCode::OK, Json(ApiResponse::success(intent)))
}

/// =============================
/// Question Endpoint
/// =============================

async fn ask(
    State(state): State<ApiState>,
    Json(req): Json<QuestionRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received question: {}", req.question);

    match state.copilot.ask(&req.question) {
        Ok(answer) => (StatusCode::OK, Json(ApiResponse::success(answer))),
        Err(e) => failure(e),
    }
}

/// =============================
/// Direct Metric Endpoint
/// =============================

async fn run_metric(
    State(state): State<ApiState>,
    Path(intent): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.copilot.run_metric(&intent, &params) {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success(result))),
        Err(e) => failure(e),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(copilot: Arc<Copilot>) -> Router {
    let state = ApiState { copilot };

    Router::new()
        .route("/health", get(health))
        .route("/api/route", post(route_question))
        .route("/api/ask", post(ask))
        .route("/api/metrics/:intent", post(run_metric))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    copilot: Arc<Copilot>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(copilot);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
