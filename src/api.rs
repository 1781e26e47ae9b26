use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::errors::{DataError, ReconstructError};
use crate::ingest::ingest;
use crate::models::{Dashboard, ItemStats, RawSnapshot};
use crate::reconstruct::TimelineReconstructor;
use crate::window::WindowPreset;

/// Read-only HTTP API over the tracker data file.
/// The file is re-read on every request; nothing is cached.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub default_window: f64,
}

/// Window selection shared by the dashboard endpoints.
/// An explicit `window` in seconds wins over a `range` preset.
#[derive(Debug, Deserialize, Default)]
pub struct WindowQuery {
    #[serde(default)]
    pub window: Option<f64>,
    #[serde(default)]
    pub range: Option<WindowPreset>,
}

impl WindowQuery {
    fn seconds(&self, default: f64) -> f64 {
        self.window
            .or_else(|| self.range.map(|preset| preset.seconds()))
            .unwrap_or(default)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/items/:name", get(get_item))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn root() -> &'static str {
    "Swarm Dashboard API v0.1.0"
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Every chart series for the requested window
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Dashboard>, StatusCode> {
    let dashboard = build_dashboard(&state, &query).await?;
    info!(
        window = dashboard.window.seconds,
        items = dashboard.items.len(),
        rejected_items = dashboard.rejected.iter().filter(|e| e.rejects_item()).count(),
        rejected_peers = dashboard.rejected.iter().filter(|e| !e.rejects_item()).count(),
        "dashboard served"
    );
    Ok(Json(dashboard))
}

/// One item's series for the requested window
async fn get_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ItemStats>, StatusCode> {
    let dashboard = build_dashboard(&state, &query).await?;
    dashboard
        .items
        .into_iter()
        .find(|item| item.name == name)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn build_dashboard(state: &AppState, query: &WindowQuery) -> Result<Dashboard, StatusCode> {
    let raw = match load_snapshot(&state.data_path).await {
        Ok(raw) => raw,
        Err(e) => {
            error!(path = %state.data_path.display(), "{}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let ingested = ingest(raw);
    let reconstructor = TimelineReconstructor::new(query.seconds(state.default_window));
    let mut dashboard = reconstructor
        .reconstruct(&ingested.snapshot)
        .map_err(|e| match e {
            ReconstructError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
        })?;
    dashboard.rejected = ingested.rejected;
    Ok(dashboard)
}

/// Reads the tracker data file. An empty file is an empty snapshot; the
/// tracker creates it empty before its first write.
pub async fn load_snapshot(path: &std::path::Path) -> Result<RawSnapshot, DataError> {
    let contents = tokio::fs::read_to_string(path).await?;
    if contents.trim().is_empty() {
        return Ok(RawSnapshot::default());
    }
    Ok(serde_json::from_str(&contents)?)
}
