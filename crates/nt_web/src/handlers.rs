use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use nt_core::{AnalysisReport, AnalysisRequest, HeadlineRecord, VerificationResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct HeadlinesResponse {
    pub headlines: Vec<HeadlineRecord>,
}

pub async fn scrape_verify(
    State(state): State<Arc<AppState>>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerificationResult>, ApiError> {
    let Json(request) = request?;
    info!(chars = request.content.len(), "verification requested");
    let result = state.verifier.verify(&request.content).await?;
    Ok(Json(result))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    request: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let Json(request) = request?;
    let analyzer = state.analyzer.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "analysis models are not loaded",
        )
    })?;
    Ok(Json(analyzer.analyze(&request)?))
}

pub async fn headlines(State(state): State<Arc<AppState>>) -> Json<HeadlinesResponse> {
    Json(HeadlinesResponse {
        headlines: state.headlines.headlines().await,
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let providers: Vec<String> = state.verifier.providers().map(|p| p.to_string()).collect();
    Json(json!({
        "status": "ok",
        "providers": providers,
        "analyzer_loaded": state.analyzer.is_some(),
    }))
}
