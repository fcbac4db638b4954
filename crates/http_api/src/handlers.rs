use axum::{
    extract::{Json, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    errors::HttpError,
    requests::{AgentDataSetRequest, AgentRequest},
    state::HttpState,
};

/// Runs blocking database work off the async runtime.
async fn blocking<T, F>(work: F) -> Result<T, HttpError>
where
    F: FnOnce() -> ledger_app::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn avg_action_cost(
    State(state): State<HttpState>,
    Json(req): Json<AgentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let estimator = state.app_state.services.estimator.clone();
    let estimate = blocking(move || estimator.estimate(&req.agent_id)).await?;
    Ok(Json(estimate))
}

pub async fn agent_config(
    State(state): State<HttpState>,
    Json(req): Json<AgentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let agents = state.app_state.services.agents.clone();
    let agent = blocking(move || agents.config(&req.agent_id)).await?;
    Ok(Json(agent))
}

pub async fn agent_data(
    State(state): State<HttpState>,
    Json(req): Json<AgentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let agents = state.app_state.services.agents.clone();
    let data = blocking(move || agents.data(&req.agent_id)).await?;
    Ok(Json(data))
}

pub async fn agent_data_set(
    State(state): State<HttpState>,
    Json(req): Json<AgentDataSetRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let agents = state.app_state.services.agents.clone();
    blocking(move || agents.set_data(&req.agent_id, &req.fields)).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn agent_quota(
    State(state): State<HttpState>,
    Json(req): Json<AgentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let agents = state.app_state.services.agents.clone();
    let quota = blocking(move || agents.quota(&req.agent_id)).await?;
    Ok(Json(quota))
}

pub async fn not_found(uri: Uri) -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        format!("no route for {}", uri.path()),
        Some("not_found".to_string()),
    )
}
