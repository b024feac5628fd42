//! Axum route handlers for the Insights API.

use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::insights::{generate_strategy_insights, StrategyInsights};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/content-strategy/insights
///
/// Rebuilds the autofill payload for the user and asks the LLM for a
/// strategic read on it. The autofill pipeline's failure modes surface
/// unchanged; LLM failures map to `AppError::Llm`.
pub async fn handle_generate_insights(
    State(state): State<AppState>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<StrategyInsights>, AppError> {
    let payload = state.autofill.get_autofill(request.user_id).await?;
    let insights = generate_strategy_insights(&payload, &state.llm).await?;
    Ok(Json(insights))
}
