//! Axum route handlers for the autofill API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::autofill::service::AutofillPayload;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/content-strategy/autofill
///
/// Runs the full autofill pipeline and returns the validated payload the
/// strategy-builder form pre-fills from.
pub async fn handle_get_autofill(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AutofillPayload>, AppError> {
    let payload = state.autofill.get_autofill(params.user_id).await?;
    Ok(Json(payload))
}
