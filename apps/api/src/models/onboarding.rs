use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One onboarding session per user. `session_data` carries the free-form
/// answers collected during setup (budget, team size, timeline, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OnboardingSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub current_step: i32,
    pub session_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shared row shape for the per-source onboarding documents
/// (`website_analyses`, `research_preferences`, `api_key_integrations`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SourceDocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}
