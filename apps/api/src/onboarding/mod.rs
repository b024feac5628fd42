//! Integrated onboarding data — the single upstream input of the autofill
//! pipeline. Everything downstream is derived from one
//! `process_onboarding_data` call per request.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::onboarding::{OnboardingSessionRow, SourceDocumentRow};

/// Raw bag of the four onboarding sub-documents. Each is a loosely-structured
/// JSON document owned by the upstream integration; missing sources are `null`.
/// Fetched fresh per request, never persisted by this subsystem.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegratedOnboardingData {
    pub website_analysis: Value,
    pub research_preferences: Value,
    pub api_keys_data: Value,
    pub onboarding_session: Value,
}

/// The consumed integration interface. Behind a trait so the autofill facade
/// can be exercised against an in-memory source in tests.
///
/// Carried in `AutofillService` as `Arc<dyn OnboardingDataSource>`.
#[async_trait]
pub trait OnboardingDataSource: Send + Sync {
    /// Returns `Ok(None)` when the user has no onboarding session at all —
    /// the one condition the pipeline treats as a hard failure downstream.
    /// Sparse-but-present data comes back as `Some` with `null` sub-documents.
    async fn process_onboarding_data(
        &self,
        user_id: Uuid,
    ) -> Result<Option<IntegratedOnboardingData>>;
}

/// Postgres-backed onboarding source. Read-only: no transactions, no writes.
pub struct SqlOnboardingStore {
    pool: PgPool,
}

impl SqlOnboardingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnboardingDataSource for SqlOnboardingStore {
    async fn process_onboarding_data(
        &self,
        user_id: Uuid,
    ) -> Result<Option<IntegratedOnboardingData>> {
        let session: Option<OnboardingSessionRow> = sqlx::query_as(
            "SELECT * FROM onboarding_sessions WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(session) = session else {
            debug!("No onboarding session found for user {user_id}");
            return Ok(None);
        };

        let website: Option<SourceDocumentRow> = sqlx::query_as(
            "SELECT * FROM website_analyses WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let research: Option<SourceDocumentRow> = sqlx::query_as(
            "SELECT * FROM research_preferences WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let api_keys: Option<SourceDocumentRow> = sqlx::query_as(
            "SELECT * FROM api_key_integrations WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(IntegratedOnboardingData {
            website_analysis: website.map(|r| r.data).unwrap_or(Value::Null),
            research_preferences: research.map(|r| r.data).unwrap_or(Value::Null),
            api_keys_data: api_keys.map(|r| r.data).unwrap_or(Value::Null),
            onboarding_session: session_document(&session),
        }))
    }
}

/// Flattens a session row into the session document the pipeline consumes:
/// the free-form `session_data` answers plus the row's own timestamp, which
/// the freshness calculator reads.
fn session_document(session: &OnboardingSessionRow) -> Value {
    let mut doc = session
        .session_data
        .as_object()
        .cloned()
        .unwrap_or_default();
    doc.insert(
        "updated_at".to_string(),
        Value::String(session.updated_at.to_rfc3339()),
    );
    Value::Object(doc)
}
