//! The autofill facade: one fixed, synchronous pipeline per request.
//! fetch -> normalize -> score -> transform -> transparency -> validate.
//! No caching, no retries, no concurrency; all state is request-scoped.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::autofill::metrics::{
    calculate_confidence_levels, calculate_data_freshness, calculate_quality_scores, DataFreshness,
};
use crate::autofill::normalize::{
    normalize_api_keys_data, normalize_research_preferences, normalize_website_analysis,
};
use crate::autofill::transform::{transform_to_fields, FieldEntry, TransformDefaults};
use crate::autofill::transparency::{build_data_sources_map, build_input_data_points};
use crate::autofill::validate::validate_payload;
use crate::errors::AppError;
use crate::onboarding::OnboardingDataSource;

/// The full autofill response handed to the strategy-builder form.
/// Constructed once per request; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AutofillPayload {
    pub fields: BTreeMap<String, FieldEntry>,
    pub sources: BTreeMap<String, String>,
    pub quality_scores: BTreeMap<String, f64>,
    pub confidence_levels: BTreeMap<String, f64>,
    pub data_freshness: DataFreshness,
    pub input_data_points: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Facade over the pipeline. Stateless beyond the injected onboarding source
/// and the preset value tables.
#[derive(Clone)]
pub struct AutofillService {
    source: Arc<dyn OnboardingDataSource>,
    defaults: TransformDefaults,
}

impl AutofillService {
    pub fn new(source: Arc<dyn OnboardingDataSource>) -> Self {
        Self {
            source,
            defaults: TransformDefaults::default(),
        }
    }

    /// Builds the validated autofill payload for a user.
    ///
    /// Fails fast when the integration reports no onboarding data at all;
    /// data that is present but sparse degrades gracefully through the
    /// pipeline instead.
    pub async fn get_autofill(&self, user_id: Uuid) -> Result<AutofillPayload, AppError> {
        let data = self
            .source
            .process_onboarding_data(user_id)
            .await
            .map_err(AppError::Internal)?
            .ok_or(AppError::NoOnboardingData(user_id))?;

        let website = normalize_website_analysis(&data.website_analysis);
        let research = normalize_research_preferences(&data.research_preferences);
        let api_keys = normalize_api_keys_data(&data.api_keys_data);

        // Scores read the raw documents, not the normalized maps — a source
        // that arrived empty must score as empty.
        let quality_scores = calculate_quality_scores(&data);
        let confidence_levels = calculate_confidence_levels(&data);
        let data_freshness = calculate_data_freshness(&data.onboarding_session, Utc::now());

        let fields = transform_to_fields(
            &website,
            &research,
            &api_keys,
            &data.onboarding_session,
            &self.defaults,
        );
        let sources = build_data_sources_map();
        let input_data_points = build_input_data_points(
            &data.website_analysis,
            &data.research_preferences,
            &data.api_keys_data,
        );

        let payload = AutofillPayload {
            fields,
            sources,
            quality_scores,
            confidence_levels,
            data_freshness,
            input_data_points,
        };

        let as_json = serde_json::to_value(&payload)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("payload serialization failed: {e}")))?;
        validate_payload(&as_json).map_err(|e| AppError::SchemaViolation(e.to_string()))?;

        debug!(
            "Autofill payload built for user {user_id}: {} fields, freshness {}",
            payload.fields.len(),
            payload.data_freshness.status_label()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::transform::FieldSource;
    use crate::onboarding::IntegratedOnboardingData;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;

    struct FakeSource(Option<IntegratedOnboardingData>);

    #[async_trait]
    impl OnboardingDataSource for FakeSource {
        async fn process_onboarding_data(
            &self,
            _user_id: Uuid,
        ) -> Result<Option<IntegratedOnboardingData>> {
            Ok(self.0.clone())
        }
    }

    fn service_with(data: Option<IntegratedOnboardingData>) -> AutofillService {
        AutofillService::new(Arc::new(FakeSource(data)))
    }

    #[tokio::test]
    async fn test_no_data_at_all_is_a_hard_failure() {
        let service = service_with(None);
        let err = service.get_autofill(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NoOnboardingData(_)));
    }

    #[tokio::test]
    async fn test_sparse_data_degrades_instead_of_failing() {
        let service = service_with(Some(IntegratedOnboardingData::default()));
        let payload = service.get_autofill(Uuid::new_v4()).await.unwrap();

        // Only the presets survive all-empty sources.
        assert!(payload.fields.contains_key("content_mix"));
        assert!(!payload.fields.contains_key("business_objectives"));
        assert_eq!(payload.quality_scores["website_analysis"], 0.0);
        assert!(payload.confidence_levels.is_empty());
        assert_eq!(payload.data_freshness, DataFreshness::Unknown);
        assert!(payload.input_data_points.is_empty());
    }

    #[tokio::test]
    async fn test_populated_sources_flow_end_to_end() {
        let now = Utc::now();
        let data = IntegratedOnboardingData {
            website_analysis: json!({
                "website_url": "https://acme.io",
                "content_goals": ["grow traffic"],
                "competitors": ["rival.io"],
                "confidence_level": 0.9
            }),
            research_preferences: json!({
                "pain_points": ["slow onboarding"]
            }),
            api_keys_data: Value::Null,
            onboarding_session: json!({
                "budget": 5000,
                "updated_at": now.to_rfc3339()
            }),
        };
        let service = service_with(Some(data));
        let payload = service.get_autofill(Uuid::new_v4()).await.unwrap();

        let objectives = &payload.fields["business_objectives"];
        assert_eq!(objectives.value, json!(["grow traffic"]));
        assert_eq!(objectives.source, FieldSource::WebsiteAnalysis);
        assert_eq!(objectives.confidence, 0.9);

        let budget = &payload.fields["content_budget"];
        assert_eq!(budget.value, json!(5000));
        assert_eq!(budget.source, FieldSource::OnboardingSession);
        assert_eq!(budget.confidence, 0.7);

        assert_eq!(payload.fields["audience_pain_points"].value, json!(["slow onboarding"]));
        assert_eq!(payload.data_freshness.status_label(), "fresh");
        assert_eq!(payload.sources["business_objectives"], "website_analysis");
        assert!(payload.input_data_points.contains_key("business_objectives"));
        // api_keys document was null: no confidence entry, no input points.
        assert!(!payload.confidence_levels.contains_key("api_keys_data"));
        assert!(!payload.input_data_points.contains_key("traffic_sources"));
    }

    #[tokio::test]
    async fn test_payload_serializes_with_all_required_keys() {
        let service = service_with(Some(IntegratedOnboardingData::default()));
        let payload = service.get_autofill(Uuid::new_v4()).await.unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        for key in crate::autofill::validate::REQUIRED_KEYS {
            assert!(value.get(*key).is_some(), "missing {key}");
            assert!(value[*key].is_object(), "{key} not an object");
        }
    }
}
