//! Transparency maps shown next to the autofill form: which source owns each
//! field, and which raw inputs fed the values the user is most likely to
//! question. Both are documentation tables for the UI — data-independent in
//! the first case, raw-key echoes in the second.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::autofill::transform::FieldSource;

/// Sentinel shown when a raw input that would explain a field was not
/// collected.
pub const NOT_AVAILABLE: &str = "Not available";

const WEBSITE_SOURCED_FIELDS: &[&str] = &[
    "business_objectives",
    "target_metrics",
    "performance_metrics",
    "competitive_position",
    "top_competitors",
    "competitor_content_strategies",
    "market_gaps",
    "quality_metrics",
    "editorial_guidelines",
    "brand_voice",
    "content_budget",
    "team_size",
    "implementation_timeline",
    "market_share",
];

const RESEARCH_SOURCED_FIELDS: &[&str] = &[
    "content_preferences",
    "consumption_patterns",
    "audience_pain_points",
    "buying_journey",
    "engagement_metrics",
    "industry_trends",
    "emerging_trends",
    "preferred_formats",
    "content_mix",
    "content_frequency",
    "seasonal_trends",
];

const API_SOURCED_FIELDS: &[&str] = &[
    "optimal_timing",
    "traffic_sources",
    "conversion_rates",
    "content_roi_targets",
    "ab_testing_capabilities",
];

/// Static field-name -> source-name lookup. Independent of the actual data;
/// reflects which source each field is *designed* to come from (session
/// fallbacks are not visible here).
pub fn build_data_sources_map() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (fields, source) in [
        (WEBSITE_SOURCED_FIELDS, FieldSource::WebsiteAnalysis),
        (RESEARCH_SOURCED_FIELDS, FieldSource::ResearchPreferences),
        (API_SOURCED_FIELDS, FieldSource::ApiKeysData),
    ] {
        for field in fields {
            map.insert(field.to_string(), source.as_str().to_string());
        }
    }
    map
}

/// For a fixed subset of fields, the raw inputs that would explain the
/// autofilled value. A source's fields are omitted entirely when that raw
/// document is empty; within a present source, missing raw keys show the
/// `NOT_AVAILABLE` sentinel.
pub fn build_input_data_points(
    website_raw: &Value,
    research_raw: &Value,
    api_raw: &Value,
) -> BTreeMap<String, BTreeMap<String, Value>> {
    let mut points = BTreeMap::new();

    if is_present(website_raw) {
        points.insert(
            "business_objectives".to_string(),
            echo(website_raw, &["meta_description", "about_page_content"]),
        );
        points.insert(
            "top_competitors".to_string(),
            echo(website_raw, &["competitor_domains", "serp_overlap"]),
        );
        points.insert(
            "editorial_guidelines".to_string(),
            echo(website_raw, &["writing_style", "sample_pages"]),
        );
        points.insert(
            "market_share".to_string(),
            echo(website_raw, &["industry", "estimated_market_share"]),
        );
    }

    if is_present(research_raw) {
        points.insert(
            "content_preferences".to_string(),
            echo(research_raw, &["preferred_content_types", "research_depth"]),
        );
        points.insert(
            "audience_pain_points".to_string(),
            echo(research_raw, &["survey_responses", "interview_notes"]),
        );
    }

    if is_present(api_raw) {
        points.insert(
            "traffic_sources".to_string(),
            echo(api_raw, &["analytics_provider", "monthly_sessions"]),
        );
        points.insert(
            "conversion_rates".to_string(),
            echo(api_raw, &["goal_completions", "ecommerce_tracking"]),
        );
    }

    points
}

fn is_present(raw: &Value) -> bool {
    raw.as_object().map(|m| !m.is_empty()).unwrap_or(false)
}

fn echo(raw: &Value, keys: &[&str]) -> BTreeMap<String, Value> {
    keys.iter()
        .map(|key| {
            let value = raw.get(*key).cloned().unwrap_or_else(|| json!(NOT_AVAILABLE));
            (key.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::validate::ALLOWED_SOURCES;

    #[test]
    fn test_every_mapped_source_is_a_wire_literal() {
        for source in build_data_sources_map().values() {
            assert!(
                ALLOWED_SOURCES.contains(&source.as_str()),
                "unexpected source {source}"
            );
        }
    }

    #[test]
    fn test_known_fields_map_to_expected_sources() {
        let map = build_data_sources_map();
        assert_eq!(map["business_objectives"], "website_analysis");
        assert_eq!(map["content_preferences"], "research_preferences");
        assert_eq!(map["traffic_sources"], "api_keys_data");
    }

    #[test]
    fn test_no_field_is_claimed_by_two_sources() {
        let total =
            WEBSITE_SOURCED_FIELDS.len() + RESEARCH_SOURCED_FIELDS.len() + API_SOURCED_FIELDS.len();
        assert_eq!(build_data_sources_map().len(), total);
    }

    #[test]
    fn test_input_points_only_cover_present_sources() {
        let website = json!({"meta_description": "We grow SaaS brands"});
        let points = build_input_data_points(&website, &json!({}), &Value::Null);

        assert!(points.contains_key("business_objectives"));
        assert!(!points.contains_key("content_preferences"));
        assert!(!points.contains_key("traffic_sources"));
    }

    #[test]
    fn test_input_points_use_sentinel_for_missing_raw_keys() {
        let website = json!({"meta_description": "We grow SaaS brands"});
        let points = build_input_data_points(&website, &Value::Null, &Value::Null);

        let objectives = &points["business_objectives"];
        assert_eq!(objectives["meta_description"], json!("We grow SaaS brands"));
        assert_eq!(objectives["about_page_content"], json!(NOT_AVAILABLE));
    }

    #[test]
    fn test_all_sources_empty_yields_empty_map() {
        let points = build_input_data_points(&Value::Null, &Value::Null, &Value::Null);
        assert!(points.is_empty());
    }
}
