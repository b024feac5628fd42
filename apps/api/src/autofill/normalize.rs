//! Source normalizers: one per onboarding document. Each maps a raw,
//! loosely-structured document into a canonical map whose key set is fixed —
//! every contract key is always present, defaulting to `{}`, `[]`, `""` or a
//! numeric default, never absent. A falsy/empty raw document normalizes to an
//! empty map. No failure path: these are pure, total functions.

use serde_json::{json, Map, Value};

use crate::autofill::transform::FieldSource;

/// Canonical shape of a website analysis document.
///
/// Raw key paths are probed in order; hardcoded literals stand in for
/// anything the crawler did not produce.
pub fn normalize_website_analysis(raw: &Value) -> Map<String, Value> {
    if non_empty_object(raw).is_none() {
        return Map::new();
    }

    let mut out = Map::new();
    out.insert(
        "website_url".into(),
        pick(raw, &[&["website_url"], &["url"]]).unwrap_or_else(|| json!("")),
    );
    out.insert(
        "industry".into(),
        pick(raw, &[&["industry"], &["domain_info", "industry"]]).unwrap_or_else(|| json!("")),
    );
    out.insert(
        "business_type".into(),
        pick(raw, &[&["business_type"]]).unwrap_or_else(|| json!("")),
    );
    out.insert(
        "content_goals".into(),
        pick(raw, &[&["content_goals"], &["goals"]]).unwrap_or_else(|| json!([])),
    );
    out.insert(
        "target_audience".into(),
        pick(raw, &[&["target_audience"]]).unwrap_or_else(|| json!({})),
    );
    out.insert(
        "performance_metrics".into(),
        pick(raw, &[&["performance_metrics"], &["analytics"]]).unwrap_or_else(|| json!({})),
    );
    out.insert(
        "competitors".into(),
        pick(
            raw,
            &[&["competitors"], &["competitor_analysis", "competitors"]],
        )
        .unwrap_or_else(|| json!([])),
    );
    out.insert(
        "competitive_position".into(),
        pick(
            raw,
            &[
                &["competitive_position"],
                &["competitor_analysis", "position"],
            ],
        )
        .unwrap_or_else(|| json!("")),
    );
    out.insert(
        "content_gaps".into(),
        pick(
            raw,
            &[&["content_gaps"], &["competitor_analysis", "content_gaps"]],
        )
        .unwrap_or_else(|| json!([])),
    );
    out.insert(
        "style_guidelines".into(),
        pick(raw, &[&["style_guidelines"], &["writing_style"]]).unwrap_or_else(|| json!({})),
    );
    // Business figures the crawler occasionally estimates; the transformer
    // falls back to onboarding-session answers when these stay empty.
    out.insert(
        "content_budget".into(),
        pick(raw, &[&["content_budget"], &["business_info", "content_budget"]])
            .unwrap_or_else(|| json!("")),
    );
    out.insert(
        "team_size".into(),
        pick(raw, &[&["team_size"], &["business_info", "team_size"]])
            .unwrap_or_else(|| json!("")),
    );
    out.insert(
        "implementation_timeline".into(),
        pick(
            raw,
            &[
                &["implementation_timeline"],
                &["business_info", "timeline"],
            ],
        )
        .unwrap_or_else(|| json!("")),
    );
    out.insert(
        "market_share".into(),
        pick(raw, &[&["market_share"], &["business_info", "market_share"]])
            .unwrap_or_else(|| json!("")),
    );
    out.insert(
        "confidence_level".into(),
        confidence_or_default(raw, FieldSource::WebsiteAnalysis),
    );
    out.insert(
        "last_analyzed".into(),
        pick(raw, &[&["last_analyzed"], &["analyzed_at"]]).unwrap_or_else(|| json!("")),
    );
    out
}

/// Canonical shape of a research preferences document.
pub fn normalize_research_preferences(raw: &Value) -> Map<String, Value> {
    if non_empty_object(raw).is_none() {
        return Map::new();
    }

    let mut out = Map::new();
    out.insert(
        "research_topics".into(),
        pick(raw, &[&["research_topics"], &["topics"]]).unwrap_or_else(|| json!([])),
    );
    out.insert(
        "content_preferences".into(),
        pick(raw, &[&["content_preferences"]]).unwrap_or_else(|| json!({})),
    );
    // Newer documents write `audience_intelligence`; older ones wrote
    // `audience_research`. The canonical key reads both.
    out.insert(
        "audience_intelligence".into(),
        pick(raw, &[&["audience_intelligence"], &["audience_research"]])
            .unwrap_or_else(|| json!({})),
    );
    out.insert(
        "consumption_patterns".into(),
        pick(
            raw,
            &[
                &["consumption_patterns"],
                &["audience_intelligence", "consumption_patterns"],
            ],
        )
        .unwrap_or_else(|| json!({})),
    );
    out.insert(
        "pain_points".into(),
        pick(raw, &[&["pain_points"], &["audience_pain_points"]]).unwrap_or_else(|| json!([])),
    );
    out.insert(
        "buying_journey".into(),
        pick(raw, &[&["buying_journey"]]).unwrap_or_else(|| json!({})),
    );
    out.insert(
        "engagement_patterns".into(),
        pick(raw, &[&["engagement_patterns"]]).unwrap_or_else(|| json!({})),
    );
    out.insert(
        "content_types".into(),
        pick(raw, &[&["content_types"], &["preferred_formats"]]).unwrap_or_else(|| json!([])),
    );
    out.insert(
        "content_length".into(),
        pick(raw, &[&["content_length"]]).unwrap_or_else(|| json!(DEFAULT_CONTENT_LENGTH)),
    );
    out.insert(
        "confidence_level".into(),
        confidence_or_default(raw, FieldSource::ResearchPreferences),
    );
    out
}

/// Canonical shape of the API-key-derived analytics document.
pub fn normalize_api_keys_data(raw: &Value) -> Map<String, Value> {
    if non_empty_object(raw).is_none() {
        return Map::new();
    }

    let mut out = Map::new();
    out.insert(
        "connected_platforms".into(),
        pick(raw, &[&["connected_platforms"], &["platforms"]]).unwrap_or_else(|| json!([])),
    );
    out.insert(
        "analytics".into(),
        pick(raw, &[&["analytics"]]).unwrap_or_else(|| json!({})),
    );
    out.insert(
        "traffic_metrics".into(),
        pick(
            raw,
            &[&["traffic_metrics"], &["analytics", "traffic_sources"]],
        )
        .unwrap_or_else(default_traffic_split),
    );
    out.insert(
        "conversion_data".into(),
        pick(raw, &[&["conversion_data"], &["analytics", "conversions"]])
            .unwrap_or_else(|| json!({})),
    );
    out.insert(
        "search_console".into(),
        pick(raw, &[&["search_console"]]).unwrap_or_else(|| json!({})),
    );
    out.insert(
        "confidence_level".into(),
        confidence_or_default(raw, FieldSource::ApiKeysData),
    );
    out
}

/// Default content length assumed when research preferences omit one.
pub const DEFAULT_CONTENT_LENGTH: &str = "Medium (1000-2000 words)";

/// Assumed traffic-source split when no analytics integration reports one.
fn default_traffic_split() -> Value {
    json!({
        "organic": 70,
        "social": 20,
        "direct": 7,
        "referral": 3
    })
}

fn non_empty_object(raw: &Value) -> Option<&Map<String, Value>> {
    raw.as_object().filter(|m| !m.is_empty())
}

/// First non-null value among the candidate key paths.
fn pick(raw: &Value, paths: &[&[&str]]) -> Option<Value> {
    for path in paths {
        let mut current = raw;
        let mut found = true;
        for key in *path {
            match current.get(key) {
                Some(next) => current = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found && !current.is_null() {
            return Some(current.clone());
        }
    }
    None
}

fn confidence_or_default(raw: &Value, source: FieldSource) -> Value {
    let level = raw
        .get("confidence_level")
        .and_then(Value::as_f64)
        .unwrap_or_else(|| source.default_confidence());
    json!(level)
}
