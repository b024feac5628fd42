//! Transforms the three normalized onboarding sources (plus the raw session
//! document) into the flat strategy-field map served to the frontend form.
//!
//! The per-field precedence rules live in one declarative table
//! (`FIELD_RULES`): owning source and key path first, then optional raw
//! session fallback at a fixed confidence, else the field is omitted. Preset
//! defaults for fields the sources rarely provide live in
//! `TransformDefaults` so tests can override them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Provenance tag for a strategy field. Serialized form is the wire contract
/// checked by the schema validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    WebsiteAnalysis,
    ResearchPreferences,
    ApiKeysData,
    OnboardingSession,
}

impl FieldSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSource::WebsiteAnalysis => "website_analysis",
            FieldSource::ResearchPreferences => "research_preferences",
            FieldSource::ApiKeysData => "api_keys_data",
            FieldSource::OnboardingSession => "onboarding_session",
        }
    }

    /// Confidence assumed for a source that does not state its own
    /// `confidence_level`.
    pub fn default_confidence(&self) -> f64 {
        match self {
            FieldSource::WebsiteAnalysis => 0.8,
            FieldSource::ResearchPreferences => 0.7,
            FieldSource::ApiKeysData => 0.6,
            FieldSource::OnboardingSession => SESSION_FALLBACK_CONFIDENCE,
        }
    }
}

/// Confidence assigned to values recovered from the raw onboarding session
/// when the owning source lacks them.
pub const SESSION_FALLBACK_CONFIDENCE: f64 = 0.7;

/// One named value in the autofill payload: the value itself, where it came
/// from, and how much that source is trusted. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub value: Value,
    pub source: FieldSource,
    pub confidence: f64,
}

/// One row of the field-resolution table: which normalized source a field is
/// read from, and which raw session keys can stand in when that source lacks
/// a usable value. An empty `session_keys` means no fallback — absent value,
/// absent field.
struct FieldRule {
    field: &'static str,
    source: FieldSource,
    path: &'static [&'static str],
    session_keys: &'static [&'static str],
}

const FIELD_RULES: &[FieldRule] = &[
    // Business context <- website analysis
    FieldRule {
        field: "business_objectives",
        source: FieldSource::WebsiteAnalysis,
        path: &["content_goals"],
        session_keys: &[],
    },
    FieldRule {
        field: "performance_metrics",
        source: FieldSource::WebsiteAnalysis,
        path: &["performance_metrics"],
        session_keys: &[],
    },
    FieldRule {
        field: "competitive_position",
        source: FieldSource::WebsiteAnalysis,
        path: &["competitive_position"],
        session_keys: &[],
    },
    FieldRule {
        field: "top_competitors",
        source: FieldSource::WebsiteAnalysis,
        path: &["competitors"],
        session_keys: &[],
    },
    FieldRule {
        field: "market_gaps",
        source: FieldSource::WebsiteAnalysis,
        path: &["content_gaps"],
        session_keys: &[],
    },
    FieldRule {
        field: "editorial_guidelines",
        source: FieldSource::WebsiteAnalysis,
        path: &["style_guidelines"],
        session_keys: &[],
    },
    // Budget/team/timeline/market-share fall back to the answers the user
    // typed during onboarding when website analysis did not surface them.
    FieldRule {
        field: "content_budget",
        source: FieldSource::WebsiteAnalysis,
        path: &["content_budget"],
        session_keys: &["content_budget", "budget"],
    },
    FieldRule {
        field: "team_size",
        source: FieldSource::WebsiteAnalysis,
        path: &["team_size"],
        session_keys: &["team_size"],
    },
    FieldRule {
        field: "implementation_timeline",
        source: FieldSource::WebsiteAnalysis,
        path: &["implementation_timeline"],
        session_keys: &["implementation_timeline", "timeline"],
    },
    FieldRule {
        field: "market_share",
        source: FieldSource::WebsiteAnalysis,
        path: &["market_share"],
        session_keys: &["market_share"],
    },
    // Audience intelligence <- research preferences
    FieldRule {
        field: "content_preferences",
        source: FieldSource::ResearchPreferences,
        path: &["content_preferences"],
        session_keys: &[],
    },
    FieldRule {
        field: "consumption_patterns",
        source: FieldSource::ResearchPreferences,
        path: &["consumption_patterns"],
        session_keys: &[],
    },
    FieldRule {
        field: "audience_pain_points",
        source: FieldSource::ResearchPreferences,
        path: &["pain_points"],
        session_keys: &[],
    },
    FieldRule {
        field: "buying_journey",
        source: FieldSource::ResearchPreferences,
        path: &["buying_journey"],
        session_keys: &[],
    },
    FieldRule {
        field: "engagement_metrics",
        source: FieldSource::ResearchPreferences,
        path: &["engagement_patterns"],
        session_keys: &[],
    },
    FieldRule {
        field: "industry_trends",
        source: FieldSource::ResearchPreferences,
        path: &["research_topics"],
        session_keys: &[],
    },
    FieldRule {
        field: "preferred_formats",
        source: FieldSource::ResearchPreferences,
        path: &["content_types"],
        session_keys: &[],
    },
    // Performance & analytics <- connected API keys
    FieldRule {
        field: "traffic_sources",
        source: FieldSource::ApiKeysData,
        path: &["traffic_metrics"],
        session_keys: &[],
    },
    FieldRule {
        field: "conversion_rates",
        source: FieldSource::ApiKeysData,
        path: &["conversion_data"],
        session_keys: &[],
    },
];

/// Preset values for fields the onboarding sources rarely provide. These are
/// always emitted, tagged with their owning source. Injected into
/// `transform_to_fields` rather than read as module globals so tests can
/// substitute their own tables.
#[derive(Debug, Clone)]
pub struct TransformDefaults {
    pub target_metrics: Value,
    pub competitor_content_strategies: Value,
    pub quality_metrics: Value,
    pub brand_voice: Value,
    pub seasonal_trends: Value,
    pub emerging_trends: Value,
    pub content_mix: Value,
    pub content_frequency: Value,
    pub optimal_timing: Value,
    pub content_roi_targets: Value,
    pub ab_testing_capabilities: Value,
}

impl Default for TransformDefaults {
    fn default() -> Self {
        Self {
            target_metrics: json!({
                "traffic_growth": "25% in 6 months",
                "engagement_rate": "15%",
                "conversion_rate": "5%"
            }),
            competitor_content_strategies: json!([
                "educational content",
                "case studies",
                "thought leadership"
            ]),
            quality_metrics: json!({
                "readability_target": "grade 8",
                "originality_threshold": "90%",
                "review_required": true
            }),
            brand_voice: json!({
                "tone": "professional",
                "style": "informative",
                "personality": "helpful"
            }),
            seasonal_trends: json!([
                {"quarter": "Q1", "theme": "planning and goal setting"},
                {"quarter": "Q2", "theme": "growth and optimization"},
                {"quarter": "Q3", "theme": "mid-year reviews"},
                {"quarter": "Q4", "theme": "year-end results and planning"}
            ]),
            emerging_trends: json!([
                "AI-assisted content",
                "short-form video",
                "voice search optimization"
            ]),
            content_mix: json!({
                "educational": 40,
                "promotional": 20,
                "engagement": 25,
                "thought_leadership": 15
            }),
            content_frequency: json!("Weekly"),
            optimal_timing: json!({
                "best_days": ["Tuesday", "Wednesday", "Thursday"],
                "best_times": ["09:00", "12:00", "17:00"]
            }),
            content_roi_targets: json!({
                "target_roi": "3x",
                "payback_period": "6 months"
            }),
            ab_testing_capabilities: json!({
                "available": false,
                "tools": []
            }),
        }
    }
}

impl TransformDefaults {
    fn entries(&self) -> [(&'static str, FieldSource, &Value); 11] {
        [
            (
                "target_metrics",
                FieldSource::WebsiteAnalysis,
                &self.target_metrics,
            ),
            (
                "competitor_content_strategies",
                FieldSource::WebsiteAnalysis,
                &self.competitor_content_strategies,
            ),
            (
                "quality_metrics",
                FieldSource::WebsiteAnalysis,
                &self.quality_metrics,
            ),
            ("brand_voice", FieldSource::WebsiteAnalysis, &self.brand_voice),
            (
                "seasonal_trends",
                FieldSource::ResearchPreferences,
                &self.seasonal_trends,
            ),
            (
                "emerging_trends",
                FieldSource::ResearchPreferences,
                &self.emerging_trends,
            ),
            (
                "content_mix",
                FieldSource::ResearchPreferences,
                &self.content_mix,
            ),
            (
                "content_frequency",
                FieldSource::ResearchPreferences,
                &self.content_frequency,
            ),
            (
                "optimal_timing",
                FieldSource::ApiKeysData,
                &self.optimal_timing,
            ),
            (
                "content_roi_targets",
                FieldSource::ApiKeysData,
                &self.content_roi_targets,
            ),
            (
                "ab_testing_capabilities",
                FieldSource::ApiKeysData,
                &self.ab_testing_capabilities,
            ),
        ]
    }
}

/// Resolves every known strategy field against the normalized sources.
/// Total and deterministic: no error path, identical inputs produce an
/// identical map.
pub fn transform_to_fields(
    website: &Map<String, Value>,
    research: &Map<String, Value>,
    api_keys: &Map<String, Value>,
    session: &Value,
    defaults: &TransformDefaults,
) -> BTreeMap<String, FieldEntry> {
    let mut fields = BTreeMap::new();

    for rule in FIELD_RULES {
        let normalized = source_map(rule.source, website, research, api_keys);

        if let Some(value) = value_at(normalized, rule.path).filter(|v| is_truthy(v)) {
            fields.insert(
                rule.field.to_string(),
                FieldEntry {
                    value: value.clone(),
                    source: rule.source,
                    confidence: stated_confidence(normalized, rule.source),
                },
            );
            continue;
        }

        for key in rule.session_keys {
            if let Some(value) = session.get(key).filter(|v| is_truthy(v)) {
                fields.insert(
                    rule.field.to_string(),
                    FieldEntry {
                        value: value.clone(),
                        source: FieldSource::OnboardingSession,
                        confidence: SESSION_FALLBACK_CONFIDENCE,
                    },
                );
                break;
            }
        }
    }

    // market_share keeps its legacy shape: when neither the website source
    // nor the session states one, it is still emitted from the estimated
    // figure in performance metrics — even when that estimate is null. Every
    // other field is omitted on absence; the frontend renders the two cases
    // differently, so the exception stays.
    if !fields.contains_key("market_share") && !website.is_empty() {
        let estimate = value_at(website, &["performance_metrics", "estimated_market_share"])
            .cloned()
            .unwrap_or(Value::Null);
        fields.insert(
            "market_share".to_string(),
            FieldEntry {
                value: estimate,
                source: FieldSource::WebsiteAnalysis,
                confidence: stated_confidence(website, FieldSource::WebsiteAnalysis),
            },
        );
    }

    for (field, source, value) in defaults.entries() {
        let normalized = source_map(source, website, research, api_keys);
        fields.insert(
            field.to_string(),
            FieldEntry {
                value: value.clone(),
                source,
                confidence: stated_confidence(normalized, source),
            },
        );
    }

    fields
}

fn source_map<'a>(
    source: FieldSource,
    website: &'a Map<String, Value>,
    research: &'a Map<String, Value>,
    api_keys: &'a Map<String, Value>,
) -> &'a Map<String, Value> {
    match source {
        FieldSource::WebsiteAnalysis => website,
        FieldSource::ResearchPreferences => research,
        // Session values are read through `session_keys`, never as an owning
        // source, so the rule table never names OnboardingSession here.
        FieldSource::ApiKeysData | FieldSource::OnboardingSession => api_keys,
    }
}

/// Walks a key path into a normalized source. Missing keys resolve to `None`.
fn value_at<'a>(map: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = map.get(*first)?;
    for key in rest {
        current = current.get(key)?;
    }
    Some(current)
}

/// The owning source's stated confidence level, clamped to [0, 1], or the
/// source-type default when the normalized map does not carry one.
fn stated_confidence(normalized: &Map<String, Value>, source: FieldSource) -> f64 {
    normalized
        .get("confidence_level")
        .and_then(Value::as_f64)
        .unwrap_or_else(|| source.default_confidence())
        .clamp(0.0, 1.0)
}

/// A value is worth emitting when it carries information: non-null, and not
/// an empty string/array/object, `false`, or zero.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn empty() -> Map<String, Value> {
        Map::new()
    }

    #[test]
    fn test_business_objectives_pass_through_with_stated_confidence() {
        let website = as_map(json!({
            "content_goals": ["grow traffic"],
            "confidence_level": 0.9
        }));
        let fields = transform_to_fields(
            &website,
            &empty(),
            &empty(),
            &json!({}),
            &TransformDefaults::default(),
        );

        let entry = &fields["business_objectives"];
        assert_eq!(entry.value, json!(["grow traffic"]));
        assert_eq!(entry.source, FieldSource::WebsiteAnalysis);
        assert_eq!(entry.confidence, 0.9);
    }

    #[test]
    fn test_content_budget_omitted_when_no_source_supplies_it() {
        let website = as_map(json!({
            "content_goals": ["grow traffic"],
            "confidence_level": 0.9
        }));
        let fields = transform_to_fields(
            &website,
            &empty(),
            &empty(),
            &json!({}),
            &TransformDefaults::default(),
        );
        assert!(!fields.contains_key("content_budget"));
    }

    #[test]
    fn test_content_budget_falls_back_to_session_budget() {
        let fields = transform_to_fields(
            &empty(),
            &empty(),
            &empty(),
            &json!({"budget": 5000}),
            &TransformDefaults::default(),
        );

        let entry = &fields["content_budget"];
        assert_eq!(entry.value, json!(5000));
        assert_eq!(entry.source, FieldSource::OnboardingSession);
        assert_eq!(entry.confidence, 0.7);
    }

    #[test]
    fn test_primary_source_wins_over_session_fallback() {
        let website = as_map(json!({"content_budget": 12000, "confidence_level": 0.85}));
        let fields = transform_to_fields(
            &website,
            &empty(),
            &empty(),
            &json!({"budget": 5000}),
            &TransformDefaults::default(),
        );

        let entry = &fields["content_budget"];
        assert_eq!(entry.value, json!(12000));
        assert_eq!(entry.source, FieldSource::WebsiteAnalysis);
        assert_eq!(entry.confidence, 0.85);
    }

    #[test]
    fn test_falsy_primary_value_is_skipped() {
        let website = as_map(json!({"content_goals": [], "competitors": []}));
        let fields = transform_to_fields(
            &website,
            &empty(),
            &empty(),
            &json!({}),
            &TransformDefaults::default(),
        );
        assert!(!fields.contains_key("business_objectives"));
        assert!(!fields.contains_key("top_competitors"));
    }

    #[test]
    fn test_market_share_emitted_with_null_estimate() {
        let website = as_map(json!({
            "performance_metrics": {"estimated_market_share": null},
            "confidence_level": 0.8
        }));
        let fields = transform_to_fields(
            &website,
            &empty(),
            &empty(),
            &json!({}),
            &TransformDefaults::default(),
        );

        let entry = &fields["market_share"];
        assert_eq!(entry.value, Value::Null);
        assert_eq!(entry.source, FieldSource::WebsiteAnalysis);
    }

    #[test]
    fn test_market_share_prefers_explicit_session_value() {
        let website = as_map(json!({
            "performance_metrics": {"estimated_market_share": "2%"}
        }));
        let fields = transform_to_fields(
            &website,
            &empty(),
            &empty(),
            &json!({"market_share": "5%"}),
            &TransformDefaults::default(),
        );

        let entry = &fields["market_share"];
        assert_eq!(entry.value, json!("5%"));
        assert_eq!(entry.source, FieldSource::OnboardingSession);
    }

    #[test]
    fn test_market_share_not_derived_without_website_source() {
        let fields = transform_to_fields(
            &empty(),
            &empty(),
            &empty(),
            &json!({}),
            &TransformDefaults::default(),
        );
        assert!(!fields.contains_key("market_share"));
    }

    #[test]
    fn test_all_empty_inputs_emit_exactly_the_presets() {
        let defaults = TransformDefaults::default();
        let fields = transform_to_fields(&empty(), &empty(), &empty(), &json!({}), &defaults);

        let expected: Vec<&str> = defaults.entries().iter().map(|(f, _, _)| *f).collect();
        let actual: Vec<&str> = fields.keys().map(String::as_str).collect();
        let mut expected_sorted = expected.clone();
        expected_sorted.sort();
        assert_eq!(actual, expected_sorted);

        for (field, source, _) in defaults.entries() {
            assert_eq!(fields[field].confidence, source.default_confidence());
        }
    }

    #[test]
    fn test_preset_confidence_follows_stated_source_level() {
        let research = as_map(json!({"confidence_level": 0.95}));
        let fields = transform_to_fields(
            &empty(),
            &research,
            &empty(),
            &json!({}),
            &TransformDefaults::default(),
        );
        assert_eq!(fields["content_mix"].confidence, 0.95);
    }

    #[test]
    fn test_defaults_can_be_overridden() {
        let defaults = TransformDefaults {
            content_frequency: json!("Daily"),
            ..TransformDefaults::default()
        };
        let fields = transform_to_fields(&empty(), &empty(), &empty(), &json!({}), &defaults);
        assert_eq!(fields["content_frequency"].value, json!("Daily"));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let website = as_map(json!({
            "content_goals": ["grow traffic"],
            "competitors": ["a.com", "b.com"],
            "performance_metrics": {"monthly_visitors": 40000},
            "confidence_level": 0.9
        }));
        let research = as_map(json!({"pain_points": ["slow onboarding"]}));
        let session = json!({"budget": 5000});
        let defaults = TransformDefaults::default();

        let first = transform_to_fields(&website, &research, &empty(), &session, &defaults);
        let second = transform_to_fields(&website, &research, &empty(), &session, &defaults);
        assert_eq!(first, second);
    }

    #[test]
    fn test_field_source_serializes_to_wire_literals() {
        assert_eq!(
            serde_json::to_value(FieldSource::WebsiteAnalysis).unwrap(),
            json!("website_analysis")
        );
        assert_eq!(
            serde_json::to_value(FieldSource::OnboardingSession).unwrap(),
            json!("onboarding_session")
        );
    }

    #[test]
    fn test_truthiness_rules() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([1])));
        assert!(is_truthy(&json!({"k": 1})));
        assert!(is_truthy(&json!(0.5)));
    }
}
