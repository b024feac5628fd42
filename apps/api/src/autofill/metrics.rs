//! Quality, confidence and freshness calculators. All three read the RAW
//! onboarding documents, before normalization fills in defaults — a source
//! that arrived empty scores 0.0 even though its normalized form would look
//! populated.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::autofill::transform::FieldSource;
use crate::onboarding::IntegratedOnboardingData;

/// Age buckets for the onboarding session's last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessStatus {
    Fresh,
    Recent,
    Aging,
    Stale,
}

impl FreshnessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessStatus::Fresh => "fresh",
            FreshnessStatus::Recent => "recent",
            FreshnessStatus::Aging => "aging",
            FreshnessStatus::Stale => "stale",
        }
    }

    fn from_age_days(age_days: i64) -> Self {
        match age_days {
            d if d <= 7 => FreshnessStatus::Fresh,
            d if d <= 30 => FreshnessStatus::Recent,
            d if d <= 90 => FreshnessStatus::Aging,
            _ => FreshnessStatus::Stale,
        }
    }
}

/// Freshness of the onboarding data. `Unknown` is a first-class outcome, not
/// a sentinel string: a missing or unparseable timestamp lands here instead
/// of raising.
#[derive(Debug, Clone, PartialEq)]
pub enum DataFreshness {
    Known {
        status: FreshnessStatus,
        age_days: i64,
        last_updated: DateTime<Utc>,
    },
    Unknown,
}

impl DataFreshness {
    pub fn status_label(&self) -> &'static str {
        match self {
            DataFreshness::Known { status, .. } => status.as_str(),
            DataFreshness::Unknown => "unknown",
        }
    }
}

// Wire shape: `{status, age_days, last_updated}` for known freshness,
// `{"status": "unknown", "age_days": "unknown"}` otherwise. The frontend
// keys off the string forms.
impl Serialize for DataFreshness {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataFreshness::Known {
                status,
                age_days,
                last_updated,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("status", status.as_str())?;
                map.serialize_entry("age_days", age_days)?;
                map.serialize_entry("last_updated", &last_updated.to_rfc3339())?;
                map.end()
            }
            DataFreshness::Unknown => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "unknown")?;
                map.serialize_entry("age_days", "unknown")?;
                map.end()
            }
        }
    }
}

fn raw_sources(data: &IntegratedOnboardingData) -> [(FieldSource, &Value); 3] {
    [
        (FieldSource::WebsiteAnalysis, &data.website_analysis),
        (FieldSource::ResearchPreferences, &data.research_preferences),
        (FieldSource::ApiKeysData, &data.api_keys_data),
    ]
}

/// Completeness score per raw source: non-null values over total keys, as a
/// percentage. Empty or non-object sources score 0.0.
pub fn calculate_quality_scores(data: &IntegratedOnboardingData) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    for (source, raw) in raw_sources(data) {
        scores.insert(source.as_str().to_string(), completeness_ratio(raw));
    }
    scores
}

fn completeness_ratio(raw: &Value) -> f64 {
    let Some(obj) = raw.as_object() else {
        return 0.0;
    };
    if obj.is_empty() {
        return 0.0;
    }
    let non_null = obj.values().filter(|v| !v.is_null()).count();
    (non_null as f64 / obj.len() as f64) * 100.0
}

/// Stated `confidence_level` per raw source, or the per-source default.
/// Sources that are absent (null/empty/non-object) are omitted entirely —
/// no entry, not a zero.
pub fn calculate_confidence_levels(data: &IntegratedOnboardingData) -> BTreeMap<String, f64> {
    let mut levels = BTreeMap::new();
    for (source, raw) in raw_sources(data) {
        let Some(obj) = raw.as_object().filter(|m| !m.is_empty()) else {
            continue;
        };
        let level = obj
            .get("confidence_level")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| source.default_confidence())
            .clamp(0.0, 1.0);
        levels.insert(source.as_str().to_string(), level);
    }
    levels
}

/// Buckets the session's last update into a freshness status. Reads
/// `updated_at`, falling back to `last_updated`; accepts RFC 3339 (trailing
/// `Z` included) and bare `YYYY-MM-DDTHH:MM:SS` strings. Anything else is
/// `Unknown`.
pub fn calculate_data_freshness(session: &Value, now: DateTime<Utc>) -> DataFreshness {
    let timestamp = session
        .get("updated_at")
        .or_else(|| session.get("last_updated"))
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    match timestamp {
        Some(last_updated) => {
            let age_days = (now - last_updated).num_days();
            DataFreshness::Known {
                status: FreshnessStatus::from_age_days(age_days),
                age_days,
                last_updated,
            }
        }
        None => DataFreshness::Unknown,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
