//! Schema gate on the assembled autofill payload. Upstream components
//! degrade silently on dirty input; this is the one place a structurally
//! broken *output* is turned into an error before it crosses the service
//! boundary. A violation here means a programming defect in the transformer
//! or normalizers, not bad user data.

use serde_json::Value;
use thiserror::Error;

/// Top-level keys the payload must carry, each as a JSON object.
pub const REQUIRED_KEYS: &[&str] = &[
    "fields",
    "sources",
    "quality_scores",
    "confidence_levels",
    "data_freshness",
    "input_data_points",
];

/// The four provenance literals a field entry may claim.
pub const ALLOWED_SOURCES: &[&str] = &[
    "website_analysis",
    "research_preferences",
    "api_keys_data",
    "onboarding_session",
];

#[derive(Debug, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("key '{0}' must be a JSON object")]
    WrongContainerType(&'static str),

    #[error("field '{0}' must be an object with value, source and confidence")]
    MalformedField(String),

    #[error("field '{field}' has unknown source '{source_name}'")]
    UnknownSource { field: String, source_name: String },

    #[error("field '{0}' has a non-numeric confidence")]
    NonNumericConfidence(String),

    #[error("field '{field}' has confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { field: String, confidence: f64 },
}

/// Validates the serialized payload. Short-circuits on the first violation —
/// the caller gets one precise error, not a report.
pub fn validate_payload(payload: &Value) -> Result<(), SchemaViolation> {
    let root = payload.as_object().ok_or(SchemaViolation::NotAnObject)?;

    for key in REQUIRED_KEYS {
        let value = root.get(*key).ok_or(SchemaViolation::MissingKey(key))?;
        if !value.is_object() {
            return Err(SchemaViolation::WrongContainerType(key));
        }
    }

    if let Some(fields) = root.get("fields").and_then(Value::as_object) {
        for (name, entry) in fields {
            validate_field_entry(name, entry)?;
        }
    }

    Ok(())
}

fn validate_field_entry(name: &str, entry: &Value) -> Result<(), SchemaViolation> {
    let obj = entry
        .as_object()
        .ok_or_else(|| SchemaViolation::MalformedField(name.to_string()))?;

    // `value` may legitimately be null (market_share), so presence of the
    // key is what matters.
    if !obj.contains_key("value") || !obj.contains_key("source") || !obj.contains_key("confidence")
    {
        return Err(SchemaViolation::MalformedField(name.to_string()));
    }

    let source = obj["source"]
        .as_str()
        .ok_or_else(|| SchemaViolation::MalformedField(name.to_string()))?;
    if !ALLOWED_SOURCES.contains(&source) {
        return Err(SchemaViolation::UnknownSource {
            field: name.to_string(),
            source_name: source.to_string(),
        });
    }

    let confidence = coerce_f64(&obj["confidence"])
        .ok_or_else(|| SchemaViolation::NonNumericConfidence(name.to_string()))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(SchemaViolation::ConfidenceOutOfRange {
            field: name.to_string(),
            confidence,
        });
    }

    Ok(())
}

/// Confidence must parse as a float: JSON numbers directly, numeric strings
/// by coercion.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_payload() -> Value {
        json!({
            "fields": {},
            "sources": {},
            "quality_scores": {},
            "confidence_levels": {},
            "data_freshness": {},
            "input_data_points": {}
        })
    }

    fn payload_with_field(entry: Value) -> Value {
        let mut payload = minimal_payload();
        payload["fields"]["business_objectives"] = entry;
        payload
    }

    #[test]
    fn test_minimal_well_formed_payload_passes() {
        assert_eq!(validate_payload(&minimal_payload()), Ok(()));
    }

    #[test]
    fn test_missing_sources_key_is_rejected() {
        let mut payload = minimal_payload();
        payload.as_object_mut().unwrap().remove("sources");
        assert_eq!(
            validate_payload(&payload),
            Err(SchemaViolation::MissingKey("sources"))
        );
    }

    #[test]
    fn test_wrong_container_type_is_rejected() {
        let mut payload = minimal_payload();
        payload["quality_scores"] = json!([]);
        assert_eq!(
            validate_payload(&payload),
            Err(SchemaViolation::WrongContainerType("quality_scores"))
        );
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert_eq!(
            validate_payload(&json!([1, 2, 3])),
            Err(SchemaViolation::NotAnObject)
        );
    }

    #[test]
    fn test_confidence_above_one_is_rejected() {
        let payload = payload_with_field(json!({
            "value": ["grow traffic"],
            "source": "website_analysis",
            "confidence": 1.5
        }));
        assert_eq!(
            validate_payload(&payload),
            Err(SchemaViolation::ConfidenceOutOfRange {
                field: "business_objectives".to_string(),
                confidence: 1.5
            })
        );
    }

    #[test]
    fn test_made_up_source_is_rejected() {
        let payload = payload_with_field(json!({
            "value": 1,
            "source": "made_up",
            "confidence": 0.5
        }));
        assert_eq!(
            validate_payload(&payload),
            Err(SchemaViolation::UnknownSource {
                field: "business_objectives".to_string(),
                source_name: "made_up".to_string()
            })
        );
    }

    #[test]
    fn test_missing_entry_keys_are_rejected() {
        let payload = payload_with_field(json!({
            "source": "website_analysis",
            "confidence": 0.5
        }));
        assert_eq!(
            validate_payload(&payload),
            Err(SchemaViolation::MalformedField(
                "business_objectives".to_string()
            ))
        );
    }

    #[test]
    fn test_null_value_with_valid_provenance_passes() {
        let payload = payload_with_field(json!({
            "value": null,
            "source": "website_analysis",
            "confidence": 0.8
        }));
        assert_eq!(validate_payload(&payload), Ok(()));
    }

    #[test]
    fn test_numeric_string_confidence_is_coerced() {
        let payload = payload_with_field(json!({
            "value": 1,
            "source": "onboarding_session",
            "confidence": "0.7"
        }));
        assert_eq!(validate_payload(&payload), Ok(()));
    }

    #[test]
    fn test_non_numeric_confidence_is_rejected() {
        let payload = payload_with_field(json!({
            "value": 1,
            "source": "onboarding_session",
            "confidence": "high"
        }));
        assert_eq!(
            validate_payload(&payload),
            Err(SchemaViolation::NonNumericConfidence(
                "business_objectives".to_string()
            ))
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let mut payload = payload_with_field(json!({
            "value": 1,
            "source": "made_up",
            "confidence": 9.0
        }));
        payload["fields"]["zz_later"] = json!("not an object");
        // Both entries are broken; the report names exactly one.
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::UnknownSource {
                field: "business_objectives".to_string(),
                source_name: "made_up".to_string()
            }
        );
    }
}
