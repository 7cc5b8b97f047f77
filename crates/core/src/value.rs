//! Shape resolution for generated field values
//!
//! The model answers each field either with a bare scalar or with an
//! assessment object carrying a presence flag and a probability.

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// One generated field value, in either admissible shape
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// `{"value": <bool>, "probability": <number>}`; the probability may be absent
    Assessed {
        value: bool,
        #[serde(default)]
        probability: Option<f64>,
    },
    /// Anything else, passed through unchanged
    Scalar(JsonValue),
}

impl FieldValue {
    /// Classify a raw JSON value. Structured extraction is attempted first.
    ///
    /// Only a boolean `value` makes an assessment; a probability that is
    /// present but not a number leaves the object as a scalar.
    pub fn resolve(raw: &JsonValue) -> Self {
        if let JsonValue::Object(map) = raw {
            if let Some(value) = map.get("value").and_then(JsonValue::as_bool) {
                match map.get("probability").filter(|p| !p.is_null()) {
                    None => {
                        return FieldValue::Assessed {
                            value,
                            probability: None,
                        };
                    }
                    Some(p) => {
                        if let Some(probability) = p.as_f64() {
                            return FieldValue::Assessed {
                                value,
                                probability: Some(probability),
                            };
                        }
                    }
                }
            }
        }
        FieldValue::Scalar(raw.clone())
    }

    /// The value that lands in the flat row.
    ///
    /// For assessments only the probability is kept; the presence flag is
    /// dropped at this layer unless it is all there is.
    pub fn into_flat(self) -> JsonValue {
        match self {
            FieldValue::Assessed {
                probability: Some(probability),
                ..
            } => serde_json::Number::from_f64(probability)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            FieldValue::Assessed {
                value,
                probability: None,
            } => JsonValue::Bool(value),
            FieldValue::Scalar(raw) => raw,
        }
    }

    /// Presence flag of an assessment
    pub fn presence(&self) -> Option<bool> {
        match self {
            FieldValue::Assessed { value, .. } => Some(*value),
            FieldValue::Scalar(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assessment_yields_probability() {
        let raw = json!({"value": true, "probability": 0.9});
        let resolved = FieldValue::resolve(&raw);
        assert_eq!(resolved.presence(), Some(true));
        assert_eq!(resolved.into_flat(), json!(0.9));
    }

    #[test]
    fn absent_flag_still_keeps_probability() {
        let raw = json!({"value": false, "probability": 0.05});
        assert_eq!(FieldValue::resolve(&raw).into_flat(), json!(0.05));
    }

    #[test]
    fn scalars_pass_through() {
        for raw in [json!(0.4), json!("Female"), json!(null), json!(["a"])] {
            assert_eq!(FieldValue::resolve(&raw).into_flat(), raw);
        }
    }

    #[test]
    fn partial_objects_are_scalars() {
        let raw = json!({"probability": 0.3});
        assert_eq!(FieldValue::resolve(&raw), FieldValue::Scalar(raw.clone()));
        let raw = json!({"value": true, "probability": "high"});
        assert_eq!(FieldValue::resolve(&raw), FieldValue::Scalar(raw.clone()));
    }

    #[test]
    fn non_boolean_values_are_not_assessments() {
        let raw = json!({"value": 39.5, "probability": 0.8});
        assert_eq!(FieldValue::resolve(&raw), FieldValue::Scalar(raw.clone()));
        let raw = json!({"value": "Severe", "probability": 0.7});
        assert_eq!(FieldValue::resolve(&raw), FieldValue::Scalar(raw.clone()));
    }

    #[test]
    fn lone_flag_is_kept_as_boolean() {
        let resolved = FieldValue::resolve(&json!({"value": true}));
        assert_eq!(resolved.presence(), Some(true));
        assert_eq!(resolved.into_flat(), json!(true));
    }

    #[test]
    fn untagged_deserialization_matches_resolver() {
        let parsed: FieldValue =
            serde_json::from_value(json!({"value": true, "probability": 0.7})).unwrap();
        assert_eq!(parsed.into_flat(), json!(0.7));
        let parsed: FieldValue = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(parsed, FieldValue::Scalar(json!(12)));
        let raw = json!({"value": 39.5, "probability": 0.8});
        let parsed: FieldValue = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed, FieldValue::Scalar(raw));
    }
}
