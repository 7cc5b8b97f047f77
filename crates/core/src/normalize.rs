//! Projection of generated profiles onto the output schema

use serde_json::{Map, Value as JsonValue};

use crate::conditions;
use crate::schema::{self, COLUMNS, FieldKind};
use crate::value::FieldValue;

static NULL: JsonValue = JsonValue::Null;

/// One flat row with exactly the schema's columns, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    values: Vec<JsonValue>,
}

impl NormalizedRow {
    /// Value of `column`, or `None` if the column is not part of the schema
    pub fn get(&self, column: &str) -> Option<&JsonValue> {
        schema::position(column).map(|idx| &self.values[idx])
    }

    /// Columns paired with their values, in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &JsonValue)> {
        COLUMNS.iter().copied().zip(self.values.iter())
    }

    /// Render one column as a CSV cell. Null and unknown columns are empty.
    pub fn cell(&self, column: &str) -> Option<String> {
        self.get(column).and_then(render_cell)
    }

    /// The row as a JSON object keyed by column name
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .iter()
            .map(|(c, v)| (c.to_string(), v.clone()))
            .collect();
        JsonValue::Object(map)
    }
}

fn render_cell(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Normalize one generated profile object.
///
/// Every schema column is read from `profile` (absent keys become null),
/// reconciled to its kind, and `link` is forced to `source_url`. Keys outside
/// the schema are ignored. Feeding an already-normalized row back in returns
/// it unchanged.
pub fn normalize_profile(profile: &Map<String, JsonValue>, source_url: &str) -> NormalizedRow {
    for key in profile.keys() {
        if schema::kind_of(key).is_none() {
            tracing::debug!(key = %key, "Ignoring generated field outside the schema");
        }
    }

    let values = schema::fields()
        .map(|(column, kind)| {
            let raw = profile.get(column).unwrap_or(&NULL);
            match kind {
                FieldKind::Link => JsonValue::String(source_url.to_string()),
                FieldKind::Conditions => JsonValue::String(conditions::clean_value(raw)),
                FieldKind::Symptom => coerce_probability(FieldValue::resolve(raw).into_flat()),
                FieldKind::Numeric => coerce_number(inner_value(raw).clone()),
                FieldKind::Text => coerce_text(inner_value(raw).clone()),
            }
        })
        .collect();

    NormalizedRow { values }
}

/// Normalize a batch of profiles, keeping generation order
pub fn normalize_profiles(profiles: &[Map<String, JsonValue>], source_url: &str) -> Vec<NormalizedRow> {
    profiles
        .iter()
        .map(|profile| normalize_profile(profile, source_url))
        .collect()
}

/// `{"value": x, ...}` unwraps to `x` for non-symptom columns
fn inner_value(raw: &JsonValue) -> &JsonValue {
    match raw {
        JsonValue::Object(map) => map.get("value").unwrap_or(raw),
        _ => raw,
    }
}

fn number(n: f64) -> JsonValue {
    serde_json::Number::from_f64(n)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce_probability(value: JsonValue) -> JsonValue {
    let p = match &value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::Bool(true) => Some(1.0),
        JsonValue::Bool(false) => Some(0.0),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    };
    match p {
        Some(p) if (0.0..=1.0).contains(&p) => {
            // Keep the original number untouched when it is already in range
            if value.is_number() { value } else { number(p) }
        }
        Some(p) => number(p.clamp(0.0, 1.0)),
        None => JsonValue::Null,
    }
}

fn coerce_number(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Number(_) => value,
        JsonValue::String(s) => parse_number(&s).map(number).unwrap_or(JsonValue::Null),
        _ => JsonValue::Null,
    }
}

fn coerce_text(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => JsonValue::Null,
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                JsonValue::Null
            } else if trimmed.len() == s.len() {
                JsonValue::String(s)
            } else {
                JsonValue::String(trimmed.to_string())
            }
        }
        JsonValue::Bool(_) | JsonValue::Number(_) => JsonValue::String(value.to_string()),
        JsonValue::Array(_) | JsonValue::Object(_) => JsonValue::String(value.to_string()),
    }
}
