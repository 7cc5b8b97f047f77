//! Normalization of the free-form `pre_existing_conditions` field
//!
//! The field arrives as a JSON array, a stringified list (Python or JSON
//! flavoured), an empty marker, or plain text. Every shape collapses to a
//! comma-joined string or the sentinel [`NONE`]. Cleaning is idempotent.

use serde_json::Value as JsonValue;

/// Sentinel for "no conditions"
pub const NONE: &str = "None";

const EMPTY_MARKERS: &[&str] = &["", "[]", "none", "null", "nan"];

fn is_empty_marker(text: &str) -> bool {
    let lowered = text.trim().to_ascii_lowercase();
    EMPTY_MARKERS.contains(&lowered.as_str())
}

fn is_strip_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '"')
}

fn strip_enclosing(text: &str) -> &str {
    text.trim_matches(is_strip_char)
}

/// Clean a generated (JSON) conditions value
pub fn clean_value(raw: &JsonValue) -> String {
    match raw {
        JsonValue::Null => NONE.to_string(),
        JsonValue::Array(items) => join_items(items.iter().filter_map(json_item)),
        JsonValue::String(text) => clean_text(text),
        JsonValue::Number(n) => clean_text(&n.to_string()),
        JsonValue::Bool(b) => clean_text(&b.to_string()),
        // A lone object is not a meaningful condition list
        JsonValue::Object(_) => NONE.to_string(),
    }
}

/// Clean a conditions cell read back from a CSV table
pub fn clean_cell(cell: Option<&str>) -> String {
    match cell {
        None => NONE.to_string(),
        Some(text) => clean_text(text),
    }
}

/// Clean a textual conditions value
pub fn clean_text(text: &str) -> String {
    if is_empty_marker(text) {
        return NONE.to_string();
    }
    if let Some(items) = parse_list_literal(text) {
        return join_items(items.into_iter());
    }
    let stripped = strip_enclosing(text);
    if is_empty_marker(stripped) {
        NONE.to_string()
    } else {
        stripped.to_string()
    }
}

fn json_item(item: &JsonValue) -> Option<String> {
    match item {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn join_items(items: impl Iterator<Item = String>) -> String {
    let parts: Vec<String> = items
        .map(|item| strip_enclosing(&item).to_string())
        .filter(|item| !is_empty_marker(item))
        .collect();
    if parts.is_empty() {
        NONE.to_string()
    } else {
        parts.join(", ")
    }
}

/// Parse a single-level list literal such as `['a', "b", c]`.
///
/// Returns `None` when the text is not bracketed or the quoting is unbalanced,
/// in which case the caller treats it as plain text.
fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                ',' => items.push(std::mem::take(&mut current)),
                '[' | ']' => return None,
                _ => current.push(c),
            },
        }
    }
    if quote.is_some() {
        return None;
    }
    items.push(current);

    Some(
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn python_list_literal() {
        assert_eq!(
            clean_text("['Diabetes', 'Hypertension']"),
            "Diabetes, Hypertension"
        );
        assert_eq!(clean_text(r#"["Asthma"]"#), "Asthma");
        assert_eq!(clean_text("[None, 'COPD']"), "COPD");
    }

    #[test]
    fn empty_inputs_become_sentinel() {
        assert_eq!(clean_value(&json!(null)), NONE);
        assert_eq!(clean_value(&json!([])), NONE);
        assert_eq!(clean_value(&json!("[]")), NONE);
        assert_eq!(clean_value(&json!("")), NONE);
        assert_eq!(clean_value(&json!("nan")), NONE);
        assert_eq!(clean_value(&json!([null, ""])), NONE);
        assert_eq!(clean_cell(None), NONE);
        assert_eq!(clean_text("  [ ]  "), NONE);
        assert_eq!(clean_text("''"), NONE);
    }

    #[test]
    fn arrays_are_joined() {
        assert_eq!(
            clean_value(&json!(["Obesity", "Type 2 diabetes"])),
            "Obesity, Type 2 diabetes"
        );
    }

    #[test]
    fn plain_text_is_stripped() {
        assert_eq!(clean_text("  Hypertension "), "Hypertension");
        assert_eq!(clean_text("'Hypertension'"), "Hypertension");
        assert_eq!(clean_text("[Asthma"), "Asthma");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let inputs = [
            json!(null),
            json!([]),
            json!("[]"),
            json!("['Diabetes', 'Hypertension']"),
            json!(["[odd]", "'quoted'", "plain"]),
            json!("'a', 'b'"),
            json!("[unbalanced 'quote]"),
            json!("None"),
            json!(" x "),
            json!(42),
            json!({"k": "v"}),
        ];
        for input in inputs {
            let once = clean_value(&input);
            let twice = clean_text(&once);
            assert_eq!(once, twice, "not idempotent for {input}");
            assert_ne!(once, "[]");
        }
    }
}
