//! Generation prompt construction

use crate::schema::COLUMNS;

/// Maximum number of context characters forwarded to the model
pub const CONTEXT_CHAR_LIMIT: usize = 30_000;

/// Number of profiles requested per call
pub const PROFILES_PER_REQUEST: usize = 3;

const PREAMBLE: &str = r#"You are a meticulous clinical data scientist AI. Your mission is to generate a diverse cohort of 3 clinically plausible, hypothetical patient profiles based **exclusively** on the provided disease context.

**CRITICAL RULE: AVOIDING EXAMPLE BIAS**
The `EXAMPLE` below only shows the required JSON structure. For the `ACTUAL CONTEXT`, you MUST evaluate **every single field** in the `SCHEMA OF ALL POSSIBLE FIELDS` and populate any that are mentioned or logically implied. Do not limit yourself to the handful of fields used in the example."#;

const PRINCIPLES: &str = r#"### GUIDING PRINCIPLES
1. **Clinical Diversity:** The 3 profiles MUST be distinct. Vary demographics (`age`, `gender`, `ethnicity`) and `severity_level` ('Mild', 'Moderate', 'Severe').
2. **Symptom Coherence:** All data must align with the `severity_level`. A 'Severe' case should have more pronounced symptoms and vitals.
3. **Handling Ambiguity:** If the context is qualitative (e.g. "high fever"), generate a plausible number (e.g. `"body_temperature": 39.5`). If a non-symptom field is not mentioned or implied, use `null`."#;

const FIELD_RULES: &str = r#"### DETAILED FIELD INSTRUCTIONS
- **Symptom fields (e.g. 'fever', 'cough'):** The value is the probability, between 0.0 and 1.0, that this patient presents the symptom given the context and severity. Either output a bare number or an object of the form `{"value": true, "probability": 0.85}`.
- **Unmentioned symptoms:** If the context never mentions a symptom, its probability MUST be `0.0`.
- **Negated symptoms:** If the context explicitly says a symptom is absent or rare, still record it with a low probability (e.g. `0.05`). Never omit it.
- **`pre_existing_conditions`:** Output a JSON array of strings, or `null` if there are none.
- **`link`:** Leave it out; it is filled in by the caller."#;

const EXAMPLE: &str = r#"### EXAMPLE (FOR FORMATTING REFERENCE ONLY)
[
  {
    "disease": "Aqua-fever",
    "symptom_summary": "A 42-year-old female presents with a characteristic blue skin rash and a persistent dry cough.",
    "gender": "Female",
    "age": 42,
    "severity_level": "Moderate",
    "body_temperature": 38.1,
    "pre_existing_conditions": ["Asthma"],
    "rash": 1.0,
    "dry_cough": {"value": true, "probability": 0.95},
    "shortness_of_breath": 0.05,
    "chest_pain": 0.0
  }
]"#;

const OUTPUT_CONTRACT: &str = r#"### OUTPUT FORMAT
Respond with exactly one valid JSON array containing exactly 3 patient profile objects. Do not include any prose, explanations or markdown code fences."#;

/// Cut `context` to at most `limit` characters without splitting a code point
pub fn truncate_context(context: &str, limit: usize) -> &str {
    match context.char_indices().nth(limit) {
        Some((idx, _)) => &context[..idx],
        None => context,
    }
}

/// Render the full instruction payload for one generation call.
///
/// Pure function of its inputs: the schema listing, field rules and output
/// contract are fixed, only the disease name and (truncated) context vary.
pub fn build_prompt(disease_name: &str, context: &str) -> String {
    let schema = COLUMNS
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let context = truncate_context(context, CONTEXT_CHAR_LIMIT);

    format!(
        "{PREAMBLE}\n\n\
         **SCHEMA OF ALL POSSIBLE FIELDS:**\n[{schema}]\n\n\
         ---\n{PRINCIPLES}\n\n\
         ---\n{FIELD_RULES}\n\n\
         ---\n{EXAMPLE}\n\n\
         ---\n{OUTPUT_CONTRACT}\n\n\
         ---\n**ACTUAL CONTEXT TO USE:**\n\
         **Disease:** \"{disease_name}\"\n\
         **Text:**\n{context}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_column_in_order() {
        let prompt = build_prompt("Influenza", "Fever and cough are common.");
        let mut last = 0;
        for column in COLUMNS {
            let needle = format!("'{column}'");
            let at = prompt[last..]
                .find(&needle)
                .unwrap_or_else(|| panic!("{column} missing or out of order"));
            last += at + needle.len();
        }
    }

    #[test]
    fn prompt_carries_rules_and_inputs() {
        let prompt = build_prompt("Influenza", "Fever and cough are common.");
        assert!(prompt.contains("**Disease:** \"Influenza\""));
        assert!(prompt.contains("Fever and cough are common."));
        assert!(prompt.contains("MUST be `0.0`"));
        assert!(prompt.contains("low probability"));
        assert!(prompt.contains("exactly 3 patient profile objects"));
        assert!(prompt.contains("no prose") || prompt.contains("any prose"));
        assert!(prompt.contains("every single field"));
    }

    #[test]
    fn context_is_truncated() {
        let context = "x".repeat(CONTEXT_CHAR_LIMIT + 500);
        let prompt = build_prompt("Flu", &context);
        assert!(prompt.contains(&"x".repeat(CONTEXT_CHAR_LIMIT)));
        assert!(!prompt.contains(&"x".repeat(CONTEXT_CHAR_LIMIT + 1)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_context(text, 2), "hé");
        assert_eq!(truncate_context(text, 100), text);
        assert_eq!(truncate_context("", 5), "");
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt("A", "b"), build_prompt("A", "b"));
    }
}
