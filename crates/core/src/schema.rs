//! Output column registry
//!
//! The fixed, ordered set of columns every generated row is projected onto.

use serde::{Deserialize, Serialize};

/// Column holding the free-form pre-existing conditions list
pub const CONDITIONS_COLUMN: &str = "pre_existing_conditions";

/// Provenance column, always set to the source URL of a generated row
pub const LINK_COLUMN: &str = "link";

/// Every output column, in output order
pub const COLUMNS: [&str; 103] = [
    // Demographics and history
    "disease",
    "symptom_summary",
    "gender",
    "age",
    "ethnicity",
    "severity_level",
    "duration_days",
    "smoking_status",
    "alcohol_consumption",
    "family_history_of_disease",
    "pre_existing_conditions",
    "occupation_exposure",
    // Vitals
    "heart_rate",
    "respiratory_rate",
    "body_temperature",
    "blood_pressure_systolic",
    "blood_pressure_diastolic",
    "oxygen_saturation",
    // Labs
    "wbc_count",
    "rbc_count",
    "platelet_count",
    "hemoglobin",
    "blood_glucose_level",
    "cholesterol_total",
    "creatinine",
    // Symptoms: general
    "fever",
    "fatigue",
    "malaise",
    "weight_loss",
    "night_sweats",
    "chills",
    "loss_of_appetite",
    "weakness",
    "lymph_node_swelling",
    // Respiratory
    "cough",
    "dry_cough",
    "productive_cough",
    "shortness_of_breath",
    "chest_pain",
    "wheezing",
    // ENT / head
    "sore_throat",
    "runny_nose",
    "nasal_congestion",
    "headache",
    "dizziness",
    "ear_pain",
    "post_nasal_drip",
    // Neurological
    "confusion",
    "seizures",
    "loss_of_consciousness",
    "insomnia",
    "memory_loss",
    "difficulty_concentrating",
    "blurred_vision",
    "sensitivity_to_light",
    "ringing_in_ears",
    // Gastrointestinal
    "nausea",
    "vomiting",
    "diarrhea",
    "constipation",
    "abdominal_pain",
    "bloating",
    "heartburn",
    "indigestion",
    "blood_in_stool",
    "jaundice",
    // Skin
    "rash",
    "hives",
    "petechiae",
    "itching",
    "redness",
    "swelling",
    "peeling_skin",
    "dryness",
    "boils_or_blisters",
    "lesions_or_sores",
    "hair_loss",
    "nail_changes",
    // Cardiovascular
    "palpitations",
    "chest_tightness",
    // Musculoskeletal / circulatory
    "muscle_aches",
    "joint_pain",
    "leg_swelling",
    "visible_veins",
    "fainting",
    // Urogenital
    "painful_urination",
    "frequent_urination",
    "urgency_to_urinate",
    "blood_in_urine",
    "discharge",
    "menstrual_irregularity",
    "pelvic_pain",
    // Endocrine / metabolic
    "excessive_thirst",
    "excessive_hunger",
    "heat_intolerance",
    "cold_intolerance",
    "rapid_weight_gain",
    "slow_healing_wounds",
    // Mental health
    "anxiety",
    "depression",
    "irritability",
    "mood_swings",
    // Provenance
    "link",
];

const TEXT_COLUMNS: &[&str] = &[
    "disease",
    "symptom_summary",
    "gender",
    "ethnicity",
    "severity_level",
    "smoking_status",
    "alcohol_consumption",
    "family_history_of_disease",
    "occupation_exposure",
];

const NUMERIC_COLUMNS: &[&str] = &[
    "age",
    "duration_days",
    "heart_rate",
    "respiratory_rate",
    "body_temperature",
    "blood_pressure_systolic",
    "blood_pressure_diastolic",
    "oxygen_saturation",
    "wbc_count",
    "rbc_count",
    "platelet_count",
    "hemoglobin",
    "blood_glucose_level",
    "cholesterol_total",
    "creatinine",
];

/// Semantic type of a column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Identifier or categorical text
    Text,
    /// Age, vitals, lab values, durations
    Numeric,
    /// Probability in [0.0, 1.0] that the symptom is present
    Symptom,
    /// The list-valued pre-existing conditions field
    Conditions,
    /// Source URL the row was generated from
    Link,
}

/// Classify a column. Names outside the registry return `None`.
pub fn kind_of(column: &str) -> Option<FieldKind> {
    if column == CONDITIONS_COLUMN {
        Some(FieldKind::Conditions)
    } else if column == LINK_COLUMN {
        Some(FieldKind::Link)
    } else if TEXT_COLUMNS.contains(&column) {
        Some(FieldKind::Text)
    } else if NUMERIC_COLUMNS.contains(&column) {
        Some(FieldKind::Numeric)
    } else if COLUMNS.contains(&column) {
        Some(FieldKind::Symptom)
    } else {
        None
    }
}

/// Index of a column in output order
pub fn position(column: &str) -> Option<usize> {
    COLUMNS.iter().position(|c| *c == column)
}

/// Iterate over every column paired with its kind, in output order
pub fn fields() -> impl Iterator<Item = (&'static str, FieldKind)> {
    COLUMNS.iter().map(|c| {
        let kind = kind_of(c).unwrap_or(FieldKind::Symptom);
        (*c, kind)
    })
}

/// Symptom indicator columns, in output order
pub fn symptom_columns() -> impl Iterator<Item = &'static str> {
    fields()
        .filter(|(_, kind)| *kind == FieldKind::Symptom)
        .map(|(c, _)| c)
}

/// A CSV document containing only the header row
pub fn template_csv() -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn columns_are_unique() {
        let unique: HashSet<_> = COLUMNS.iter().collect();
        assert_eq!(unique.len(), COLUMNS.len());
    }

    #[test]
    fn kind_counts_add_up() {
        let count = |k: FieldKind| fields().filter(|(_, kind)| *kind == k).count();
        assert_eq!(count(FieldKind::Text), 9);
        assert_eq!(count(FieldKind::Numeric), 15);
        assert_eq!(count(FieldKind::Conditions), 1);
        assert_eq!(count(FieldKind::Link), 1);
        assert_eq!(count(FieldKind::Symptom), 77);
        assert_eq!(symptom_columns().count(), 77);
    }

    #[test]
    fn provenance_is_last() {
        assert_eq!(COLUMNS.last(), Some(&LINK_COLUMN));
        assert_eq!(position("disease"), Some(0));
        assert_eq!(position("unknown_column"), None);
        assert_eq!(kind_of("fever"), Some(FieldKind::Symptom));
        assert_eq!(kind_of("age"), Some(FieldKind::Numeric));
        assert_eq!(kind_of("gender"), Some(FieldKind::Text));
        assert_eq!(kind_of("bogus"), None);
    }

    #[test]
    fn template_is_header_only() {
        let csv = template_csv();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("disease,symptom_summary,"));
        assert!(csv.ends_with("mood_swings,link\n"));
    }
}
