// Field fallback and pass-through properties of the response normalization
// Author: kelexine (https://github.com/kelexine)

use croply_relay::models::inference::{DEFAULT_DISEASE, DEFAULT_RECOMMENDATION};
use croply_relay::models::{AnalysisResult, InferenceResult};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Absent, empty, or a real label
fn field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[A-Za-z][A-Za-z ]{0,24}".prop_map(Some),
    ]
}

fn expected(primary: &Option<String>, secondary: &Option<String>, default: &str) -> String {
    [primary, secondary]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn build(fields: [(&str, &Option<String>); 4], extra: &Map<String, Value>) -> Map<String, Value> {
    let mut map = extra.clone();
    for (key, value) in fields {
        if let Some(value) = value {
            map.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    map
}

proptest! {
    #[test]
    fn prop_first_present_field_wins(
        out_disease in field(),
        disease in field(),
        out_recommendation in field(),
        recommendation in field(),
    ) {
        let map = build(
            [
                ("output_detected_disease", &out_disease),
                ("disease", &disease),
                ("output_treatment_recommendation", &out_recommendation),
                ("recommendation", &recommendation),
            ],
            &Map::new(),
        );
        let result = AnalysisResult::from(InferenceResult::from(map));

        prop_assert_eq!(
            result.output_detected_disease,
            expected(&out_disease, &disease, DEFAULT_DISEASE)
        );
        prop_assert_eq!(
            result.output_treatment_recommendation,
            expected(&out_recommendation, &recommendation, DEFAULT_RECOMMENDATION)
        );
    }

    #[test]
    fn prop_full_response_is_untouched(
        disease in field(),
        recommendation in field(),
        score in 0.0f64..1.0,
        labels in proptest::collection::vec("[a-z_]{1,12}", 0..5),
    ) {
        let mut extra = Map::new();
        extra.insert("score".to_string(), json!(score));
        extra.insert("labels".to_string(), json!(labels));
        extra.insert("meta".to_string(), json!({ "model": "leaf-v2", "tags": null }));

        let map = build(
            [
                ("disease", &disease),
                ("recommendation", &recommendation),
                ("unused_a", &None),
                ("unused_b", &None),
            ],
            &extra,
        );

        let raw = serde_json::to_vec(&Value::Object(map.clone())).unwrap();
        let result = AnalysisResult::from(InferenceResult::from_slice(&raw).unwrap());

        prop_assert_eq!(result.full_response, map);
    }
}

#[test]
fn test_both_missing_uses_literal_defaults() {
    let result = AnalysisResult::from(InferenceResult::from(Map::new()));
    assert_eq!(result.output_detected_disease, "Unknown Disease");
    assert_eq!(
        result.output_treatment_recommendation,
        "No recommendation available."
    );
    assert!(result.full_response.is_empty());
}
