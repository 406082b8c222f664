use mri_classifier::{
    ClassifyError,
    classifier::{ProbabilityRow, format},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

mod common;
use common::test_utils::glioma_response;

fn rows(pairs: &[(&str, f64)]) -> Vec<ProbabilityRow> {
    pairs
        .iter()
        .map(|(class, percentage)| ProbabilityRow {
            class: class.to_string(),
            percentage: *percentage,
        })
        .collect()
}

#[test]
fn test_glioma_scenario() {
    let result = format(&glioma_response()).unwrap();

    assert_eq!(result.prediction, "glioma");
    assert_eq!(result.confidence_text(), "87.00%");
    assert_eq!(
        result.probabilities,
        Some(rows(&[
            ("glioma", 87.0),
            ("meningioma", 10.0),
            ("notumor", 2.0),
            ("pituitary", 1.0),
        ]))
    );
}

#[test]
fn test_rows_sorted_descending_regardless_of_response_order() {
    let raw = json!({
        "prediction": "meningioma",
        "confidence": 0.6,
        "probabilities": {
            "pituitary": 0.05,
            "notumor": 0.15,
            "meningioma": 0.6,
            "glioma": 0.2
        }
    });

    let result = format(&raw).unwrap();
    let rows = result.probabilities.unwrap();

    assert_eq!(rows.len(), 4);
    for pair in rows.windows(2) {
        assert!(
            pair[0].percentage >= pair[1].percentage,
            "{:?} listed before {:?}",
            pair[0],
            pair[1]
        );
    }
    assert_eq!(rows[0].class, "meningioma");
    assert_eq!(rows[3].class, "pituitary");
}

#[rstest]
#[case(0.123456, 12.35)]
#[case(0.5, 50.0)]
#[case(0.0, 0.0)]
#[case(1.0, 100.0)]
#[case(0.00001, 0.0)]
fn test_probability_percentages_rounded_to_two_decimals(#[case] value: f64, #[case] expected: f64) {
    let raw = json!({"prediction": "x", "confidence": value, "probabilities": {"x": value}});
    let result = format(&raw).unwrap();
    assert_eq!(result.probabilities.unwrap()[0].percentage, expected);
}

#[rstest]
#[case(0.87, "87.00%")]
#[case(0.5, "50.00%")]
#[case(0.123456, "12.35%")]
#[case(1.0, "100.00%")]
fn test_confidence_text(#[case] confidence: f64, #[case] expected: &str) {
    let result = format(&json!({"confidence": confidence})).unwrap();
    assert_eq!(result.confidence_percent(), confidence * 100.0);
    assert_eq!(result.confidence_text(), expected);
}

#[test]
fn test_missing_fields_use_defaults() {
    let result = format(&json!({})).unwrap();

    assert_eq!(result.prediction, "N/A");
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.confidence_text(), "0.00%");
    assert_eq!(result.probabilities, None);
}

#[test]
fn test_null_fields_use_defaults() {
    let result = format(&json!({"prediction": null, "confidence": null})).unwrap();
    assert_eq!(result.prediction, "N/A");
    assert_eq!(result.confidence, 0.0);
}

#[rstest]
#[case(json!({"prediction": "glioma", "confidence": 0.9}))]
#[case(json!({"prediction": "glioma", "confidence": 0.9, "probabilities": null}))]
#[case(json!({"prediction": "glioma", "confidence": 0.9, "probabilities": [0.9, 0.1]}))]
#[case(json!({"prediction": "glioma", "confidence": 0.9, "probabilities": "glioma"}))]
fn test_absent_or_non_mapping_probabilities_mean_no_breakdown(#[case] raw: serde_json::Value) {
    let result = format(&raw).unwrap();
    assert_eq!(result.probabilities, None);
    assert_eq!(result.prediction, "glioma");
}

#[test]
fn test_empty_mapping_is_an_empty_table() {
    let result = format(&json!({"probabilities": {}})).unwrap();
    assert_eq!(result.probabilities, Some(vec![]));
}

#[test]
fn test_probabilities_are_not_normalized() {
    let raw = json!({"probabilities": {"glioma": 0.9, "notumor": 0.9}});
    let rows = format(&raw).unwrap().probabilities.unwrap();
    let total: f64 = rows.iter().map(|r| r.percentage).sum();
    assert_eq!(total, 180.0);
}

#[test]
fn test_equal_percentages_keep_response_order() {
    let raw = json!({
        "probabilities": {"notumor": 0.25, "glioma": 0.25, "pituitary": 0.25, "meningioma": 0.25}
    });
    let classes: Vec<_> = format(&raw)
        .unwrap()
        .probabilities
        .unwrap()
        .into_iter()
        .map(|r| r.class)
        .collect();
    assert_eq!(classes, vec!["notumor", "glioma", "pituitary", "meningioma"]);
}

#[test]
fn test_values_equal_after_rounding_count_as_ties() {
    let raw = json!({"probabilities": {"a": 0.100001, "b": 0.100002}});
    let classes: Vec<_> = format(&raw)
        .unwrap()
        .probabilities
        .unwrap()
        .into_iter()
        .map(|r| r.class)
        .collect();
    assert_eq!(classes, vec!["a", "b"]);
}

#[test]
fn test_format_is_idempotent() {
    let raw = glioma_response();
    assert_eq!(format(&raw).unwrap(), format(&raw).unwrap());
}

#[test]
fn test_non_string_prediction_is_shown_as_json() {
    let result = format(&json!({"prediction": 3})).unwrap();
    assert_eq!(result.prediction, "3");
}

#[rstest]
#[case(json!({"confidence": "high"}))]
#[case(json!({"confidence": [0.5]}))]
#[case(json!({"probabilities": {"glioma": "0.8"}}))]
#[case(json!("glioma"))]
#[case(json!(null))]
fn test_malformed_bodies_are_format_errors(#[case] raw: serde_json::Value) {
    assert!(matches!(format(&raw), Err(ClassifyError::Format { .. })));
}
