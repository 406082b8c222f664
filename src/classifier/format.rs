use super::types::{ClassificationResult, ProbabilityRow};
use crate::ClassifyError;
use serde_json::Value;

const DEFAULT_PREDICTION: &str = "N/A";

/// Shapes a raw `/predict` body into a displayable result.
///
/// Missing `prediction` and `confidence` fall back to `"N/A"` and `0`. A
/// `probabilities` value that is absent or not an object means no breakdown.
/// Probabilities are not normalized. Rows with equal percentages keep the
/// order in which the API listed them.
pub fn format(raw: &Value) -> Result<ClassificationResult, ClassifyError> {
    let body = raw
        .as_object()
        .ok_or_else(|| ClassifyError::format("response body is not a JSON object"))?;

    let prediction = match body.get("prediction") {
        None | Some(Value::Null) => DEFAULT_PREDICTION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let confidence = match body.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(value) => value
            .as_f64()
            .ok_or_else(|| ClassifyError::format(format!("confidence is not a number: {}", value)))?,
    };

    let probabilities = match body.get("probabilities") {
        Some(Value::Object(map)) => {
            let mut rows = map
                .iter()
                .map(|(class, value)| {
                    let probability = value.as_f64().ok_or_else(|| {
                        ClassifyError::format(format!(
                            "probability for '{}' is not a number: {}",
                            class, value
                        ))
                    })?;
                    Ok(ProbabilityRow {
                        class: class.clone(),
                        percentage: round2(probability * 100.0),
                    })
                })
                .collect::<Result<Vec<_>, ClassifyError>>()?;
            // stable: ties keep insertion order
            rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
            Some(rows)
        }
        _ => None,
    };

    Ok(ClassificationResult {
        prediction,
        confidence,
        probabilities,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
