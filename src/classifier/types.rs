use serde::Serialize;

/// Formatted classification returned by the inference API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub prediction: String,
    /// As received, in [0, 1].
    pub confidence: f64,
    /// Sorted by percentage, highest first. `None` when the API sent no mapping.
    pub probabilities: Option<Vec<ProbabilityRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub class: String,
    /// `probability * 100`, rounded to two decimals.
    pub percentage: f64,
}

impl ClassificationResult {
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }

    pub fn confidence_text(&self) -> String {
        format!("{:.2}%", self.confidence_percent())
    }
}

impl ProbabilityRow {
    pub fn percentage_text(&self) -> String {
        format!("{:.2}", self.percentage)
    }
}
