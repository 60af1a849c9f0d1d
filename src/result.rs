use serde::Deserialize;

use crate::error::PredictionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ExpectedRuns {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProjection {
    pub phase: String,
    pub expected_runs: f64,
    /// 0-100.
    pub intensity: f64,
}

/// Model output. Every field is required on the wire; a payload missing any of
/// them is rejected instead of producing a partial record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub expected_runs: ExpectedRuns,
    pub strike_rate: f64,
    pub probability_of_thirty: f64,
    pub probability_of_fifty: f64,
    pub probability_of_hundred: f64,
    pub performance_against_pace: f64,
    pub performance_against_spin: f64,
    pub primary_threat: String,
    pub risk_level: RiskLevel,
    pub key_insights: Vec<String>,
    pub phased_analysis: Vec<PhaseProjection>,
    pub technical_advice: String,
}

/// Parse the JSON text the model produced. Tolerates a surrounding markdown fence.
pub fn parse_prediction_json(raw: &str) -> Result<PredictionResult, PredictionError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() || cleaned == "null" {
        return Err(PredictionError::InvalidResponseShape(
            "empty prediction payload".to_string(),
        ));
    }
    serde_json::from_str::<PredictionResult>(cleaned)
        .map_err(|err| PredictionError::InvalidResponseShape(err.to_string()))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
