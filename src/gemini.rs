use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::PredictionError;
use crate::http_client::build_http_client;
use crate::inputs::PredictionInputs;
use crate::prompt::build_request_body;
use crate::result::{PredictionResult, parse_prediction_json};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Seam between the controller's worker and whatever produces predictions.
pub trait Predictor: Send + Sync {
    fn predict(&self, inputs: &PredictionInputs) -> Result<PredictionResult, PredictionError>;
}

/// Gemini `generateContent` client. One request per call, no retries.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
            api_base: api_base.into(),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let client = build_http_client(cfg.timeout)?;
        Ok(Self::new(
            cfg.api_key.clone(),
            cfg.model.clone(),
            cfg.api_base.clone(),
            client,
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl Predictor for GeminiClient {
    fn predict(&self, inputs: &PredictionInputs) -> Result<PredictionResult, PredictionError> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Err(PredictionError::CredentialMissing);
        };

        let body = build_request_body(inputs);
        let resp = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(PredictionError::Status {
                code: status.as_u16(),
                message: error_message(&text),
            });
        }
        parse_generate_content_json(&text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Pull the prediction out of a `generateContent` response body.
pub fn parse_generate_content_json(raw: &str) -> Result<PredictionResult, PredictionError> {
    let resp: GenerateContentResponse = serde_json::from_str(raw.trim()).map_err(|err| {
        PredictionError::InvalidResponseShape(format!("invalid generateContent json: {err}"))
    })?;

    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(PredictionError::InvalidResponseShape(format!(
            "prompt blocked: {reason}"
        )));
    }

    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(PredictionError::InvalidResponseShape(
            "response has no candidates".to_string(),
        ));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();
    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(PredictionError::InvalidResponseShape(format!(
            "candidate has no text (finish reason {reason})"
        )));
    }

    parse_prediction_json(&text)
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => match (env.error.status, env.error.message) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => truncate(body),
        },
        Err(_) => truncate(body),
    }
}

fn truncate(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_CHARS).collect();
    out.push_str("...");
    out
}
