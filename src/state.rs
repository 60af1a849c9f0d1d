use std::collections::VecDeque;

use chrono::Local;

use crate::error::PredictionError;
use crate::inputs::{FormError, FormField, InputForm, PredictionInputs};
use crate::result::PredictionResult;

pub const PREDICTION_FAILED_MESSAGE: &str =
    "Failed to generate prediction. Please ensure you have a valid API Key and try again.";

/// Logged after failures caused by a missing or rejected key.
pub const CREDENTIAL_HINT: &str = "[WARN] Check GEMINI_API_KEY in the environment or .env.local";

const MAX_LOGS: usize = 200;

/// Token identifying one submission. Allocated in increasing order.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub form: InputForm,
    pub field_errors: Vec<FormError>,
    pub result: Option<PredictionResult>,
    pub last_inputs: Option<PredictionInputs>,
    pub loading: bool,
    pub error: Option<String>,
    pub inflight: Option<RequestId>,
    pub next_request_id: RequestId,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub model_label: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            form: InputForm::new(),
            field_errors: Vec::new(),
            result: None,
            last_inputs: None,
            loading: false,
            error: None,
            inflight: None,
            next_request_id: 1,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            model_label: String::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Errored
        } else if self.result.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }

    /// Handle the submit control. Returns the command to hand to the worker, or
    /// `None` when nothing should be requested (busy, or the form is incomplete).
    pub fn submit(&mut self) -> Option<ProviderCommand> {
        if self.loading {
            self.push_log("[INFO] Prediction already running");
            return None;
        }
        let inputs = match self.form.submit() {
            Ok(inputs) => inputs,
            Err(errors) => {
                let fields = errors
                    .iter()
                    .map(|e| e.field().label())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.push_log(format!("[INFO] Missing required fields: {fields}"));
                self.field_errors = errors;
                return None;
            }
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.field_errors.clear();
        self.loading = true;
        self.error = None;
        self.inflight = Some(request_id);
        self.push_log(format!(
            "[INFO] Prediction #{request_id} requested for {} vs {}",
            inputs.batsman_name, inputs.opponent_team
        ));
        Some(ProviderCommand::Predict { request_id, inputs })
    }

    /// Abandon the in-flight request. Its outcome will be discarded when it lands.
    pub fn cancel(&mut self) -> Option<ProviderCommand> {
        let request_id = self.inflight.take()?;
        self.loading = false;
        self.push_log(format!("[INFO] Prediction #{request_id} cancelled"));
        Some(ProviderCommand::Cancel { request_id })
    }

    pub fn field_error(&self, field: FormField) -> Option<FormError> {
        self.field_errors.iter().copied().find(|e| e.field() == field)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    PredictionReady {
        request_id: RequestId,
        inputs: PredictionInputs,
        result: PredictionResult,
    },
    PredictionFailed {
        request_id: RequestId,
        error: PredictionError,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Predict {
        request_id: RequestId,
        inputs: PredictionInputs,
    },
    Cancel {
        request_id: RequestId,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::PredictionReady {
            request_id,
            inputs,
            result,
        } => {
            if state.inflight != Some(request_id) {
                state.push_log(format!("[INFO] Dropped stale prediction #{request_id}"));
                return;
            }
            state.inflight = None;
            state.loading = false;
            state.push_log(format!(
                "[INFO] Prediction #{request_id} ready: avg {} runs, risk {}",
                result.expected_runs.avg,
                result.risk_level.label()
            ));
            state.result = Some(result);
            state.last_inputs = Some(inputs);
        }
        Delta::PredictionFailed { request_id, error } => {
            if state.inflight != Some(request_id) {
                state.push_log(format!(
                    "[INFO] Dropped stale failure #{request_id}: {error}"
                ));
                return;
            }
            state.inflight = None;
            state.loading = false;
            state.push_log(format!("[WARN] Prediction #{request_id} failed: {error}"));
            if error.is_credential_problem() {
                state.push_log(CREDENTIAL_HINT);
            }
            state.error = Some(PREDICTION_FAILED_MESSAGE.to_string());
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
