use thiserror::Error;

/// Why a prediction could not be produced. The controller collapses all of these
/// into one user-facing message; the cause is kept for the console log and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("no API key configured")]
    CredentialMissing,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned http {code}: {message}")]
    Status { code: u16, message: String },

    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),
}

impl PredictionError {
    pub fn is_credential_problem(&self) -> bool {
        match self {
            PredictionError::CredentialMissing => true,
            PredictionError::Status { code, .. } => matches!(code, 400 | 401 | 403),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        PredictionError::Transport(err.to_string())
    }
}
