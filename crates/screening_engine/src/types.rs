use std::fmt;

use bytes::Bytes;
use screening_core::SchemaError;

pub type JobId = u64;

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub model_loaded: Option<bool>,
}

/// One resume handed over by file intake, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_description: String,
    /// Sent only when positive.
    pub top_n: Option<u32>,
    pub files: Vec<ResumeFile>,
}

/// Downloadable export result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid response body: {0}")]
    InvalidBody(String),
    #[error("analysis failed: {0}")]
    Schema(#[from] SchemaError),
}

impl BackendError {
    /// Whether asking the user to try again can help.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Transport(_) => true,
            BackendError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            BackendError::InvalidBody(_) | BackendError::Schema(_) => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Which backend call an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    Parse,
    Export,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Health => write!(f, "health"),
            Operation::Parse => write!(f, "parse"),
            Operation::Export => write!(f, "export"),
        }
    }
}
