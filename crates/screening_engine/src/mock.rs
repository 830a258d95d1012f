use screening_core::{parse_payload, ParseResult};
use screening_logging::screening_info;

use crate::client::Backend;
use crate::export::{csv_artifact, ExportError, ExportRequest};
use crate::types::{BackendError, ExportArtifact, HealthStatus, Submission};

/// Fixed sample analysis used in mock mode.
pub const SAMPLE_PAYLOAD: &str = include_str!("fixtures/sample_parse.json");

pub fn sample_result() -> Result<ParseResult, BackendError> {
    Ok(parse_payload(SAMPLE_PAYLOAD)?)
}

/// Offline stand-in for every backend call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

#[async_trait::async_trait]
impl Backend for MockBackend {
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        Ok(HealthStatus {
            ok: true,
            model_loaded: Some(true),
        })
    }

    async fn parse(&self, submission: &Submission) -> Result<ParseResult, BackendError> {
        screening_info!(
            "Mock mode: returning sample analysis instead of uploading {} resume(s)",
            submission.files.len()
        );
        sample_result()
    }

    /// Mock mode always answers with local CSV, whatever format was asked for.
    async fn export(&self, request: &ExportRequest) -> Result<ExportArtifact, ExportError> {
        screening_info!(
            "Mock mode: building CSV locally for {} candidate(s)",
            request.candidates.len()
        );
        csv_artifact(&request.candidates)
    }
}
