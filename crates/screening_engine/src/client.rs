use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use screening_core::{normalize_result, ParseResult, SchemaError};
use screening_logging::{screening_debug, screening_info, screening_warn};

use crate::config::ClientConfig;
use crate::export::{artifact_filename, build_export_payload, csv_artifact, ExportError, ExportRequest};
use crate::types::{BackendError, ExportArtifact, HealthStatus, Submission};

/// The three calls the scoring backend offers.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, BackendError>;

    async fn parse(&self, submission: &Submission) -> Result<ParseResult, BackendError>;

    async fn export(&self, request: &ExportRequest) -> Result<ExportArtifact, ExportError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, BackendError> {
        // Only the connect phase is bounded; a request in flight is always awaited.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<HealthStatus, BackendError> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = success_body(response).await?;
        serde_json::from_slice(&body).map_err(|err| BackendError::InvalidBody(err.to_string()))
    }

    async fn parse(&self, submission: &Submission) -> Result<ParseResult, BackendError> {
        let mut form = Form::new().text("jd", submission.job_description.clone());
        if let Some(top_n) = submission.top_n.filter(|n| *n > 0) {
            form = form.text("top_n", top_n.to_string());
        }
        for file in &submission.files {
            let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
            form = form.part("resumes", part);
        }

        screening_info!(
            "Submitting {} resume(s) for analysis to {}",
            submission.files.len(),
            self.config.parse_url()
        );
        let response = self
            .client
            .post(self.config.parse_url())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = success_body(response).await?;
        let raw: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|err| SchemaError::InvalidJson(err.to_string()))?;
        let result = normalize_result(&raw)?;
        screening_info!(
            "Analysis returned {} shortlisted candidate(s)",
            result.shortlisted_candidates.len()
        );
        Ok(result)
    }

    async fn export(&self, request: &ExportRequest) -> Result<ExportArtifact, ExportError> {
        if !request.format.is_backend_rendered() {
            return csv_artifact(&request.candidates);
        }

        let payload =
            build_export_payload(&request.candidates, &request.job_description, request.format);
        let body = serde_json::to_vec(&payload)
            .map_err(|err| BackendError::InvalidBody(err.to_string()))?;
        screening_debug!(
            "Export payload for {} candidate(s), {} bytes",
            request.candidates.len(),
            body.len()
        );

        let response = self
            .client
            .post(self.config.export_url())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| request.format.content_type().to_string());
        let bytes = success_body(response).await?;

        Ok(ExportArtifact {
            filename: artifact_filename(request.format),
            content_type,
            bytes,
        })
    }
}

/// Body of a 2xx response; anything else becomes `HttpStatus` with the body text.
async fn success_body(response: reqwest::Response) -> Result<Bytes, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        screening_warn!("Backend answered {}: {}", status, body);
        return Err(BackendError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }
    response.bytes().await.map_err(map_reqwest_error)
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Transport(format!("timed out: {err}"));
    }
    BackendError::Transport(err.to_string())
}
