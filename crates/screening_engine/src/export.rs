use std::path::{Path, PathBuf};

use bytes::Bytes;
use screening_core::{Candidate, ExportFormat};
use serde::Serialize;
use serde_json::Value;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::{BackendError, ExportArtifact};

/// Base name of every downloaded artifact.
pub const EXPORT_BASENAME: &str = "resume_screening_results";

pub const CSV_HEADER: [&str; 10] = [
    "Name",
    "FinalScore",
    "Semantic",
    "Overlap",
    "YearsExperience",
    "Education",
    "MatchedSkills",
    "MissingSkills",
    "Extras",
    "SourceFilename",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export request failed: {0}")]
    Backend(#[from] BackendError),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

impl ExportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExportError::Backend(err) if err.is_retryable())
    }
}

/// What the results view asked to export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub job_description: String,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload<'a> {
    pub candidates: Vec<ExportCandidate<'a>>,
    pub format: &'static str,
    pub job_description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ExportCandidate<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub location: Option<&'a str>,
    pub education: Option<&'a str>,
    pub years_experience: f64,
    pub source_filename: Option<&'a str>,
    #[serde(rename = "match")]
    pub scores: ExportScores,
    pub authenticity: ExportAuthenticity<'a>,
    pub skills: ExportSkills<'a>,
    pub evidence: &'a [Value],
    pub highlights: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct ExportScores {
    pub final_score: f64,
    pub overlap: f64,
    pub semantic: f64,
}

#[derive(Debug, Serialize)]
pub struct ExportAuthenticity<'a> {
    /// Unknown authenticity is sent as 0.
    pub score: f64,
    pub flags: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct ExportSkills<'a> {
    pub matched: &'a [String],
    pub missing: &'a [String],
    pub extras: &'a [String],
}

impl<'a> ExportCandidate<'a> {
    pub fn from_candidate(c: &'a Candidate) -> Self {
        Self {
            id: &c.id,
            name: &c.name,
            email: c.email.as_deref(),
            phone: c.phone.as_deref(),
            location: c.location.as_deref(),
            education: c.education.as_deref(),
            years_experience: c.years_of_experience,
            source_filename: c.source_filename.as_deref(),
            scores: ExportScores {
                final_score: c.overall_score,
                overlap: c.overlap_score,
                semantic: c.semantic_score,
            },
            authenticity: ExportAuthenticity {
                score: c.authenticity_score.unwrap_or(0.0),
                flags: &c.authenticity_flags,
            },
            skills: ExportSkills {
                matched: &c.matched_skills,
                missing: &c.missing_skills,
                extras: &c.extra_skills,
            },
            evidence: &c.evidence,
            highlights: &c.highlights,
        }
    }
}

/// JSON body for the backend export endpoint.
pub fn build_export_payload<'a>(
    candidates: &'a [Candidate],
    job_description: &'a str,
    format: ExportFormat,
) -> ExportPayload<'a> {
    ExportPayload {
        candidates: candidates.iter().map(ExportCandidate::from_candidate).collect(),
        format: format.wire_name(),
        job_description,
    }
}

/// Local delimited-text export. Every data field is quoted and embedded
/// quotes are doubled; list fields are joined with `", "`.
pub fn build_csv(candidates: &[Candidate]) -> Result<String, ExportError> {
    let mut header = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header
        .write_record(CSV_HEADER)
        .map_err(|err| ExportError::Csv(err.to_string()))?;
    let buffer = header
        .into_inner()
        .map_err(|err| ExportError::Csv(err.to_string()))?;

    let mut rows = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);
    for c in candidates {
        rows.write_record([
            c.name.clone(),
            c.overall_score.to_string(),
            c.semantic_score.to_string(),
            c.overlap_score.to_string(),
            c.years_of_experience.to_string(),
            c.education.clone().unwrap_or_default(),
            c.matched_skills.join(", "),
            c.missing_skills.join(", "),
            c.extra_skills.join(", "),
            c.source_filename.clone().unwrap_or_default(),
        ])
        .map_err(|err| ExportError::Csv(err.to_string()))?;
    }
    let bytes = rows
        .into_inner()
        .map_err(|err| ExportError::Csv(err.to_string()))?;

    let mut text = String::from_utf8(bytes).map_err(|err| ExportError::Csv(err.to_string()))?;
    // Rows are joined by newlines, without a trailing one.
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub fn csv_artifact(candidates: &[Candidate]) -> Result<ExportArtifact, ExportError> {
    let text = build_csv(candidates)?;
    Ok(ExportArtifact {
        filename: artifact_filename(ExportFormat::Csv),
        content_type: ExportFormat::Csv.content_type().to_string(),
        bytes: Bytes::from(text.into_bytes()),
    })
}

pub fn artifact_filename(format: ExportFormat) -> String {
    format!("{EXPORT_BASENAME}.{}", format.file_extension())
}

/// Writes an artifact into `dir`, replacing any previous file of the same name.
pub fn save_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    Ok(writer.write(&artifact.filename, &artifact.bytes)?)
}
