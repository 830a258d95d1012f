use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_JOB_TITLE: &str = "Unknown";

/// Canonical candidate: the only shape the query, view and export layers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_of_experience: f64,
    pub education: Option<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    pub overall_score: f64,
    pub semantic_score: f64,
    pub overlap_score: f64,
    pub authenticity_score: Option<f64>,
    pub authenticity_flags: Vec<String>,
    pub highlights: Vec<String>,
    pub evidence: Vec<Value>,
    pub source_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub job_title: String,
    pub total_candidates: u64,
    pub shortlisted_count: u64,
    pub avg_match_score: f64,
    pub model_name: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill: String,
    pub frequency: u64,
}

/// A completed analysis, normalized from whichever payload dialect the backend sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub summary: Summary,
    pub shortlisted_candidates: Vec<Candidate>,
    pub all_candidates: Option<Vec<Candidate>>,
    pub top_missing_skills: Vec<MissingSkill>,
}
