//! Backend payload normalization.
//!
//! The scoring backend has shipped two candidate shapes: a *nested* one that
//! groups scores under `match`, skills under `skills` and authenticity under
//! `authenticity`, and a *flat* one that carries the canonical field names at
//! the top level. The response envelope drifts the same way (`meta`/`jd`/
//! `selection`/`stats` versus a ready-made `summary`). Each record is probed
//! once, then read by the matching dialect reader; every missing or mistyped
//! field falls back to a fixed default.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::model::{Candidate, MissingSkill, ParseResult, Summary, UNKNOWN_JOB_TITLE, UNKNOWN_NAME};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("payload is not a JSON object (found {0})")]
    NotAnObject(&'static str),
}

/// Known candidate record shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Nested,
    Flat,
}

impl Dialect {
    /// A record is nested as soon as `match` or `skills` is an object.
    pub fn detect(record: &Map<String, Value>) -> Self {
        let nested = ["match", "skills"]
            .iter()
            .any(|key| record.get(*key).is_some_and(Value::is_object));
        if nested {
            Dialect::Nested
        } else {
            Dialect::Flat
        }
    }
}

/// Parses raw response text and normalizes it into a [`ParseResult`].
pub fn parse_payload(text: &str) -> Result<ParseResult, SchemaError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|err| SchemaError::InvalidJson(err.to_string()))?;
    normalize_result(&raw)
}

/// Normalizes the shortlisted candidates of a raw payload.
pub fn normalize(raw: &Value) -> Result<Vec<Candidate>, SchemaError> {
    let envelope = as_object(raw)?;
    Ok(normalize_list(shortlist_value(envelope)))
}

/// Normalizes a full raw payload, summary included.
pub fn normalize_result(raw: &Value) -> Result<ParseResult, SchemaError> {
    let envelope = as_object(raw)?;
    let shortlisted_candidates = normalize_list(shortlist_value(envelope));
    let all_candidates = envelope
        .get("all_candidates")
        .filter(|value| value.is_array())
        .map(|value| normalize_list(Some(value)));

    let shortlist_len = shortlisted_candidates.len() as u64;
    let (summary, top_missing_skills) = match envelope.get("summary").and_then(Value::as_object) {
        Some(summary) => (
            flat_summary(summary, shortlist_len),
            missing_skills(envelope.get("top_missing_skills")),
        ),
        None => {
            let stats = object_at(envelope, "stats");
            (
                nested_summary(envelope, shortlist_len),
                missing_skills(stats.and_then(|s| s.get("top_missing_skills"))),
            )
        }
    };

    Ok(ParseResult {
        summary,
        shortlisted_candidates,
        all_candidates,
        top_missing_skills,
    })
}

/// Normalizes one raw record. `position` seeds the synthesized id when the
/// record carries neither `id` nor `source_filename`.
pub fn normalize_candidate(position: usize, raw: &Value) -> Candidate {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);
    let source_filename = string_at(record, "source_filename");

    let id = string_at(record, "id")
        .or_else(|| source_filename.clone())
        .unwrap_or_else(|| synthesize_id(position, raw));
    let name = string_at(record, "name")
        .or_else(|| source_filename.clone())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let mut candidate = Candidate {
        id,
        name,
        email: string_at(record, "email"),
        phone: string_at(record, "phone"),
        location: string_at(record, "location"),
        years_of_experience: 0.0,
        education: string_at(record, "education"),
        matched_skills: Vec::new(),
        missing_skills: Vec::new(),
        extra_skills: Vec::new(),
        overall_score: 0.0,
        semantic_score: 0.0,
        overlap_score: 0.0,
        authenticity_score: None,
        authenticity_flags: Vec::new(),
        highlights: strings_at(record, "highlights"),
        evidence: evidence_at(record),
        source_filename,
    };

    match Dialect::detect(record) {
        Dialect::Nested => read_nested(record, &mut candidate),
        Dialect::Flat => read_flat(record, &mut candidate),
    }
    candidate
}

/// Renders a canonical candidate back into a raw record of the given dialect.
pub fn to_raw(candidate: &Candidate, dialect: Dialect) -> Value {
    let mut record = json!({
        "id": candidate.id,
        "name": candidate.name,
        "email": candidate.email,
        "phone": candidate.phone,
        "location": candidate.location,
        "education": candidate.education,
        "highlights": candidate.highlights,
        "evidence": candidate.evidence,
        "source_filename": candidate.source_filename,
    });
    let extra = match dialect {
        Dialect::Nested => json!({
            "years_experience": candidate.years_of_experience,
            "skills": {
                "matched": candidate.matched_skills,
                "missing": candidate.missing_skills,
                "extras": candidate.extra_skills,
            },
            "match": {
                "final_score": candidate.overall_score,
                "semantic": candidate.semantic_score,
                "overlap": candidate.overlap_score,
            },
            "authenticity": {
                "score": candidate.authenticity_score,
                "flags": candidate.authenticity_flags,
            },
        }),
        Dialect::Flat => json!({
            "years_of_experience": candidate.years_of_experience,
            "matched_skills": candidate.matched_skills,
            "missing_skills": candidate.missing_skills,
            "extra_skills": candidate.extra_skills,
            "overall_score": candidate.overall_score,
            "semantic_score": candidate.semantic_score,
            "overlap_score": candidate.overlap_score,
            "authenticity_score": candidate.authenticity_score,
            "authenticity_flags": candidate.authenticity_flags,
        }),
    };
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), extra) {
        target.extend(fields);
    }
    record
}

fn read_nested(record: &Map<String, Value>, candidate: &mut Candidate) {
    let scores = object_at(record, "match");
    let skills = object_at(record, "skills");
    let authenticity = object_at(record, "authenticity");

    candidate.overall_score = scores
        .and_then(|m| number_at(m, "final_score").or_else(|| number_at(m, "final")))
        .unwrap_or(0.0);
    candidate.semantic_score = scores.and_then(|m| number_at(m, "semantic")).unwrap_or(0.0);
    candidate.overlap_score = scores.and_then(|m| number_at(m, "overlap")).unwrap_or(0.0);
    if let Some(skills) = skills {
        candidate.matched_skills = strings_at(skills, "matched");
        candidate.missing_skills = strings_at(skills, "missing");
        candidate.extra_skills = strings_at(skills, "extras");
    }
    if let Some(authenticity) = authenticity {
        candidate.authenticity_score = number_at(authenticity, "score");
        candidate.authenticity_flags = strings_at(authenticity, "flags");
    }
    candidate.years_of_experience = number_at(record, "years_experience").unwrap_or(0.0);
}

fn read_flat(record: &Map<String, Value>, candidate: &mut Candidate) {
    candidate.overall_score = number_at(record, "overall_score").unwrap_or(0.0);
    candidate.semantic_score = number_at(record, "semantic_score").unwrap_or(0.0);
    candidate.overlap_score = number_at(record, "overlap_score").unwrap_or(0.0);
    candidate.matched_skills = strings_at(record, "matched_skills");
    candidate.missing_skills = strings_at(record, "missing_skills");
    candidate.extra_skills = strings_at(record, "extra_skills");
    candidate.authenticity_score = number_at(record, "authenticity_score");
    candidate.authenticity_flags = strings_at(record, "authenticity_flags");
    candidate.years_of_experience = number_at(record, "years_of_experience")
        .or_else(|| number_at(record, "years_experience"))
        .unwrap_or(0.0);
}

fn normalize_list(raw: Option<&Value>) -> Vec<Candidate> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut seen = HashSet::with_capacity(items.len());
    let mut candidates = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let mut candidate = normalize_candidate(position, item);
        if seen.contains(&candidate.id) {
            let base = candidate.id.clone();
            let mut suffix = 2usize;
            while seen.contains(&format!("{base}-{suffix}")) {
                suffix += 1;
            }
            candidate.id = format!("{base}-{suffix}");
            screening_logging::screening_debug!(
                "Duplicate candidate id {} at position {} renamed to {}",
                base,
                position,
                candidate.id
            );
        }
        seen.insert(candidate.id.clone());
        candidates.push(candidate);
    }
    candidates
}

fn shortlist_value(envelope: &Map<String, Value>) -> Option<&Value> {
    envelope
        .get("shortlisted")
        .filter(|value| value.is_array())
        .or_else(|| envelope.get("shortlisted_candidates"))
}

fn flat_summary(summary: &Map<String, Value>, shortlist_len: u64) -> Summary {
    Summary {
        job_title: string_at(summary, "job_title").unwrap_or_else(|| UNKNOWN_JOB_TITLE.to_string()),
        total_candidates: count_at(summary, "total_candidates").unwrap_or(shortlist_len),
        shortlisted_count: count_at(summary, "shortlisted_count").unwrap_or(shortlist_len),
        avg_match_score: number_at(summary, "avg_match_score").unwrap_or(0.0),
        model_name: string_at(summary, "model_name").unwrap_or_default(),
        request_id: string_at(summary, "request_id").unwrap_or_default(),
    }
}

fn nested_summary(envelope: &Map<String, Value>, shortlist_len: u64) -> Summary {
    let meta = object_at(envelope, "meta");
    let jd = object_at(envelope, "jd");
    let selection = object_at(envelope, "selection");
    let stats = object_at(envelope, "stats");

    Summary {
        job_title: jd
            .and_then(|jd| string_at(jd, "title_guess"))
            .unwrap_or_else(|| UNKNOWN_JOB_TITLE.to_string()),
        total_candidates: selection
            .and_then(|s| count_at(s, "total_candidates"))
            .unwrap_or(shortlist_len),
        shortlisted_count: selection
            .and_then(|s| count_at(s, "shortlisted_count"))
            .unwrap_or(shortlist_len),
        avg_match_score: stats.and_then(|s| number_at(s, "avg_match")).unwrap_or(0.0),
        model_name: meta
            .and_then(|m| object_at(m, "model"))
            .and_then(|model| string_at(model, "embedding"))
            .unwrap_or_default(),
        request_id: meta
            .and_then(|m| string_at(m, "request_id"))
            .unwrap_or_default(),
    }
}

fn missing_skills(raw: Option<&Value>) -> Vec<MissingSkill> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(skill) => Some(MissingSkill {
                skill: skill.clone(),
                frequency: 0,
            }),
            Value::Object(entry) => string_at(entry, "skill").map(|skill| MissingSkill {
                skill,
                frequency: count_at(entry, "frequency").unwrap_or(0),
            }),
            _ => None,
        })
        .collect()
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>, SchemaError> {
    raw.as_object()
        .ok_or_else(|| SchemaError::NotAnObject(json_kind(raw)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn object_at<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// Trimmed, non-empty string value.
fn string_at(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn number_at(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
}

/// Non-negative whole number; `25.0` counts as 25.
fn count_at(map: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = map.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    })
}

/// String entries of an array; non-string entries are dropped.
fn strings_at(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn evidence_at(map: &Map<String, Value>) -> Vec<Value> {
    map.get("evidence")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|item| item.is_object()).cloned().collect())
        .unwrap_or_default()
}

/// Deterministic `cand-<hex>` token derived from the record and its position.
fn synthesize_id(position: usize, raw: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(position.to_le_bytes());
    hasher.update(raw.to_string().as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    format!("cand-{hex}")
}
