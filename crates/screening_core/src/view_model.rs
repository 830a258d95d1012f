use crate::Candidate;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsViewModel {
    /// False while no stored result is available (loading/empty state).
    pub loaded: bool,
    pub title: String,
    pub header_line: String,
    pub rows: Vec<CandidateRowView>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub selected_count: usize,
    pub select_all_label: &'static str,
    pub export_enabled: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRowView {
    pub id: String,
    pub name: String,
    pub overall_score: f64,
    pub semantic_score: f64,
    pub overlap_score: f64,
    pub years_of_experience: f64,
    pub matched_skills: Vec<String>,
    pub selected: bool,
}

impl CandidateRowView {
    pub fn from_candidate(candidate: &Candidate, selected: bool) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            overall_score: candidate.overall_score,
            semantic_score: candidate.semantic_score,
            overlap_score: candidate.overlap_score,
            years_of_experience: candidate.years_of_experience,
            matched_skills: candidate.matched_skills.clone(),
            selected,
        }
    }
}

/// User-visible outcome of the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub is_error: bool,
}
