use crate::query::{self, QueryState};
use crate::view_model::{CandidateRowView, Notice, ResultsViewModel};
use crate::{Candidate, ParseResult};

/// Job description sent with exports when the result carries no title.
pub const FALLBACK_JOB_DESCRIPTION: &str = "Job";

/// State owned by one mounted results view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsState {
    result: Option<ParseResult>,
    query: QueryState,
    export_in_flight: bool,
    notice: Option<Notice>,
}

impl ResultsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> Option<&ParseResult> {
        self.result.as_ref()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn export_in_flight(&self) -> bool {
        self.export_in_flight
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.result
            .as_ref()
            .map(|r| r.shortlisted_candidates.as_slice())
            .unwrap_or(&[])
    }

    pub fn job_description(&self) -> String {
        self.result
            .as_ref()
            .map(|r| r.summary.job_title.trim())
            .filter(|title| !title.is_empty())
            .unwrap_or(FALLBACK_JOB_DESCRIPTION)
            .to_string()
    }

    pub fn visible_ids(&self) -> Vec<String> {
        query::apply(self.candidates(), &self.query)
            .page
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn export_subset(&self) -> Vec<Candidate> {
        query::export_subset(self.candidates(), &self.query)
    }

    pub fn view(&self) -> ResultsViewModel {
        let Some(result) = &self.result else {
            return ResultsViewModel {
                notice: self.notice.clone(),
                ..ResultsViewModel::default()
            };
        };

        let page = query::apply(&result.shortlisted_candidates, &self.query);
        let visible: Vec<&str> = page.page.iter().map(|c| c.id.as_str()).collect();
        let all_visible_selected = self.query.visible_fully_selected(&visible);
        let rows = page
            .page
            .iter()
            .map(|c| CandidateRowView::from_candidate(c, self.query.is_selected(&c.id)))
            .collect();
        let summary = &result.summary;

        ResultsViewModel {
            loaded: true,
            title: summary.job_title.clone(),
            header_line: format!(
                "{} of {} candidates | Avg Match: {:.1}% | Model: {}",
                summary.shortlisted_count,
                summary.total_candidates,
                summary.avg_match_score,
                summary.model_name
            ),
            rows,
            page: self.query.page,
            total_pages: page.total_pages,
            filtered_count: page.filtered_count,
            selected_count: self.query.selected().len(),
            select_all_label: if all_visible_selected {
                "Deselect All"
            } else {
                "Select All"
            },
            export_enabled: !self.export_in_flight,
            notice: self.notice.clone(),
        }
    }

    pub(crate) fn set_result(&mut self, result: Option<ParseResult>) {
        self.result = result;
        self.query = QueryState::new();
    }

    pub(crate) fn query_mut(&mut self) -> &mut QueryState {
        &mut self.query
    }

    pub(crate) fn begin_export(&mut self) {
        self.export_in_flight = true;
        self.notice = None;
    }

    pub(crate) fn finish_export(&mut self, notice: Notice) {
        self.export_in_flight = false;
        self.notice = Some(notice);
    }
}
