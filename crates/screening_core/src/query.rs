use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::Candidate;

/// Fixed number of candidates shown per results page.
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Overall,
    Semantic,
    Overlap,
}

impl SortKey {
    pub fn score(self, candidate: &Candidate) -> f64 {
        match self {
            SortKey::Overall => candidate.overall_score,
            SortKey::Semantic => candidate.semantic_score,
            SortKey::Overlap => candidate.overlap_score,
        }
    }
}

/// View-local query state. Never mutates the candidate list it is applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub search: String,
    pub sort_key: SortKey,
    pub min_score: f64,
    /// 1-based.
    pub page: usize,
    selected: BTreeSet<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: SortKey::default(),
            min_score: 0.0,
            page: 1,
            selected: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<'a> {
    pub page: Vec<&'a Candidate>,
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if selected {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    pub fn toggle(&mut self, id: &str) {
        let selected = !self.is_selected(id);
        self.set_selected(id, selected);
    }

    /// True when the selection is exactly the set of visible ids.
    pub fn visible_fully_selected(&self, visible_ids: &[&str]) -> bool {
        !visible_ids.is_empty()
            && self.selected.len() == visible_ids.len()
            && visible_ids.iter().all(|id| self.selected.contains(*id))
    }

    /// "Select all" acts on the visible page only: when the selection already
    /// equals the visible ids it is cleared, otherwise it is replaced by them.
    pub fn toggle_select_all_visible(&mut self, visible_ids: &[&str]) {
        if self.visible_fully_selected(visible_ids) {
            self.selected.clear();
        } else {
            self.selected = visible_ids.iter().map(|id| (*id).to_string()).collect();
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        matches_search(candidate, &self.search) && candidate.overall_score >= self.min_score
    }
}

/// Filter, sort and paginate in one pass.
pub fn apply<'a>(candidates: &'a [Candidate], state: &QueryState) -> QueryPage<'a> {
    let filtered = filter_and_sort(candidates, state);
    let filtered_count = filtered.len();
    QueryPage {
        page: page_slice(&filtered, state.page).to_vec(),
        total_pages: total_pages(filtered_count),
        filtered_count,
    }
}

/// Matching candidates ordered by the selected score, highest first.
/// Equal scores keep their input order.
pub fn filter_and_sort<'a>(candidates: &'a [Candidate], state: &QueryState) -> Vec<&'a Candidate> {
    let mut filtered: Vec<&Candidate> = candidates.iter().filter(|c| state.matches(c)).collect();
    let key = state.sort_key;
    // `sort_by` is stable.
    filtered.sort_by(|a, b| {
        key.score(b)
            .partial_cmp(&key.score(a))
            .unwrap_or(Ordering::Equal)
    });
    filtered
}

/// Candidates handed to export: the selected ones among the filtered list,
/// or the whole filtered list when nothing is selected.
pub fn export_subset(candidates: &[Candidate], state: &QueryState) -> Vec<Candidate> {
    let filtered = filter_and_sort(candidates, state);
    if state.selected.is_empty() {
        filtered.into_iter().cloned().collect()
    } else {
        filtered
            .into_iter()
            .filter(|c| state.selected.contains(&c.id))
            .cloned()
            .collect()
    }
}

pub fn total_pages(filtered_count: usize) -> usize {
    filtered_count.div_ceil(PAGE_SIZE)
}

/// Items on the 1-based `page`; empty when out of range.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let Some(index) = page.checked_sub(1) else {
        return &[];
    };
    let start = index.saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

fn matches_search(candidate: &Candidate, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    candidate.name.to_lowercase().contains(&needle)
        || candidate
            .matched_skills
            .iter()
            .any(|skill| skill.to_lowercase().contains(&needle))
}
