use crate::{ExportFormat, ParseResult, SortKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Stored result read for the view; `None` keeps the loading/empty state.
    ResultLoaded(Option<ParseResult>),
    /// User edited the search box.
    SearchChanged(String),
    /// User picked a sort field.
    SortChanged(SortKey),
    /// User edited the minimum overall score.
    MinScoreChanged(f64),
    /// User clicked a page button (1-based).
    PageSelected(usize),
    /// User ticked or unticked one candidate.
    CandidateSelected { id: String, selected: bool },
    /// Keyboard toggle of one candidate.
    CandidateToggled { id: String },
    /// User clicked Select All / Deselect All.
    SelectAllVisibleToggled,
    /// User picked an export format.
    ExportRequested(ExportFormat),
    /// Engine finished an export.
    ExportFinished(ExportOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { filename: String, byte_len: usize },
    Failed { message: String, retryable: bool },
}
