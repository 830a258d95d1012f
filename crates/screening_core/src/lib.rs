//! Screening core: canonical candidate model, payload normalization, and the
//! pure results-view state machine.
mod effect;
mod model;
mod msg;
mod normalize;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, ExportFormat};
pub use model::{Candidate, MissingSkill, ParseResult, Summary, UNKNOWN_JOB_TITLE, UNKNOWN_NAME};
pub use msg::{ExportOutcome, Msg};
pub use normalize::{
    normalize, normalize_candidate, normalize_result, parse_payload, to_raw, Dialect, SchemaError,
};
pub use query::{
    apply, export_subset, filter_and_sort, page_slice, total_pages, QueryPage, QueryState, SortKey,
    PAGE_SIZE,
};
pub use state::{ResultsState, FALLBACK_JOB_DESCRIPTION};
pub use update::update;
pub use view_model::{CandidateRowView, Notice, ResultsViewModel};
