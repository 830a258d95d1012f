use crate::view_model::Notice;
use crate::{Effect, ExportOutcome, Msg, ResultsState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ResultsState, msg: Msg) -> (ResultsState, Vec<Effect>) {
    let effects = match msg {
        Msg::ResultLoaded(result) => {
            state.set_result(result);
            Vec::new()
        }
        Msg::SearchChanged(search) => {
            let query = state.query_mut();
            query.search = search;
            query.page = 1;
            Vec::new()
        }
        Msg::SortChanged(sort_key) => {
            let query = state.query_mut();
            query.sort_key = sort_key;
            query.page = 1;
            Vec::new()
        }
        Msg::MinScoreChanged(min_score) => {
            let query = state.query_mut();
            query.min_score = if min_score.is_finite() { min_score } else { 0.0 };
            query.page = 1;
            Vec::new()
        }
        Msg::PageSelected(page) => {
            state.query_mut().page = page.max(1);
            Vec::new()
        }
        Msg::CandidateSelected { id, selected } => {
            state.query_mut().set_selected(&id, selected);
            Vec::new()
        }
        Msg::CandidateToggled { id } => {
            state.query_mut().toggle(&id);
            Vec::new()
        }
        Msg::SelectAllVisibleToggled => {
            let visible = state.visible_ids();
            let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
            state.query_mut().toggle_select_all_visible(&visible);
            Vec::new()
        }
        Msg::ExportRequested(format) => {
            // The export control stays disabled until the running export reports back.
            if state.export_in_flight() || state.result().is_none() {
                return (state, Vec::new());
            }
            let candidates = state.export_subset();
            let job_description = state.job_description();
            state.begin_export();
            vec![Effect::Export {
                format,
                job_description,
                candidates,
            }]
        }
        Msg::ExportFinished(outcome) => {
            state.finish_export(export_notice(outcome));
            Vec::new()
        }
    };

    (state, effects)
}

fn export_notice(outcome: ExportOutcome) -> Notice {
    match outcome {
        ExportOutcome::Saved { filename, byte_len } => Notice {
            title: "Export successful".to_string(),
            description: format!("Results exported to {filename} ({byte_len} bytes)."),
            is_error: false,
        },
        ExportOutcome::Failed { message, retryable } => Notice {
            title: "Export failed".to_string(),
            description: if retryable {
                format!("{message}. Please try again.")
            } else {
                message
            },
            is_error: true,
        },
    }
}
