use std::fmt::Write;

use screening_core::{Notice, ResultsViewModel};

pub const NO_RESULTS: &str = "No results found for this request. Run `screening parse` first.";

/// Plain-text rendering of one results page.
pub fn render_results(view: &ResultsViewModel) -> String {
    if !view.loaded {
        return NO_RESULTS.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.header_line);
    let _ = writeln!(out);

    if view.rows.is_empty() {
        let _ = writeln!(out, "No candidates match the current filters.");
    }
    for row in &view.rows {
        let mark = if row.selected { "[x]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "{mark} {:<28} {:>6.1} {:>6.1} {:>6.1} {:>5.1}y  {}  ({})",
            row.name,
            row.overall_score,
            row.semantic_score,
            row.overlap_score,
            row.years_of_experience,
            row.matched_skills.join(", "),
            row.id
        );
    }

    let _ = writeln!(out);
    let _ = write!(
        out,
        "Page {} of {} | {} shown after filters | {} selected | {}",
        view.page,
        view.total_pages.max(1),
        view.filtered_count,
        view.selected_count,
        view.select_all_label
    );
    out
}

pub fn render_notice(notice: &Notice) -> String {
    format!("{}: {}", notice.title, notice.description)
}
