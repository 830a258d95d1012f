use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use screening_core::{ExportFormat, Msg, SortKey};

#[derive(Parser, Debug)]
#[command(
    name = "screening",
    version,
    about = "Submit resumes for scoring, then browse and export the ranked candidates"
)]
pub struct Cli {
    /// Also write logs to ./screening.log.
    #[arg(long, global = true, default_value_t = false)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the scoring backend is up.
    Health,
    /// Submit a job description and resumes; prints the request id.
    Parse(ParseArgs),
    /// Show one page of a stored result.
    Results(ResultsArgs),
    /// Export candidates of a stored result.
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Job description text.
    #[arg(long, conflicts_with = "jd_file", required_unless_present = "jd_file")]
    pub jd: Option<String>,

    /// Read the job description from a file.
    #[arg(long)]
    pub jd_file: Option<PathBuf>,

    /// Ask the backend to shortlist at most N candidates.
    #[arg(long)]
    pub top_n: Option<u32>,

    /// Resume files (already validated by the caller).
    #[arg(required = true)]
    pub resumes: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ResultsArgs {
    /// Request id printed by `parse`.
    #[arg(long)]
    pub rid: String,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long)]
    pub rid: String,

    #[arg(long, value_enum, default_value_t = FormatArg::Xlsx)]
    pub format: FormatArg,

    /// Directory the artifact is written to.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Case-insensitive match on name or matched skills.
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, value_enum, default_value_t = SortArg::Overall)]
    pub sort: SortArg,

    #[arg(long, default_value_t = 0.0)]
    pub min_score: f64,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Candidate id to select; repeatable.
    #[arg(long = "select")]
    pub selected: Vec<String>,

    /// Toggle "select all" on the shown page.
    #[arg(long, default_value_t = false)]
    pub select_all_visible: bool,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    #[default]
    Overall,
    Semantic,
    Overlap,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Pdf,
    Csv,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Overall => SortKey::Overall,
            SortArg::Semantic => SortKey::Semantic,
            SortArg::Overlap => SortKey::Overlap,
        }
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => ExportFormat::Spreadsheet,
            FormatArg::Pdf => ExportFormat::Document,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

impl Default for QueryArgs {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortArg::Overall,
            min_score: 0.0,
            page: 1,
            selected: Vec::new(),
            select_all_visible: false,
        }
    }
}

impl QueryArgs {
    /// The interactions a user would perform to reach this view, in order.
    pub fn messages(&self) -> Vec<Msg> {
        let mut msgs = vec![
            Msg::SearchChanged(self.search.clone()),
            Msg::SortChanged(self.sort.into()),
            Msg::MinScoreChanged(self.min_score),
            Msg::PageSelected(self.page),
        ];
        msgs.extend(self.selected.iter().map(|id| Msg::CandidateSelected {
            id: id.clone(),
            selected: true,
        }));
        if self.select_all_visible {
            msgs.push(Msg::SelectAllVisibleToggled);
        }
        msgs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_args_replay_in_view_order() {
        let args = QueryArgs {
            search: "rust".into(),
            sort: SortArg::Semantic,
            min_score: 70.0,
            page: 2,
            selected: vec!["a".into()],
            select_all_visible: true,
        };
        let msgs = args.messages();
        assert_eq!(msgs[0], Msg::SearchChanged("rust".into()));
        assert_eq!(msgs[1], Msg::SortChanged(SortKey::Semantic));
        assert_eq!(msgs[3], Msg::PageSelected(2));
        assert_eq!(msgs.last(), Some(&Msg::SelectAllVisibleToggled));
    }

    #[test]
    fn parse_requires_a_job_description() {
        assert!(Cli::try_parse_from(["screening", "parse", "cv.pdf"]).is_err());
        let cli = Cli::try_parse_from(["screening", "parse", "--jd", "Rust dev", "cv.pdf"]).unwrap();
        let Commands::Parse(args) = cli.command else {
            panic!("expected parse");
        };
        assert_eq!(args.resumes, vec![PathBuf::from("cv.pdf")]);
    }

    #[test]
    fn export_format_maps_to_core_format() {
        let cli = Cli::try_parse_from(["screening", "export", "--rid", "1", "--format", "pdf"]).unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(ExportFormat::from(args.format), ExportFormat::Document);
        assert_eq!(args.query.page, 1);
    }
}
