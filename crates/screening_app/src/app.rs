use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use chrono::Utc;
use screening_core::{update, Msg, ResultsState};
use screening_engine::{
    backend_from_config, ClientConfig, DirStorage, EngineEvent, EngineHandle, ResultStore,
    ResumeFile, SessionStorage, StoredSubmission, Submission,
};
use screening_logging::{screening_debug, screening_info};

use crate::cli::{Commands, ExportArgs, ParseArgs, QueryArgs, ResultsArgs};
use crate::effects::EffectRunner;
use crate::render::{render_notice, render_results};

pub fn run(command: Commands, config: ClientConfig) -> anyhow::Result<ExitCode> {
    let backend = backend_from_config(&config).context("failed to build backend client")?;
    let engine = EngineHandle::new(backend).context("failed to start engine runtime")?;
    let store = ResultStore::new(DirStorage::new(&config.store_dir));

    match command {
        Commands::Health => check_health(&engine),
        Commands::Parse(args) => {
            let rid = submit(&engine, &store, &args)?;
            println!("{rid}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Results(args) => {
            let state = show_results(&store, &args);
            println!("{}", render_results(&state.view()));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Export(args) => export(&engine, &store, args),
    }
}

fn check_health(engine: &EngineHandle) -> anyhow::Result<ExitCode> {
    engine.check_health(1);
    match engine.recv() {
        Some(EngineEvent::HealthChecked { result, .. }) => {
            let status = result.context("health check failed")?;
            let model = match status.model_loaded {
                Some(true) => "loaded",
                Some(false) => "not loaded",
                None => "unknown",
            };
            println!("ok={} model={}", status.ok, model);
            Ok(if status.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        _ => bail!("engine stopped before the health check finished"),
    }
}

/// Client-generated request id: milliseconds since the epoch.
pub fn new_request_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

pub fn read_submission(args: &ParseArgs) -> anyhow::Result<Submission> {
    let job_description = match (&args.jd, &args.jd_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read job description {}", path.display()))?,
        (None, None) => bail!("a job description is required"),
    };
    if job_description.trim().is_empty() {
        bail!("the job description is empty");
    }

    let files = args
        .resumes
        .iter()
        .map(|path| read_resume(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Submission {
        job_description,
        top_n: args.top_n,
        files,
    })
}

fn read_resume(path: &Path) -> anyhow::Result<ResumeFile> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read resume {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ResumeFile { name, bytes })
}

/// Sends the submission, stores the result, and returns the request id.
pub fn submit<S: SessionStorage>(
    engine: &EngineHandle,
    store: &ResultStore<S>,
    args: &ParseArgs,
) -> anyhow::Result<String> {
    let submission = read_submission(args)?;
    let rid = new_request_id();
    screening_info!(
        "Submitting request {} with {} file(s)",
        rid,
        submission.files.len()
    );

    let job_description = submission.job_description.clone();
    let top_candidates = submission.top_n;
    let file_count = submission.files.len();
    engine.parse(1, submission);
    let result = match engine.recv() {
        Some(EngineEvent::ParseCompleted { result, .. }) => result.context("analysis failed")?,
        _ => bail!("engine stopped before the analysis finished"),
    };

    store
        .put(
            &rid,
            &StoredSubmission {
                job_description,
                top_candidates,
                file_count,
                timestamp: Utc::now().to_rfc3339(),
                result,
            },
        )
        .context("failed to store the analysis result")?;
    Ok(rid)
}

fn replay(state: ResultsState, query: &QueryArgs) -> ResultsState {
    query.messages().into_iter().fold(state, |state, msg| {
        let (next, effects) = update(state, msg);
        debug_assert!(effects.is_empty());
        next
    })
}

pub fn show_results<S: SessionStorage>(store: &ResultStore<S>, args: &ResultsArgs) -> ResultsState {
    let (state, _) = update(ResultsState::new(), Msg::ResultLoaded(store.get(&args.rid)));
    screening_debug!("Loaded request {} (found={})", args.rid, state.result().is_some());
    replay(state, &args.query)
}

/// Exports the current view; returns the final state so the caller can report.
pub fn export_state<S: SessionStorage>(
    engine: &EngineHandle,
    store: &ResultStore<S>,
    args: ExportArgs,
) -> ResultsState {
    let (state, _) = update(ResultsState::new(), Msg::ResultLoaded(store.get(&args.rid)));
    let state = replay(state, &args.query);
    let (mut state, effects) = update(state, Msg::ExportRequested(args.format.into()));

    let mut runner = EffectRunner::new(engine, PathBuf::from(&args.out));
    for msg in runner.run(effects) {
        let (next, _) = update(state, msg);
        state = next;
    }
    state
}

fn export<S: SessionStorage>(
    engine: &EngineHandle,
    store: &ResultStore<S>,
    args: ExportArgs,
) -> anyhow::Result<ExitCode> {
    let rid = args.rid.clone();
    let state = export_state(engine, store, args);
    let view = state.view();
    if !view.loaded {
        println!("{}", render_results(&view));
        return Ok(ExitCode::FAILURE);
    }
    match view.notice {
        Some(notice) if notice.is_error => {
            eprintln!("{}", render_notice(&notice));
            Ok(ExitCode::FAILURE)
        }
        Some(notice) => {
            println!("{}", render_notice(&notice));
            Ok(ExitCode::SUCCESS)
        }
        None => bail!("export of request {rid} produced no outcome"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cli::{FormatArg, SortArg};
    use screening_engine::{sample_result, MemoryStorage, MockBackend};

    fn store_with_sample(rid: &str) -> ResultStore<MemoryStorage> {
        let store = ResultStore::new(MemoryStorage::new());
        store
            .put(
                rid,
                &StoredSubmission {
                    job_description: "Platform engineer".into(),
                    top_candidates: None,
                    file_count: 8,
                    timestamp: "2026-01-01T00:00:00+00:00".into(),
                    result: sample_result().unwrap(),
                },
            )
            .unwrap();
        store
    }

    fn mock_engine() -> EngineHandle {
        EngineHandle::new(Arc::new(MockBackend)).unwrap()
    }

    #[test]
    fn unknown_request_shows_empty_state() {
        screening_logging::initialize_for_tests();
        let store = ResultStore::new(MemoryStorage::new());
        let state = show_results(
            &store,
            &ResultsArgs {
                rid: "nope".into(),
                query: QueryArgs::default(),
            },
        );
        assert!(!state.view().loaded);
    }

    #[test]
    fn results_apply_query_arguments() {
        screening_logging::initialize_for_tests();
        let store = store_with_sample("42");
        let query = QueryArgs {
            sort: SortArg::Semantic,
            min_score: 80.0,
            page: 1,
            ..QueryArgs::default()
        };
        let view = show_results(&store, &ResultsArgs { rid: "42".into(), query }).view();

        assert!(view.loaded);
        assert!(view.rows.iter().all(|row| row.overall_score >= 80.0));
        assert!(view
            .rows
            .windows(2)
            .all(|pair| pair[0].semantic_score >= pair[1].semantic_score));
    }

    #[test]
    fn csv_export_writes_selected_rows() {
        screening_logging::initialize_for_tests();
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_sample("7");
        let engine = mock_engine();
        let args = ExportArgs {
            rid: "7".into(),
            format: FormatArg::Csv,
            out: dir.path().to_path_buf(),
            query: QueryArgs {
                selected: vec!["sample-02".into()],
                ..QueryArgs::default()
            },
        };

        let view = export_state(&engine, &store, args).view();
        let notice = view.notice.expect("notice");
        assert!(!notice.is_error, "{notice:?}");

        let written = fs::read_to_string(dir.path().join("resume_screening_results.csv")).unwrap();
        assert_eq!(written.lines().count(), 2);
    }

    #[test]
    fn submission_reads_files_and_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let jd = dir.path().join("jd.txt");
        let resume = dir.path().join("alice.pdf");
        fs::write(&jd, "Rust engineer").unwrap();
        fs::write(&resume, b"%PDF").unwrap();

        let submission = read_submission(&ParseArgs {
            jd: None,
            jd_file: Some(jd),
            top_n: Some(3),
            resumes: vec![resume],
        })
        .unwrap();
        assert_eq!(submission.job_description, "Rust engineer");
        assert_eq!(submission.files[0].name, "alice.pdf");
        assert_eq!(submission.files[0].bytes, b"%PDF");
        assert_eq!(submission.top_n, Some(3));
    }

    #[test]
    fn parse_stores_result_under_new_request_id() {
        screening_logging::initialize_for_tests();
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("cv.docx");
        fs::write(&resume, b"PK").unwrap();
        let store = ResultStore::new(MemoryStorage::new());
        let engine = mock_engine();

        let rid = submit(
            &engine,
            &store,
            &ParseArgs {
                jd: Some("Platform engineer".into()),
                jd_file: None,
                top_n: None,
                resumes: vec![resume],
            },
        )
        .unwrap();

        let stored = store.get_submission(&rid).expect("stored");
        assert_eq!(stored.file_count, 1);
        assert_eq!(stored.result, sample_result().unwrap());
        assert!(rid.chars().all(|c| c.is_ascii_digit()));
    }
}
