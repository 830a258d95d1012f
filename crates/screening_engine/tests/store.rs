use screening_core::{normalize_result, ParseResult};
use screening_engine::{
    DirStorage, MemoryStorage, ResultStore, SessionStorage, StoredSubmission, DEFAULT_NAMESPACE,
};
use serde_json::json;

fn init_logging() {
    screening_logging::initialize_for_tests();
}

fn result(title: &str) -> ParseResult {
    normalize_result(&json!({
        "jd": { "title_guess": title },
        "shortlisted": [{ "id": "a", "name": "Ann", "match": { "final_score": 77 } }],
    }))
    .unwrap()
}

fn submission(title: &str) -> StoredSubmission {
    StoredSubmission {
        job_description: format!("{title} job description"),
        top_candidates: Some(10),
        file_count: 3,
        timestamp: "2026-10-19T09:30:00+00:00".into(),
        result: result(title),
    }
}

#[test]
fn put_then_get_returns_result() {
    init_logging();
    let store = ResultStore::new(MemoryStorage::new());
    store.put("1700000000000", &submission("Analyst")).unwrap();

    assert_eq!(store.get("1700000000000"), Some(result("Analyst")));
    assert_eq!(
        store.get_submission("1700000000000").map(|s| s.file_count),
        Some(3)
    );
}

#[test]
fn key_uses_namespace_and_request_id() {
    init_logging();
    let store = ResultStore::new(MemoryStorage::new());
    assert_eq!(store.key_for("42"), format!("{DEFAULT_NAMESPACE}_42"));

    store.put("42", &submission("Analyst")).unwrap();
    let raw = store.storage().get_item("carnival_request_42").expect("stored");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for key in ["jobDescription", "topCandidates", "fileCount", "timestamp", "result"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn last_write_wins() {
    init_logging();
    let store = ResultStore::new(MemoryStorage::new());
    store.put("7", &submission("First")).unwrap();
    store.put("7", &submission("Second")).unwrap();
    assert_eq!(store.get("7").unwrap().summary.job_title, "Second");
}

#[test]
fn missing_and_corrupt_entries_read_as_none() {
    init_logging();
    let store = ResultStore::with_namespace(MemoryStorage::new(), "test");
    assert_eq!(store.get("absent"), None);

    store.storage().set_item("test_broken", "{not json").unwrap();
    assert_eq!(store.get("broken"), None);

    store
        .storage()
        .set_item("test_wrong_shape", r#"{"result": 5}"#)
        .unwrap();
    assert_eq!(store.get("wrong_shape"), None);
}

#[test]
fn directory_storage_persists_across_instances() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().join("store");

    ResultStore::new(DirStorage::new(&dir))
        .put("99", &submission("Designer"))
        .unwrap();
    assert!(dir.join("carnival_request_99.json").is_file());

    let reopened = ResultStore::new(DirStorage::new(&dir));
    assert_eq!(reopened.get("99").unwrap().summary.job_title, "Designer");
    assert_eq!(reopened.get("100"), None);
}

#[test]
fn directory_storage_escapes_keys() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let storage = DirStorage::new(temp.path());
    storage.set_item("a/../b", "{}").unwrap();
    assert!(temp.path().join("a%2F..%2Fb.json").is_file());
    assert_eq!(storage.get_item("a/../b").as_deref(), Some("{}"));
}

#[test]
fn directory_storage_keeps_similar_keys_apart() {
    init_logging();
    let temp = tempfile::TempDir::new().unwrap();
    let storage = DirStorage::new(temp.path());
    storage.set_item("a_b", "first").unwrap();

    assert_eq!(storage.get_item("a/b"), None);
    assert_eq!(storage.get_item("a%2Fb"), None);

    storage.set_item("a/b", "second").unwrap();
    storage.set_item("a%2Fb", "third").unwrap();
    assert_eq!(storage.get_item("a_b").as_deref(), Some("first"));
    assert_eq!(storage.get_item("a/b").as_deref(), Some("second"));
    assert_eq!(storage.get_item("a%2Fb").as_deref(), Some("third"));
}
