use screening_core::{normalize_candidate, Candidate, ExportFormat};
use screening_engine::{
    Backend, BackendError, ClientConfig, ExportError, ExportRequest, HttpBackend, ResumeFile,
    Submission,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn init_logging() {
    screening_logging::initialize_for_tests();
}

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    };
    HttpBackend::new(config).expect("client")
}

fn submission() -> Submission {
    Submission {
        job_description: "Rust engineer, async services".into(),
        top_n: Some(5),
        files: vec![
            ResumeFile {
                name: "alice.pdf".into(),
                bytes: b"%PDF-alice".to_vec(),
            },
            ResumeFile {
                name: "bob.docx".into(),
                bytes: b"PK-bob".to_vec(),
            },
        ],
    }
}

fn exported_candidate() -> Candidate {
    normalize_candidate(
        0,
        &json!({
            "id": "c-1",
            "name": "Alice Example",
            "email": "alice@example.com",
            "years_experience": 6,
            "skills": { "matched": ["Rust"], "missing": ["Kafka"], "extras": [] },
            "match": { "final_score": 91, "semantic": 88, "overlap": 93 },
            "highlights": ["Led the storage rewrite"],
            "source_filename": "alice.pdf",
        }),
    )
}

#[tokio::test]
async fn health_reads_status_flags() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let status = backend_for(&server).health().await.expect("health ok");
    assert!(status.ok);
    assert_eq!(status.model_loaded, None);
}

#[tokio::test]
async fn health_failure_carries_status() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .mount(&server)
        .await;

    let err = backend_for(&server).health().await.unwrap_err();
    assert_eq!(
        err,
        BackendError::HttpStatus {
            status: 503,
            body: "warming up".into()
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn parse_posts_multipart_and_normalizes_nested_payload() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parse"))
        .and(body_string_contains("name=\"jd\""))
        .and(body_string_contains("Rust engineer, async services"))
        .and(body_string_contains("name=\"top_n\""))
        .and(body_string_contains("filename=\"alice.pdf\""))
        .and(body_string_contains("filename=\"bob.docx\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "request_id": "r-1", "model": { "embedding": "mini" } },
            "jd": { "title_guess": "Rust Engineer" },
            "selection": { "shortlisted_count": 1, "total_candidates": 2 },
            "stats": { "avg_match": 80.5, "top_missing_skills": ["Kafka"] },
            "shortlisted": [{
                "id": "alice",
                "name": "Alice",
                "location": "  Oslo ",
                "skills": { "matched": ["Rust"] },
                "match": { "final_score": 92, "semantic": 90, "overlap": 94 },
            }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend_for(&server)
        .parse(&submission())
        .await
        .expect("parse ok");

    assert_eq!(result.summary.job_title, "Rust Engineer");
    assert_eq!(result.summary.request_id, "r-1");
    let alice = &result.shortlisted_candidates[0];
    assert_eq!(alice.overall_score, 92.0);
    assert_eq!(alice.location.as_deref(), Some("Oslo"));
}

#[tokio::test]
async fn parse_omits_non_positive_top_n() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "shortlisted": [] })))
        .mount(&server)
        .await;

    let mut request = submission();
    request.top_n = Some(0);
    backend_for(&server).parse(&request).await.expect("parse ok");

    let received = server.received_requests().await.expect("recording enabled");
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(!body.contains("name=\"top_n\""));
}

#[tokio::test]
async fn parse_rejects_non_object_payload() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "an", "object"])))
        .mount(&server)
        .await;

    let err = backend_for(&server).parse(&submission()).await.unwrap_err();
    assert!(matches!(err, BackendError::Schema(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn parse_rejects_body_that_is_not_utf8_json() {
    init_logging();
    let server = MockServer::start().await;
    let mut body = br#"{"shortlisted":[{"id":"a","name":""#.to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(br#""}]}"#);
    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let err = backend_for(&server).parse(&submission()).await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::Schema(screening_core::SchemaError::InvalidJson(_))
    ));
}

#[tokio::test]
async fn parse_failure_keeps_status_and_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/parse"))
        .respond_with(ResponseTemplate::new(422).set_body_string("jd is required"))
        .mount(&server)
        .await;

    let err = backend_for(&server).parse(&submission()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.to_string(),
        "request failed with status 422: jd is required"
    );
}

#[tokio::test]
async fn export_posts_mapped_payload_and_returns_bytes() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export-excel"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"XLSXBYTES".to_vec(), "application/octet-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = ExportRequest {
        format: ExportFormat::Spreadsheet,
        job_description: "Rust Engineer".into(),
        candidates: vec![exported_candidate()],
    };
    let artifact = backend_for(&server).export(&request).await.expect("export ok");

    assert_eq!(artifact.filename, "resume_screening_results.xlsx");
    assert_eq!(artifact.content_type, "application/octet-stream");
    assert_eq!(artifact.bytes.as_ref(), b"XLSXBYTES");

    let received: Vec<Request> = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["format"], "xlsx");
    assert_eq!(body["jobDescription"], "Rust Engineer");
    let sent = &body["candidates"][0];
    assert_eq!(sent["id"], "c-1");
    assert_eq!(sent["years_experience"], 6.0);
    assert_eq!(sent["match"]["final_score"], 91.0);
    assert_eq!(sent["match"]["overlap"], 93.0);
    assert_eq!(sent["authenticity"]["score"], 0.0);
    assert_eq!(sent["authenticity"]["flags"], json!([]));
    assert_eq!(sent["skills"]["missing"], json!(["Kafka"]));
    assert_eq!(sent["highlights"], json!(["Led the storage rewrite"]));
}

#[tokio::test]
async fn export_failure_surfaces_status_and_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/export-excel"))
        .respond_with(ResponseTemplate::new(500).set_body_string("renderer crashed"))
        .mount(&server)
        .await;

    let request = ExportRequest {
        format: ExportFormat::Document,
        job_description: "Job".into(),
        candidates: vec![exported_candidate()],
    };
    let err = backend_for(&server).export(&request).await.unwrap_err();

    match &err {
        ExportError::Backend(BackendError::HttpStatus { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "renderer crashed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn csv_export_never_calls_backend() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = ExportRequest {
        format: ExportFormat::Csv,
        job_description: "Job".into(),
        candidates: vec![exported_candidate()],
    };
    let artifact = backend_for(&server).export(&request).await.expect("csv ok");
    assert_eq!(artifact.filename, "resume_screening_results.csv");
    assert_eq!(artifact.content_type, "text/csv");
}

#[tokio::test]
async fn unreachable_backend_is_a_retryable_transport_error() {
    init_logging();
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9".into(),
        ..ClientConfig::default()
    };
    let err = HttpBackend::new(config)
        .expect("client")
        .health()
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
    assert!(err.is_retryable());
}
