//! Screening engine: backend client, export serialization, and result storage.
mod client;
mod config;
mod engine;
mod export;
mod mock;
mod persist;
mod store;
mod types;

pub use client::{Backend, HttpBackend};
pub use config::{
    ClientConfig, ConfigError, DEFAULT_EXPORT_PATH, DEFAULT_HEALTH_PATH, DEFAULT_PARSE_PATH,
    DEFAULT_STORE_DIR,
};
pub use engine::{backend_from_config, EngineEvent, EngineHandle};
pub use export::{
    artifact_filename, build_csv, build_export_payload, csv_artifact, save_artifact,
    ExportCandidate, ExportError, ExportPayload, ExportRequest, CSV_HEADER, EXPORT_BASENAME,
};
pub use mock::{sample_result, MockBackend, SAMPLE_PAYLOAD};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use store::{
    DirStorage, MemoryStorage, ResultStore, SessionStorage, StoredSubmission, DEFAULT_NAMESPACE,
};
pub use types::{
    BackendError, ExportArtifact, HealthStatus, JobId, Operation, ResumeFile, Submission,
};
