//! Per-submission result persistence.
//!
//! A completed [`ParseResult`] is written once under `<namespace>_<requestId>`
//! and read back when the results view mounts. The backing key-value storage
//! is a trait so tests can use an in-memory map and the CLI a directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use screening_core::ParseResult;
use screening_logging::{screening_debug, screening_warn};
use serde::{Deserialize, Serialize};

use crate::persist::{AtomicFileWriter, PersistError};

pub const DEFAULT_NAMESPACE: &str = "carnival_request";

/// Narrow string key-value storage, shaped like browser session storage.
pub trait SessionStorage: Send + Sync {
    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn get_item(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.get(key).cloned()
    }
}

/// One `<key>.json` file per entry, written atomically.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(file_name_for(key))
    }
}

impl SessionStorage for DirStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(&file_name_for(key), value.as_bytes())?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                screening_warn!("Failed to read stored entry {:?}: {}", path, err);
                None
            }
        }
    }
}

/// Bytes outside `[A-Za-z0-9_-.]` become `%XX`, so distinct keys never share a file.
fn file_name_for(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.') {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push_str(".json");
    name
}

/// Envelope persisted for each submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub job_description: String,
    pub top_candidates: Option<u32>,
    pub file_count: usize,
    /// RFC 3339.
    pub timestamp: String,
    pub result: ParseResult,
}

pub struct ResultStore<S: SessionStorage> {
    storage: S,
    namespace: String,
}

impl<S: SessionStorage> ResultStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key_for(&self, request_id: &str) -> String {
        format!("{}_{}", self.namespace, request_id)
    }

    /// Last write wins.
    pub fn put(&self, request_id: &str, submission: &StoredSubmission) -> Result<(), PersistError> {
        let encoded = serde_json::to_string(submission)
            .map_err(|err| PersistError::Io(std::io::Error::other(err)))?;
        self.storage.set_item(&self.key_for(request_id), &encoded)?;
        screening_debug!(
            "Stored result for request {} ({} bytes)",
            request_id,
            encoded.len()
        );
        Ok(())
    }

    /// Missing and unreadable entries both read as `None`.
    pub fn get_submission(&self, request_id: &str) -> Option<StoredSubmission> {
        let key = self.key_for(request_id);
        let raw = self.storage.get_item(&key)?;
        match serde_json::from_str::<StoredSubmission>(&raw) {
            Ok(submission) => Some(submission),
            Err(err) => {
                screening_warn!("Stored entry {} is corrupt, ignoring it: {}", key, err);
                None
            }
        }
    }

    pub fn get(&self, request_id: &str) -> Option<ParseResult> {
        self.get_submission(request_id).map(|submission| submission.result)
    }
}
