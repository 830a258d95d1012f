use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use screening_core::ParseResult;
use screening_logging::{screening_debug, screening_info};

use crate::client::{Backend, HttpBackend};
use crate::config::ClientConfig;
use crate::export::{ExportError, ExportRequest};
use crate::mock::MockBackend;
use crate::types::{BackendError, ExportArtifact, HealthStatus, JobId, Operation, Submission};

enum EngineCommand {
    CheckHealth { job_id: JobId },
    Parse { job_id: JobId, submission: Submission },
    Export { job_id: JobId, request: ExportRequest },
}

/// Completion of a backend call, delivered back to the caller's thread.
#[derive(Debug)]
pub enum EngineEvent {
    HealthChecked {
        job_id: JobId,
        result: Result<HealthStatus, BackendError>,
    },
    ParseCompleted {
        job_id: JobId,
        result: Result<ParseResult, BackendError>,
    },
    ExportCompleted {
        job_id: JobId,
        result: Result<ExportArtifact, ExportError>,
    },
}

impl EngineEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            EngineEvent::HealthChecked { job_id, .. }
            | EngineEvent::ParseCompleted { job_id, .. }
            | EngineEvent::ExportCompleted { job_id, .. } => *job_id,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            EngineEvent::HealthChecked { .. } => Operation::Health,
            EngineEvent::ParseCompleted { .. } => Operation::Parse,
            EngineEvent::ExportCompleted { .. } => Operation::Export,
        }
    }
}

/// Picks the mock or HTTP backend according to the config.
pub fn backend_from_config(config: &ClientConfig) -> Result<Arc<dyn Backend>, BackendError> {
    if config.use_mock {
        screening_info!("Mock mode enabled; no network calls will be made");
        return Ok(Arc::new(MockBackend));
    }
    Ok(Arc::new(HttpBackend::new(config.clone())?))
}

/// Runs backend calls on a background runtime and reports completions over a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn check_health(&self, job_id: JobId) {
        let _ = self.cmd_tx.send(EngineCommand::CheckHealth { job_id });
    }

    pub fn parse(&self, job_id: JobId, submission: Submission) {
        let _ = self.cmd_tx.send(EngineCommand::Parse { job_id, submission });
    }

    pub fn export(&self, job_id: JobId, request: ExportRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Export { job_id, request });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next completion, or `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::CheckHealth { job_id } => EngineEvent::HealthChecked {
            job_id,
            result: backend.health().await,
        },
        EngineCommand::Parse { job_id, submission } => EngineEvent::ParseCompleted {
            job_id,
            result: backend.parse(&submission).await,
        },
        EngineCommand::Export { job_id, request } => EngineEvent::ExportCompleted {
            job_id,
            result: backend.export(&request).await,
        },
    };
    screening_debug!("Job {} ({}) completed", event.job_id(), event.operation());
    let _ = event_tx.send(event);
}
