use std::path::PathBuf;

use screening_core::{Effect, ExportOutcome, Msg};
use screening_engine::{save_artifact, EngineEvent, EngineHandle, ExportRequest, JobId};
use screening_logging::{screening_info, screening_warn};

/// Executes core effects on the engine and turns completions back into messages.
pub struct EffectRunner<'a> {
    engine: &'a EngineHandle,
    out_dir: PathBuf,
    next_job: JobId,
}

impl<'a> EffectRunner<'a> {
    pub fn new(engine: &'a EngineHandle, out_dir: PathBuf) -> Self {
        Self {
            engine,
            out_dir,
            next_job: 1,
        }
    }

    /// Runs each effect to completion; a CLI has nothing else to do meanwhile.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        for effect in effects {
            match effect {
                Effect::Export {
                    format,
                    job_description,
                    candidates,
                } => {
                    let job_id = self.next_job;
                    self.next_job += 1;
                    screening_info!(
                        "Export job_id={} format={} candidates={}",
                        job_id,
                        format.wire_name(),
                        candidates.len()
                    );
                    self.engine.export(
                        job_id,
                        ExportRequest {
                            format,
                            job_description,
                            candidates,
                        },
                    );
                    msgs.push(Msg::ExportFinished(self.await_export(job_id)));
                }
            }
        }
        msgs
    }

    fn await_export(&self, job_id: JobId) -> ExportOutcome {
        while let Some(event) = self.engine.recv() {
            let EngineEvent::ExportCompleted {
                job_id: finished,
                result,
            } = event
            else {
                continue;
            };
            if finished != job_id {
                continue;
            }
            let saved = result.and_then(|artifact| {
                let path = save_artifact(&self.out_dir, &artifact)?;
                Ok((path, artifact.bytes.len()))
            });
            return match saved {
                Ok((path, byte_len)) => ExportOutcome::Saved {
                    filename: path.display().to_string(),
                    byte_len,
                },
                Err(err) => {
                    screening_warn!("Export job {} failed: {}", job_id, err);
                    ExportOutcome::Failed {
                        message: err.to_string(),
                        retryable: err.is_retryable(),
                    }
                }
            };
        }
        ExportOutcome::Failed {
            message: "engine stopped before the export finished".to_string(),
            retryable: true,
        }
    }
}
