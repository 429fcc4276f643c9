//! Streams stored frames through the transcoder under a wall-clock deadline.
//!
//! One job runs three concurrent activities: the frame supplier feeds the
//! process stdin, the diagnostic drain empties stderr, and the coordinator
//! waits for process exit under the deadline. Any failure kills the process
//! and unwinds the other two before the first failure is reported.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStderr, ChildStdin};
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, error};

use crate::infrastructure::storage::{ObjectStore, StorageError};

use super::error::ExportError;
use super::transcoder::Transcoder;

const STDERR_CHUNK: usize = 8 * 1024;

/// How long teardown waits for the supplier to acknowledge cancellation
/// before aborting it.
const SUPPLIER_GRACE: Duration = Duration::from_secs(2);

/// Terminal state of the transcoder process, produced exactly once per job.
enum ProcessOutcome {
    Completed(std::process::ExitStatus),
    TimedOut,
    Failed(ExportError),
}

/// Drives one transcode job to completion. Returns `Ok` only when the
/// process exited with status 0 AND `artifact` is non-empty; on every other
/// path the process has been killed and reaped before this returns.
pub async fn run(
    store: Arc<dyn ObjectStore>,
    bucket: String,
    frames: Vec<String>,
    transcoder: &mut Transcoder,
    deadline: Duration,
    artifact: &Path,
) -> Result<(), ExportError> {
    let stdin = transcoder.take_stdin();
    let stderr = transcoder.take_stderr();

    // The drain must be running before the first frame is written: ffmpeg
    // blocks once the stderr pipe buffer fills, and a blocked ffmpeg stops
    // consuming stdin.
    let drain = tokio::spawn(drain_stderr(stderr));

    let mut supplier = tokio::spawn(supply_frames(store, bucket, frames, stdin));
    let mut supplier_finished = false;
    // Stdin handed back by a failed supplier. Holding it keeps the pipe
    // open so the process cannot mistake an aborted sequence for a
    // complete one; it closes when the job is torn down.
    let mut held_stdin: Option<ChildStdin> = None;

    let deadline_at = Instant::now() + deadline;

    let outcome = loop {
        tokio::select! {
            // Biased toward the exit status: when a dying process also
            // breaks the supplier's pipe, the status is the failure that
            // carries the cause.
            biased;

            exit = timeout_at(deadline_at, transcoder.wait()) => {
                break match exit {
                    Ok(Ok(status)) => ProcessOutcome::Completed(status),
                    Ok(Err(err)) => ProcessOutcome::Failed(err.into()),
                    Err(_) => ProcessOutcome::TimedOut,
                };
            }

            supplied = &mut supplier, if !supplier_finished => {
                supplier_finished = true;
                match supplied {
                    Ok((returned_stdin, result)) => {
                        held_stdin = returned_stdin;
                        match result {
                            // All frames flushed and stdin closed; the
                            // process is finishing the encode, keep
                            // waiting for it.
                            Ok(()) => {}
                            // A broken pipe means the process hung up its
                            // stdin; the exit status that follows names
                            // the real failure.
                            Err(ExportError::Io(err)) if err.kind() == ErrorKind::BrokenPipe => {
                                debug!("transcoder closed stdin early: {}", err);
                            }
                            Err(err) => break ProcessOutcome::Failed(err),
                        }
                    }
                    Err(join_err) => {
                        break ProcessOutcome::Failed(ExportError::Io(std::io::Error::other(
                            join_err,
                        )));
                    }
                }
            }
        }
    };

    // Teardown: the process must be dead before anything is reported. Its
    // death closes both pipes, so the remaining activities observe the
    // cancellation and unwind; they are awaited, never abandoned.
    if !matches!(outcome, ProcessOutcome::Completed(_)) {
        transcoder.terminate().await;
    }
    if !supplier_finished {
        if timeout(SUPPLIER_GRACE, &mut supplier).await.is_err() {
            supplier.abort();
            let _ = supplier.await;
        }
    }
    drop(held_stdin);
    let diagnostics = match drain.await {
        Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => String::new(),
    };

    match outcome {
        ProcessOutcome::Completed(status) => {
            if !status.success() {
                error!("transcoder exited with {}: {}", status, diagnostics.trim());
                return Err(ExportError::ProcessFailed {
                    status,
                    diagnostics,
                });
            }
            let artifact_len = tokio::fs::metadata(artifact)
                .await
                .map(|meta| meta.len())
                .unwrap_or(0);
            if artifact_len == 0 {
                error!(
                    "transcoder exited cleanly but wrote no artifact: {}",
                    diagnostics.trim()
                );
                return Err(ExportError::EmptyArtifact { diagnostics });
            }
            debug!(artifact_len, "transcode complete");
            Ok(())
        }
        ProcessOutcome::TimedOut => {
            error!(
                "transcoder killed after {}s deadline: {}",
                deadline.as_secs(),
                diagnostics.trim()
            );
            Err(ExportError::Timeout {
                timeout_secs: deadline.as_secs(),
                diagnostics,
            })
        }
        ProcessOutcome::Failed(err) => {
            if !diagnostics.is_empty() {
                debug!("transcoder diagnostics at failure: {}", diagnostics.trim());
            }
            Err(err)
        }
    }
}

/// Fetches each frame in sequence order and writes it to the process stdin.
/// One object is resident at a time; `write_all` suspends while the pipe is
/// full. Stops at the first fetch failure, handing stdin back unclosed —
/// the process must not see a clean end of input for a sequence that was
/// cut short. After the last frame the pipe is shut down so the process
/// sees end of input.
async fn supply_frames(
    store: Arc<dyn ObjectStore>,
    bucket: String,
    frames: Vec<String>,
    mut stdin: ChildStdin,
) -> (Option<ChildStdin>, Result<(), ExportError>) {
    for key in &frames {
        let data = match store.get_object(&bucket, key).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => {
                return (Some(stdin), Err(ExportError::MissingObject(key.clone())));
            }
            Err(StorageError::Transfer(reason)) => {
                return (
                    Some(stdin),
                    Err(ExportError::Fetch {
                        key: key.clone(),
                        reason,
                    }),
                );
            }
        };
        if let Err(err) = stdin.write_all(&data).await {
            return (None, Err(err.into()));
        }
    }
    if let Err(err) = stdin.shutdown().await {
        return (None, Err(err.into()));
    }
    (None, Ok(()))
}

/// Empties the process stderr into a buffer until end of stream. The
/// stream ends when the process exits, on success or teardown alike.
async fn drain_stderr(mut stderr: ChildStderr) -> Vec<u8> {
    let mut diagnostics = Vec::new();
    let mut chunk = [0u8; STDERR_CHUNK];
    loop {
        match stderr.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => diagnostics.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    diagnostics
}
