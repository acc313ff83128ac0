//! Directory watcher and job dispatcher.
//!
//! The watcher subscribes to creation events on a single directory,
//! non-recursively. Events arrive on a channel from notify's own thread;
//! the watch loop waits with a timeout so a cooperative stop flag is
//! observed between waits. Each qualifying file runs the pipeline
//! synchronously before the next event is taken: no queue, no worker
//! pool. In-flight work always finishes before the loop returns.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use notify::event::{Event, EventKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::error::BlackoutError;
use crate::pipeline::{self, PipelineConfig};
use crate::policy::RedactionPolicy;
use crate::redact;

/// Image extensions the watcher reacts to, without the dot.
/// Matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Default interval between stop-flag checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Cooperative stop signal for a watch loop.
///
/// Clone it before starting the loop and call [`stop`](Self::stop) from any
/// thread; the loop exits after its current wait (and current job, if one
/// is running) completes.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the watch loop to exit.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Returns true if a created file should be dispatched through the
/// pipeline: a recognized image extension and no output marker in the
/// filename. Directories are filtered out by the caller.
pub fn qualifies(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    if !IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    {
        return false;
    }

    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    // Skipping already-marked files prevents an infinite loop when the
    // output directory overlaps the watched one.
    !redact::is_redacted_name(file_name)
}

/// Watches the configured images directory until `stop` is signalled.
///
/// Per-job failures are logged and contained; only watcher-infrastructure
/// failures (the subscription itself breaking) are returned as errors.
pub fn watch(
    config: &PipelineConfig,
    policy: &RedactionPolicy,
    stop: &StopHandle,
    poll_interval: Duration,
) -> Result<(), BlackoutError> {
    config.validate()?;

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(tx)?;
    watcher.watch(&config.images_dir, RecursiveMode::NonRecursive)?;

    info!(dir = %config.images_dir.display(), "watching for new images");
    run_event_loop(config, policy, stop, poll_interval, &rx)?;
    info!(dir = %config.images_dir.display(), "watch loop stopped");
    Ok(())
}

/// Drains the event channel until `stop` is signalled.
///
/// Split from [`watch`] so the loop can be driven without a live notify
/// backend; `watch` owns the subscription wiring.
fn run_event_loop(
    config: &PipelineConfig,
    policy: &RedactionPolicy,
    stop: &StopHandle,
    poll_interval: Duration,
    rx: &mpsc::Receiver<notify::Result<Event>>,
) -> Result<(), BlackoutError> {
    while !stop.is_stopped() {
        match rx.recv_timeout(poll_interval) {
            Ok(Ok(event)) => {
                if !matches!(event.kind, EventKind::Create(_)) {
                    continue;
                }
                for path in &event.paths {
                    dispatch(config, policy, path);
                }
            }
            // The watch subsystem itself failed (directory removed,
            // permissions lost). Surface it instead of going silent.
            Ok(Err(err)) => return Err(err.into()),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(BlackoutError::Watch(notify::Error::generic(
                    "watch event channel closed unexpectedly",
                )));
            }
        }
    }

    Ok(())
}

/// Runs one created path through the filters and, if it qualifies, the
/// pipeline. Job failures end here.
fn dispatch(config: &PipelineConfig, policy: &RedactionPolicy, path: &Path) {
    if path.is_dir() {
        return;
    }
    if !qualifies(path) {
        debug!(path = %path.display(), "ignoring non-qualifying file");
        return;
    }

    info!(path = %path.display(), "new image detected");
    if let Err(err) = pipeline::process_image(config, policy, path) {
        error!(path = %path.display(), error = %err, "redaction job failed");
    }
}
