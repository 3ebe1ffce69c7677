pub mod classify_image;
pub mod save_image;

use crate::domain::errors::{PipelineError, Stage};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs one blocking stage on the blocking pool.
///
/// When `cancel` fires first the caller gets `Cancelled` straight away; the
/// detached work finishes on its own and its result is dropped.
pub(crate) async fn run_blocking<T, F>(
    stage: Stage,
    cancel: &CancellationToken,
    work: F,
) -> Result<T, PipelineError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
{
    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled(stage));
    }

    let task = tokio::task::spawn_blocking(work);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(%stage, "cancelled, abandoning in-flight work");
            Err(PipelineError::Cancelled(stage))
        }
        joined = task => {
            joined.map_err(|e| stage.failure(format!("{} task failed: {}", stage, e)))?
        }
    }
}
