/*!
 * Progress and log notifications for a translation run.
 *
 * Callbacks may be invoked from whichever task finished a cell, so
 * observers must be `Send + Sync`.
 */

use super::orchestrator::PipelineStage;

/// Receives progress updates and human-readable log lines
pub trait ProgressObserver: Send + Sync {
    /// Called once per finished cell with a strictly increasing `current`
    fn on_progress(&self, current: usize, total: usize);

    /// Called with one log line
    fn on_log(&self, message: &str);

    /// Called when the pipeline enters a new stage
    fn on_stage(&self, _stage: PipelineStage) {}
}

/// Ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&self, _current: usize, _total: usize) {}

    fn on_log(&self, _message: &str) {}
}

/// Observer built from two closures
pub struct CallbackObserver<P, L>
where
    P: Fn(usize, usize) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    on_progress: P,
    on_log: L,
}

impl<P, L> CallbackObserver<P, L>
where
    P: Fn(usize, usize) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    /// Wrap a progress closure and a log closure
    pub fn new(on_progress: P, on_log: L) -> Self {
        Self { on_progress, on_log }
    }
}

impl<P, L> ProgressObserver for CallbackObserver<P, L>
where
    P: Fn(usize, usize) + Send + Sync,
    L: Fn(&str) + Send + Sync,
{
    fn on_progress(&self, current: usize, total: usize) {
        (self.on_progress)(current, total);
    }

    fn on_log(&self, message: &str) {
        (self.on_log)(message);
    }
}
