//! scheduler/completion.rs
//! Single-resolution handle for a queued job.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::telemetry::TelemetrySnapshot;
use crate::types::CipherError;

pub type JobResult = Result<TelemetrySnapshot, CipherError>;

/// Resolves once with the job's result. Consumed by `wait` or `.await`,
/// so a result can never be observed twice.
#[must_use = "a Completion does nothing unless awaited or waited on"]
pub struct Completion {
    rx: oneshot::Receiver<JobResult>,
}

impl Completion {
    pub(crate) fn channel() -> (oneshot::Sender<JobResult>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    /// Block the current thread until the job resolves.
    pub fn wait(self) -> JobResult {
        pollster::block_on(self)
    }
}

impl Future for Completion {
    type Output = JobResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(CipherError::TransformFailed(
                "job dropped before completion".into(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
