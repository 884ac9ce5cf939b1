//! Background narrative calls
//!
//! A request runs on its own thread so the caller can keep showing a
//! loading state. The outcome, success or failure, is collected with `wait`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

use super::NarrativeError;

pub struct PendingNarrative<T> {
    is_pending: Arc<AtomicBool>,
    handle: JoinHandle<Result<T, NarrativeError>>,
}

impl<T: Send + 'static> PendingNarrative<T> {
    /// Start `job` on a worker thread.
    pub fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<T, NarrativeError> + Send + 'static,
    {
        let is_pending = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&is_pending);

        let handle = thread::spawn(move || {
            let result = job();
            flag.store(false, Ordering::Release);
            debug!("Narrative request finished (ok: {})", result.is_ok());
            result
        });

        Self { is_pending, handle }
    }

    /// Whether the request is still in flight.
    pub fn is_pending(&self) -> bool {
        self.is_pending.load(Ordering::Acquire)
    }

    /// Poll every `interval` while the request is in flight, reporting the
    /// time waited so far to `on_wait`, then collect the outcome.
    pub fn wait_polling(self, interval: Duration, mut on_wait: impl FnMut(Duration)) -> Result<T, NarrativeError> {
        let started = Instant::now();
        while self.is_pending() {
            on_wait(started.elapsed());
            thread::sleep(interval);
        }
        self.wait()
    }

    /// Block until the request finishes.
    pub fn wait(self) -> Result<T, NarrativeError> {
        self.handle
            .join()
            .map_err(|_| NarrativeError::WorkerPanicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_pending_until_job_returns() {
        let (release, gate) = mpsc::channel::<()>();
        let pending = PendingNarrative::spawn(move || {
            let _ = gate.recv();
            Ok("传记".to_string())
        });

        assert!(pending.is_pending());
        release.send(()).unwrap();
        assert_eq!(pending.wait().unwrap(), "传记");
    }

    #[test]
    fn test_polling_reports_while_pending() {
        let (release, gate) = mpsc::channel::<()>();
        let pending = PendingNarrative::spawn(move || {
            let _ = gate.recv();
            Ok(7)
        });

        let mut polls = 0;
        let result = pending.wait_polling(Duration::from_millis(1), |_| {
            polls += 1;
            let _ = release.send(());
        });
        assert_eq!(result.unwrap(), 7);
        assert!(polls >= 1);
    }

    #[test]
    fn test_failure_is_delivered() {
        let pending: PendingNarrative<String> =
            PendingNarrative::spawn(|| Err(NarrativeError::EmptyResponse));
        assert!(matches!(pending.wait(), Err(NarrativeError::EmptyResponse)));
    }

    #[test]
    fn test_panic_becomes_error() {
        let pending: PendingNarrative<String> = PendingNarrative::spawn(|| panic!("boom"));
        assert!(matches!(pending.wait(), Err(NarrativeError::WorkerPanicked)));
    }
}
