//! `SandboxRunner` — one untrusted call on a monitored thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::SandboxResult;

/// How a sandboxed call ended.
#[derive(Debug, PartialEq)]
pub enum SandboxOutcome<T> {
    /// Returned normally (or signalled completion) before the deadline.
    Completed(T),
    /// Panicked before the deadline.  Carries the panic message.
    Faulted(String),
    /// Still running at the deadline.  The thread has been abandoned.
    TimedOut,
}

impl<T> SandboxOutcome<T> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SandboxOutcome::TimedOut)
    }
}

/// Runs closures on short-lived threads, polling for a result at a fixed
/// interval until a deadline.
#[derive(Copy, Clone, Debug)]
pub struct SandboxRunner {
    deadline:      Duration,
    poll_interval: Duration,
}

impl SandboxRunner {
    pub fn new(deadline: Duration, poll_interval: Duration) -> Self {
        Self {
            deadline,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run `f` and wait for it to return.
    pub fn run<T, F>(&self, label: &str, f: F) -> SandboxResult<SandboxOutcome<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        Ok(match self.run_until(label, f, || false)? {
            SandboxOutcome::Completed(Some(value)) => SandboxOutcome::Completed(value),
            SandboxOutcome::Faulted(msg)           => SandboxOutcome::Faulted(msg),
            // Never signalled, so an empty completion cannot happen.
            SandboxOutcome::Completed(None) | SandboxOutcome::TimedOut => SandboxOutcome::TimedOut,
        })
    }

    /// Run `f`, finishing early as soon as `signalled()` reports completion
    /// even if `f` itself has not returned yet.
    ///
    /// `signalled` is checked once per poll interval.  A signalled call
    /// yields `Completed(None)`; a returned one yields `Completed(Some(..))`.
    pub fn run_until<T, F, S>(&self, label: &str, f: F, signalled: S) -> SandboxResult<SandboxOutcome<Option<T>>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        S: Fn() -> bool,
    {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name(format!("sandbox-{label}"))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(f));
                // The receiver is gone if the caller already gave up.
                let _ = tx.send(result);
            })?;

        let started = Instant::now();
        loop {
            let remaining = self.deadline.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                tracing::debug!(label, deadline_ms = self.deadline.as_millis() as u64, "sandboxed call timed out");
                return Ok(SandboxOutcome::TimedOut);
            }
            match rx.recv_timeout(remaining.min(self.poll_interval)) {
                Ok(Ok(value))    => return Ok(SandboxOutcome::Completed(Some(value))),
                Ok(Err(payload)) => return Ok(SandboxOutcome::Faulted(panic_message(payload.as_ref()))),
                Err(RecvTimeoutError::Timeout) => {
                    if signalled() {
                        return Ok(SandboxOutcome::Completed(None));
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Ok(SandboxOutcome::Faulted("sandbox thread exited without a result".into()));
                }
            }
        }
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
