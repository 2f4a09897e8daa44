use crate::TimerStatus;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub status: TimerStatus,
    pub elapsed: u64,
    pub text: String,
}

#[derive(Debug, Default)]
struct Inner {
    status: TimerStatus,
    epoch: u64,
    elapsed: u64,
}

/// Single writer for the timer's status and elapsed time. Every mutation takes
/// the lock and publishes to the watch channels before releasing it.
pub struct State {
    inner: Mutex<Inner>,
    status: watch::Sender<TimerStatus>,
    elapsed: watch::Sender<u64>,
}

impl State {
    pub fn new() -> Self {
        let (status, _) = watch::channel(TimerStatus::Reset);
        let (elapsed, _) = watch::channel(0);
        Self {
            inner: Mutex::new(Inner::default()),
            status,
            elapsed,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(inner: &mut Inner, status: TimerStatus, sender: &watch::Sender<TimerStatus>) {
        inner.status = status;
        inner.epoch += 1;
        sender.send_replace(status);
    }

    pub fn start(&self) -> bool {
        let mut inner = self.lock();
        if inner.status.is_running() {
            return false;
        }
        Self::transition(&mut inner, TimerStatus::Running, &self.status);
        true
    }

    pub fn pause(&self) -> bool {
        let mut inner = self.lock();
        if !inner.status.is_running() {
            return false;
        }
        Self::transition(&mut inner, TimerStatus::Paused, &self.status);
        true
    }

    pub fn reset(&self) -> bool {
        let mut inner = self.lock();
        if inner.status == TimerStatus::Reset {
            return false;
        }
        inner.elapsed = 0;
        self.elapsed.send_replace(0);
        Self::transition(&mut inner, TimerStatus::Reset, &self.status);
        true
    }

    /// The epoch of the current run, if the timer is running.
    pub fn running_epoch(&self) -> Option<u64> {
        let inner = self.lock();
        inner.status.is_running().then(|| inner.epoch)
    }

    /// Adds `delta` milliseconds on behalf of the run identified by `epoch`.
    /// Returns false once that run is over, in which case nothing is added.
    pub fn accumulate(&self, epoch: u64, delta: u64) -> bool {
        let mut inner = self.lock();
        if !inner.status.is_running() || inner.epoch != epoch {
            return false;
        }
        if delta > 0 {
            inner.elapsed = inner.elapsed.saturating_add(delta);
            self.elapsed.send_replace(inner.elapsed);
        }
        true
    }

    pub fn status(&self) -> TimerStatus {
        self.lock().status
    }

    pub fn elapsed(&self) -> u64 {
        self.lock().elapsed
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            status: inner.status,
            elapsed: inner.elapsed,
            text: crate::format_time(inner.elapsed),
        }
    }

    pub fn subscribe_status(&self) -> watch::Receiver<TimerStatus> {
        self.status.subscribe()
    }

    pub fn subscribe_elapsed(&self) -> watch::Receiver<u64> {
        self.elapsed.subscribe()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
