use crate::{Arc, Clock, State};
use std::time::Duration;
use tokio::{task::JoinHandle, time::sleep};

/// A running tick task. Dropping the ticker aborts the task.
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(state: Arc<State>, clock: Arc<dyn Clock>, interval: Duration, epoch: u64) -> Self {
        Self {
            handle: tokio::spawn(tick(state, clock, interval, epoch)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// Measures the real time spent in each wait instead of assuming `interval`.
async fn tick(state: Arc<State>, clock: Arc<dyn Clock>, interval: Duration, epoch: u64) {
    let mut reference = clock.now();
    loop {
        sleep(interval).await;
        let current = clock.now();
        let delta = if current > reference { (current - reference) as u64 } else { 0 };
        if !state.accumulate(epoch, delta) {
            break;
        }
        reference = current;
    }
}
