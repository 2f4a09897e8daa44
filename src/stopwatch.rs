use crate::{Arc, Clock, Configuration, DisplaySubscription, DisplayText, Logger, Snapshot, State, Ticker, TimerStatus};
use std::time::Duration;
use tokio::{sync::watch, task::JoinHandle};

/// The stopwatch engine.
///
/// Commands are applied synchronously to the shared [`State`]. A supervisor
/// task watches the status and keeps exactly one [`Ticker`] alive while the
/// timer runs, replacing it on every status change.
pub struct Stopwatch {
    state: Arc<State>,
    display: DisplayText,
    supervisor: JoinHandle<()>,
    logger: Logger,
}

impl Stopwatch {
    /// Must be called from within a tokio runtime.
    pub fn new(configuration: &Configuration, clock: Arc<dyn Clock>, logger: Logger) -> Self {
        let state = Arc::new(State::new());
        let display = DisplayText::new(state.subscribe_elapsed(), configuration.display_grace_period(), logger);
        let supervisor = tokio::spawn(supervise(
            state.clone(),
            state.subscribe_status(),
            clock,
            configuration.tick_interval(),
        ));
        Self {
            state,
            display,
            supervisor,
            logger,
        }
    }

    pub fn start(&self) -> bool {
        let changed = self.state.start();
        if changed {
            self.logger.log(format!("started at {}", self.display.current()));
        }
        changed
    }

    pub fn pause(&self) -> bool {
        let changed = self.state.pause();
        if changed {
            self.logger.log(format!("paused at {}", self.display.current()));
        }
        changed
    }

    pub fn reset(&self) -> bool {
        let changed = self.state.reset();
        if changed {
            self.logger.log("reset");
        }
        changed
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    pub fn elapsed(&self) -> u64 {
        self.state.elapsed()
    }

    pub fn text(&self) -> String {
        self.display.current()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<TimerStatus> {
        self.state.subscribe_status()
    }

    pub fn subscribe_elapsed(&self) -> watch::Receiver<u64> {
        self.state.subscribe_elapsed()
    }

    pub fn subscribe_text(&self) -> DisplaySubscription {
        self.display.subscribe()
    }

    pub fn display(&self) -> &DisplayText {
        &self.display
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        self.supervisor.abort();
    }
}

async fn supervise(state: Arc<State>, mut status: watch::Receiver<TimerStatus>, clock: Arc<dyn Clock>, interval: Duration) {
    let mut ticker: Option<Ticker> = None;
    loop {
        status.borrow_and_update();
        drop(ticker.take());
        if let Some(epoch) = state.running_epoch() {
            ticker = Some(Ticker::spawn(state.clone(), clock.clone(), interval, epoch));
        }
        if status.changed().await.is_err() {
            break;
        }
    }
}
