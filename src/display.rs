//! The display text stream.
//!
//! Formatting runs in a background task only while someone is subscribed. When
//! the last subscription is dropped the task is kept alive for a grace period
//! and then torn down; the next subscription restarts it after recomputing the
//! text from the current elapsed time, so observers never see a stale value.

use crate::{format_time, Arc, Logger, INITIAL_TEXT};
use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle, time::sleep};

#[derive(Default)]
struct Lifecycle {
    subscribers: usize,
    generation: u64,
    mapper: Option<JoinHandle<()>>,
    teardown: Option<JoinHandle<()>>,
}

struct Shared {
    elapsed: watch::Receiver<u64>,
    text: Arc<watch::Sender<String>>,
    grace_period: Duration,
    handle: Handle,
    logger: Logger,
    lifecycle: Mutex<Lifecycle>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let lifecycle = self.lock();
        if let Some(mapper) = &lifecycle.mapper {
            mapper.abort();
        }
    }
}

#[derive(Clone)]
pub struct DisplayText {
    shared: Arc<Shared>,
}

impl DisplayText {
    /// Must be called from within a tokio runtime.
    pub fn new(elapsed: watch::Receiver<u64>, grace_period: Duration, logger: Logger) -> Self {
        let (text, _) = watch::channel(INITIAL_TEXT.to_string());
        Self {
            shared: Arc::new(Shared {
                elapsed,
                text: Arc::new(text),
                grace_period,
                handle: Handle::current(),
                logger,
                lifecycle: Mutex::new(Lifecycle::default()),
            }),
        }
    }

    pub fn subscribe(&self) -> DisplaySubscription {
        let shared = &self.shared;
        let mut lifecycle = shared.lock();
        lifecycle.subscribers += 1;
        lifecycle.generation += 1;
        if let Some(teardown) = lifecycle.teardown.take() {
            teardown.abort();
        }
        if lifecycle.mapper.is_none() {
            shared.text.send_replace(format_time(*shared.elapsed.borrow()));
            lifecycle.mapper = Some(shared.handle.spawn(map_elapsed(shared.elapsed.clone(), shared.text.clone())));
            shared.logger.log("display text computation started");
        }
        let receiver = shared.text.subscribe();
        DisplaySubscription {
            shared: shared.clone(),
            receiver,
        }
    }

    /// The text as of the current elapsed time, whether or not the stream is active.
    pub fn current(&self) -> String {
        format_time(*self.shared.elapsed.borrow())
    }

    pub fn subscribers(&self) -> usize {
        self.shared.lock().subscribers
    }

    pub fn is_active(&self) -> bool {
        self.shared.lock().mapper.is_some()
    }
}

pub struct DisplaySubscription {
    shared: Arc<Shared>,
    receiver: watch::Receiver<String>,
}

impl DisplaySubscription {
    pub fn current(&mut self) -> String {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for the next change of the display text.
    pub async fn changed(&mut self) -> Option<String> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }
}

impl Drop for DisplaySubscription {
    fn drop(&mut self) {
        let mut lifecycle = self.shared.lock();
        lifecycle.subscribers -= 1;
        if lifecycle.subscribers == 0 && lifecycle.mapper.is_some() {
            let generation = lifecycle.generation;
            let shared = self.shared.clone();
            lifecycle.teardown = Some(self.shared.handle.spawn(async move {
                sleep(shared.grace_period).await;
                let mut lifecycle = shared.lock();
                if lifecycle.subscribers == 0 && lifecycle.generation == generation {
                    if let Some(mapper) = lifecycle.mapper.take() {
                        mapper.abort();
                        shared.logger.log("display text computation stopped");
                    }
                    lifecycle.teardown = None;
                }
            }));
        }
    }
}

async fn map_elapsed(mut elapsed: watch::Receiver<u64>, text: Arc<watch::Sender<String>>) {
    loop {
        let formatted = format_time(*elapsed.borrow_and_update());
        text.send_if_modified(|current| {
            if *current != formatted {
                *current = formatted;
                true
            } else {
                false
            }
        });
        if elapsed.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    fn display(state: &State, grace_period: u64) -> DisplayText {
        DisplayText::new(state.subscribe_elapsed(), Duration::from_millis(grace_period), Logger::silent())
    }

    fn add(state: &State, millis: u64) {
        let epoch = state.running_epoch().unwrap();
        state.accumulate(epoch, millis);
    }

    #[tokio::test(start_paused = true)]
    async fn follows_elapsed() {
        let state = State::new();
        state.start();
        let display = display(&state, 5000);
        let mut subscription = display.subscribe();
        assert_eq!(subscription.current(), INITIAL_TEXT);
        add(&state, 3_661_000);
        assert_eq!(subscription.changed().await.unwrap(), "01:01:01:000");
        add(&state, 1);
        assert_eq!(subscription.changed().await.unwrap(), "01:01:01:001");
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_running_during_grace_period() {
        let state = State::new();
        let display = display(&state, 5000);
        drop(display.subscribe());
        assert_eq!(display.subscribers(), 0);
        sleep(Duration::from_millis(4000)).await;
        assert!(display.is_active());
        let _subscription = display.subscribe();
        sleep(Duration::from_millis(2000)).await;
        assert!(display.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn tears_down_after_grace_period() {
        let state = State::new();
        let display = display(&state, 5000);
        drop(display.subscribe());
        sleep(Duration::from_millis(5001)).await;
        assert!(!display.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_matches_continuous_observer() {
        let state = State::new();
        state.start();
        let display = display(&state, 5000);
        let mut observer = state.subscribe_elapsed();

        let mut first = display.subscribe();
        add(&state, 1500);
        assert_eq!(first.changed().await.unwrap(), format_time(*observer.borrow_and_update()));
        drop(first);

        sleep(Duration::from_millis(2500)).await;
        add(&state, 45_295_289);
        sleep(Duration::from_millis(3000)).await;
        assert!(!display.is_active());
        add(&state, 11);
        assert!(observer.has_changed().unwrap());

        let mut resumed = display.subscribe();
        assert!(display.is_active());
        let expected = format_time(*observer.borrow_and_update());
        assert_eq!(expected, "12:34:56:800");
        assert_eq!(resumed.current(), expected);

        add(&state, 200);
        observer.changed().await.unwrap();
        assert_eq!(resumed.changed().await.unwrap(), format_time(*observer.borrow_and_update()));
        assert_eq!(resumed.current(), "12:34:57:000");
    }
}
