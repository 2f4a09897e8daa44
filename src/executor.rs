use crate::Error;
use std::{
    future::Future,
    sync::mpsc::{channel, Receiver, Sender},
    thread::spawn,
};
use tokio::runtime::Builder;

/// Runs futures to completion, each on its own runtime thread, and collects
/// their results.
#[derive(Debug)]
pub struct Executor {
    sender: Sender<Result<(), Error>>,
    receiver: Receiver<Result<(), Error>>,
}

impl Executor {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub fn spawn_runtime<F, State>(&mut self, state: State, f: impl FnOnce(State) -> F + 'static + Send)
    where
        F: Future<Output = Result<(), Error>>,
        State: 'static + Send,
    {
        let sender = self.sender.clone();
        spawn(move || {
            let result = match Builder::new_multi_thread().enable_all().build() {
                Ok(runtime) => {
                    let handle = spawn(move || {
                        let result = runtime.block_on(f(state));
                        // stdin readers would otherwise hold the runtime open
                        runtime.shutdown_background();
                        result
                    });
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(Error::new("Runtime thread panicked")))
                }
                Err(error) => Err(Error::new(format!("Failed to build runtime: {}", error))),
            };
            #[allow(unused_must_use)]
            {
                sender.send(result);
            };
        });
    }

    /// Waits for every spawned runtime and returns the first error.
    pub fn join(self) -> Result<(), Error> {
        drop(self.sender);
        let mut outcome = Ok(());
        while let Ok(result) = self.receiver.recv() {
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
