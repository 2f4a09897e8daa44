pub mod chronometer;
pub mod clock;
pub mod command;
pub mod configuration;
pub mod console;
pub mod display;
pub mod error;
pub mod executor;
pub mod format;
pub mod logger;
pub mod state;
pub mod stopwatch;
pub mod ticker;
pub mod timer_status;

pub use self::{
    chronometer::Chronometer,
    clock::{Clock, ClockKind, MonotonicClock, SystemClock},
    command::Command,
    configuration::Configuration,
    display::{DisplaySubscription, DisplayText},
    error::Error,
    executor::Executor,
    format::{format_time, parse_time, INITIAL_TEXT, MILLIS_PER_DAY},
    logger::Logger,
    state::{Snapshot, State},
    stopwatch::Stopwatch,
    ticker::Ticker,
    timer_status::TimerStatus,
};
use serde_json::json;
use std::sync::Arc;
