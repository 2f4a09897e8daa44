use crate::Chronometer;
use std::fmt::Display;

#[derive(Clone, Copy)]
pub struct Logger {
    chronometer: Chronometer,
    enabled: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            chronometer: Chronometer::new(),
            enabled: true,
        }
    }

    pub fn silent() -> Self {
        Self {
            chronometer: Chronometer::new(),
            enabled: false,
        }
    }

    // stdout carries console output, so log lines go to stderr
    pub fn log(&self, value: impl Display) {
        if self.enabled {
            eprintln!("{} ({} elapsed)", value, self.chronometer.elapsed());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
