use crate::format_time;
use std::time::Instant;

#[derive(Clone, Copy)]
pub struct Chronometer {
    start: Instant,
}

impl Chronometer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn elapsed(&self) -> String {
        format_time(self.elapsed_millis())
    }
}

impl Default for Chronometer {
    fn default() -> Self {
        Self::new()
    }
}
