use crate::{ClockKind, Error};
use std::{env, fmt::Display, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct Configuration {
    tick_interval: u64,
    display_grace_period: u64,
    clock: ClockKind,
    quiet: bool,
}

fn var_map<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, Error> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::new(format!("Invalid {} {}", key, value))),
        None => Ok(default),
    }
}

fn positive<T: PartialOrd + Default + Display>(key: &str, value: T) -> Result<T, Error> {
    if value > T::default() {
        Ok(value)
    } else {
        Err(Error::new(format!("Invalid {} {}", key, value)))
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            tick_interval: 10,
            display_grace_period: 5000,
            clock: ClockKind::Wall,
            quiet: false,
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::new();
        let tick_interval = positive("TICK_INTERVAL", var_map(&lookup, "TICK_INTERVAL", defaults.tick_interval)?)?;
        let display_grace_period = var_map(&lookup, "DISPLAY_GRACE_PERIOD", defaults.display_grace_period)?;
        let clock = var_map(&lookup, "CLOCK", defaults.clock)?;
        let quiet = var_map(&lookup, "QUIET", defaults.quiet)?;
        Ok(Self {
            tick_interval,
            display_grace_period,
            clock,
            quiet,
        })
    }

    pub fn with_tick_interval(mut self, millis: u64) -> Result<Self, Error> {
        self.tick_interval = positive("TICK_INTERVAL", millis)?;
        Ok(self)
    }

    pub fn with_display_grace_period(mut self, millis: u64) -> Self {
        self.display_grace_period = millis;
        self
    }

    pub fn with_clock(mut self, clock: ClockKind) -> Self {
        self.clock = clock;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval)
    }

    pub fn display_grace_period(&self) -> Duration {
        Duration::from_millis(self.display_grace_period)
    }

    pub fn clock(&self) -> ClockKind {
        self.clock
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
