//! Conversion between elapsed milliseconds and the `HH:mm:ss:SSS` display text.

use crate::Error;
use regex::Regex;
use std::sync::OnceLock;

pub const INITIAL_TEXT: &str = "00:00:00:000";

pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// Renders `millis` as a time of day. Values of a day or more wrap around.
pub fn format_time(millis: u64) -> String {
    let millis = millis % MILLIS_PER_DAY;
    format!(
        "{:02}:{:02}:{:02}:{:03}",
        millis / 3_600_000,
        (millis % 3_600_000) / 60_000,
        (millis % 60_000) / 1000,
        millis % 1000
    )
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2}):([0-9]{3})$").expect("valid time pattern"))
}

fn field(captures: &regex::Captures, index: usize, name: &str, limit: u64) -> Result<u64, Error> {
    let value: u64 = captures[index]
        .parse()
        .map_err(|_| Error::new(format!("Invalid {} {}", name, &captures[index])))?;
    if value < limit {
        Ok(value)
    } else {
        Err(Error::new(format!("Expecting {} to be less than {}", name, limit)))
    }
}

pub fn parse_time(text: &str) -> Result<u64, Error> {
    let captures = pattern()
        .captures(text)
        .ok_or_else(|| Error::new(format!(r#"Invalid time "{}""#, text)))?;
    let hours = field(&captures, 1, "hours", 24)?;
    let minutes = field(&captures, 2, "minutes", 60)?;
    let seconds = field(&captures, 3, "seconds", 60)?;
    let millis = field(&captures, 4, "milliseconds", 1000)?;
    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + millis)
}
