use crate::Error;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Show,
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        match line.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "pause" => Ok(Command::Pause),
            "reset" => Ok(Command::Reset),
            "show" => Ok(Command::Show),
            "quit" => Ok(Command::Quit),
            _ => Err(Error::new(format!(r#"Unknown command "{}""#, line.trim()))),
        }
    }
}
