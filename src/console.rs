use crate::{json, Command, Error, Stopwatch};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

async fn respond(output: &mut (impl AsyncWrite + Unpin), value: serde_json::Value) -> Result<(), Error> {
    output.write_all(format!("{}\n", value).as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Reads one command per line from `input` and answers each with a JSON line
/// on `output`, until `quit` or end of input.
pub async fn run(
    stopwatch: &Stopwatch,
    input: impl AsyncBufRead + Unpin,
    mut output: impl AsyncWrite + Unpin,
) -> Result<(), Error> {
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                respond(&mut output, json!({ "error": error.message() })).await?;
                continue;
            }
        };
        match command {
            Command::Start => {
                stopwatch.start();
            }
            Command::Pause => {
                stopwatch.pause();
            }
            Command::Reset => {
                stopwatch.reset();
            }
            Command::Show | Command::Quit => {}
        }
        let snapshot = serde_json::to_value(stopwatch.snapshot())
            .map_err(|error| Error::new(format!("Failed to serialize snapshot: {}", error)))?;
        respond(&mut output, snapshot).await?;
        if command == Command::Quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arc, Configuration, Logger, MonotonicClock};
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    async fn session(input: &str) -> Vec<serde_json::Value> {
        let stopwatch = Stopwatch::new(&Configuration::new(), Arc::new(MonotonicClock::new()), Logger::silent());
        let mut output = Vec::new();
        run(&stopwatch, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn commands_answer_with_snapshots() {
        let responses = session("show\nstart\n\npause\nreset\n").await;
        assert_eq!(
            responses,
            vec![
                json!({"status": "reset", "elapsed": 0, "text": "00:00:00:000"}),
                json!({"status": "running", "elapsed": 0, "text": "00:00:00:000"}),
                json!({"status": "paused", "elapsed": 0, "text": "00:00:00:000"}),
                json!({"status": "reset", "elapsed": 0, "text": "00:00:00:000"}),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_command_keeps_session_alive() {
        let responses = session("lap\nshow\n").await;
        assert_eq!(
            responses,
            vec![
                json!({"error": r#"Unknown command "lap""#}),
                json!({"status": "reset", "elapsed": 0, "text": "00:00:00:000"}),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn quit_answers_then_ends_session() {
        let responses = session("start\nquit\nreset\n").await;
        assert_eq!(
            responses,
            vec![
                json!({"status": "running", "elapsed": 0, "text": "00:00:00:000"}),
                json!({"status": "running", "elapsed": 0, "text": "00:00:00:000"}),
            ]
        );
    }

    struct ClosedOutput;

    impl AsyncWrite for ClosedOutput {
        fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed")))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn write_failure_is_reported() {
        let stopwatch = Stopwatch::new(&Configuration::new(), Arc::new(MonotonicClock::new()), Logger::silent());
        let error = run(&stopwatch, "show\n".as_bytes(), ClosedOutput).await.unwrap_err();
        assert_eq!(error.message(), "I/O error: output closed");
    }
}
