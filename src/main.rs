use std::process;
use tokio::io::{stdin, stdout, BufReader};
use wear_stopwatch::{console, Configuration, Executor, Logger, Stopwatch};

fn main() {
    let configuration = match Configuration::from_env() {
        Ok(configuration) => configuration,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(2);
        }
    };

    let logger = if configuration.quiet() { Logger::silent() } else { Logger::new() };
    logger.log(format!(
        "stopwatch ready (tick {} ms, {:?} clock)",
        configuration.tick_interval().as_millis(),
        configuration.clock()
    ));

    let mut executor = Executor::new();

    executor.spawn_runtime(configuration, move |configuration| async move {
        let stopwatch = Stopwatch::new(&configuration, configuration.clock().build(), logger);
        console::run(&stopwatch, BufReader::new(stdin()), stdout()).await
    });

    if let Err(error) = executor.join() {
        eprintln!("{}", error);
        process::exit(1);
    }
}
