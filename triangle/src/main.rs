use std::{io::Write, process::ExitCode};

use bootstrap::logging::{init_logging, LoggingConfig};
use bootstrap::{Application, ApplicationOptions};

fn run() -> anyhow::Result<()> {
    let mut app = Application::new(ApplicationOptions::default())?;
    app.run();

    Ok(())
}

/// Writes a failure on a single line, followed by its causes.
fn report(err : &anyhow::Error, out : &mut impl Write) {
    _ = writeln!(out, "{err:#}");
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());
    println!("Starting application...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}
