use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use testprotocol::config::ConfigLoader;
use testprotocol::{logging, run_session, AppError, PortEnumerator, StdConsole, SystemPortOpener};

// Command-line arguments. Everything is optional; a bare invocation starts
// the interactive session with built-in defaults.
#[derive(Parser, Debug)]
#[command(
    name = "testprotocol",
    version,
    about = "Interactive serial console for running self-tests on the motor controller board.",
    long_about = "Opens the first available serial port at 115200 baud and offers a menu to change \
                  port or baud rate and to send test codes. Each test code is sent zero-padded to \
                  five digits; the board's answer is printed until it reports \"Test <N> done\"."
)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "testprotocol=debug". Overrides the configuration.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match ConfigLoader::load(args.config.as_deref()) {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            eprintln!("Warning: Failed to load config, using defaults: {e}");
            ConfigLoader::with_defaults().into_config()
        }
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: could not open log file: {e}");
    }

    let probe_config = config.serial.port_configuration(config.serial.default_baud);
    let enumerator = match PortEnumerator::detect() {
        Ok(enumerator) => enumerator.with_probe_config(probe_config),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run_session(&mut StdConsole, &SystemPortOpener, &enumerator, &config.serial) {
        Ok(()) => ExitCode::SUCCESS,
        // Already shown to the operator by the session.
        Err(AppError::NoPortAvailable) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "session ended with an error");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
