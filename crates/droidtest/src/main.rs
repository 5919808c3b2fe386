//! droidtest - Run Android unit tests with Gradle and collect their reports

mod cli;
mod exit_codes;

use clap::Parser;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use cli::Cli;
use droidtest_core::DroidTestError;

fn main() {
    let cli = Cli::parse();
    let (logging, guard) = init_tracing(cli.verbose);

    let code = match cli.execute(&logging) {
        Ok(code) => code,
        Err(e) => {
            cli::output::error(&format!("{:#}", e));
            e.downcast_ref::<DroidTestError>()
                .map(DroidTestError::exit_code)
                .unwrap_or(exit_codes::ERROR)
        }
    };

    // Flush the file log before exiting
    drop(guard);
    std::process::exit(code);
}

/// Handle for raising console verbosity once the configuration is known
pub struct Logging {
    console: reload::Handle<EnvFilter, Registry>,
}

impl Logging {
    /// Switch the console to debug output unless RUST_LOG says otherwise
    pub fn enable_debug(&self) {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        if let Err(e) = self.console.reload(EnvFilter::new("debug")) {
            tracing::warn!(error = %e, "failed to enable debug logging");
        }
    }
}

/// Set up tracing with two layers:
/// - Console (stderr): controlled by RUST_LOG (default: warn, debug with --verbose)
/// - File: always debug-level JSON to ~/.droidtest/logs/
fn init_tracing(verbose: bool) -> (Logging, Option<tracing_appender::non_blocking::WorkerGuard>) {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (console_filter, console) = reload::Layer::new(console_filter);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let (file_layer, guard) = match log_directory() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(&log_dir, "droidtest.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    (Logging { console }, guard)
}

/// Returns the log directory path, creating it if needed.
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".droidtest").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}
