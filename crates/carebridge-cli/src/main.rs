//! CareBridge - a terminal front end for the CareBridge service.
//!
//! Parents track their children's growth and activities and connect with a
//! mentor; mentors schedule sessions and publish resources. Everyone shares
//! the resource library and the community board.

mod app;
mod cli;
mod render;
mod utils;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Cli;
use carebridge_core::config::Config;

/// Log file name prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "carebridge.log";

/// Initialize the tracing subscriber for logging.
///
/// Use the RUST_LOG env var to control the level (e.g. RUST_LOG=debug). The
/// returned guard flushes the log file when dropped.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = Config::default().cache_dir().ok();
    let (file_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let cli = Cli::parse();
    info!(command = ?cli.command, "CareBridge starting");

    let mut app = App::new()?;
    app.run(cli.command).await
}
