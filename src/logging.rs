//! Process-wide `tracing` subscriber.
//!
//! Hosts that already install a subscriber can skip this; every log line
//! in the crate goes through `tracing` macros either way.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Name of the log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "statfx.log";

/// Held for the process lifetime so buffered lines are flushed.
static GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Install the subscriber once per process.
///
/// With `log_dir` the output goes to [`LOG_FILE_NAME`] in that directory
/// through a non-blocking writer; without it, to stderr. The filter comes
/// from `RUST_LOG` and defaults to `info`. Returns `false` when a
/// subscriber was already installed, by this function or anyone else.
pub fn init_tracing(log_dir: Option<&Path>) -> bool {
    let mut installed = false;
    GUARD.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_names(true);

        match log_dir {
            Some(dir) => {
                let appender = match RollingFileAppender::builder()
                    .rotation(Rotation::NEVER)
                    .filename_prefix(LOG_FILE_NAME)
                    .build(dir)
                {
                    Ok(appender) => appender,
                    Err(e) => {
                        eprintln!("statfx: cannot open log file in {}: {e}", dir.display());
                        return None;
                    }
                };
                let (writer, guard) = tracing_appender::non_blocking(appender);
                installed = builder
                    .with_ansi(false)
                    .with_writer(writer)
                    .try_init()
                    .is_ok();
                installed.then_some(guard)
            }
            None => {
                installed = builder.with_writer(std::io::stderr).try_init().is_ok();
                None
            }
        }
    });
    installed
}
