use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::utils::{ensure_dirs, log_file};

/// Environment variable holding the log filter, e.g. `debug` or `histsearch=trace`.
pub const LOG_ENV: &str = "HISTSEARCH_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Send `tracing` output to `histsearch.log` in the data directory.
///
/// The terminal is never written to: stderr hosts the picker and stdout
/// carries the selected command back to the shell. Calling this twice is
/// harmless.
pub fn init() -> Result<()> {
    ensure_dirs()?;
    let path = log_file()?;
    let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
        anyhow::bail!("Invalid log file path: {}", path.display());
    };

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let appender = tracing_appender::rolling::never(dir, name);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .try_init();
    Ok(())
}
