use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::Config;
use crate::filters::RecordFilter;
use crate::models::HistoryEntry;
use crate::shell::{Shell, init_script};
use crate::storage::SqliteStore;
use crate::tui::{SearchOptions, SearchOutcome, now_ms, run_search};
use crate::utils::{config_file, expand_tilde, format_path_with_tilde};

/// Exit status when the picker is cancelled.
pub const EXIT_CANCELLED: i32 = 1;
/// Exit status asking the shell widget to run the selection immediately.
pub const EXIT_EXECUTE: i32 = 2;

/// Timestamps below this are read as seconds, above as milliseconds.
const SECONDS_CUTOFF: i64 = 1_000_000_000_000;

#[derive(Parser)]
#[command(name = "histsearch")]
#[command(version)]
#[command(about = "Interactive shell history search", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "HISTSEARCH_CONFIG", value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick a command from history and print it
    Search {
        /// Only show commands run in the current directory
        #[arg(long)]
        cwd: bool,
        /// Maximum number of result rows
        #[arg(long, default_value_t = 15)]
        height: usize,
        /// Initial query
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Store a finished command
    #[command(hide = true)]
    Record {
        #[arg(long, allow_hyphen_values = true)]
        command: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        exit_code: i32,
        /// Defaults to the current directory
        #[arg(long)]
        directory: Option<String>,
        #[arg(long, env = "HISTSEARCH_SESSION", default_value = "")]
        session: String,
        /// `now`, milliseconds, seconds, or seconds with an `s` suffix
        #[arg(long, default_value = "now")]
        ts: String,
        /// Milliseconds; computed from `--ts` when missing or negative
        #[arg(long, allow_hyphen_values = true)]
        duration: Option<i64>,
    },
    /// Print the integration script for a shell
    Init {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show statistics about the history
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a fresh session id
    #[command(hide = true)]
    SessionId,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}

/// Parse the command line and run it, returning the process exit status.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    if let Err(err) = crate::logging::init() {
        eprintln!("histsearch: logging disabled: {:#}", err);
    }

    let config_path = resolve_config_path(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Search { cwd, height, query }) => search(&config_path, cwd, height, query),
        Some(Commands::Record { command, exit_code, directory, session, ts, duration }) => {
            let request = RecordRequest { command, exit_code, directory, session, ts, duration };
            record(&config_path, request)?;
            Ok(0)
        }
        Some(Commands::Init { shell }) => {
            print!("{}", init_script(shell, cli.config.as_deref()));
            Ok(0)
        }
        Some(Commands::Config { action: ConfigAction::Show }) => {
            let config = Config::load_or_create(&config_path)?;
            print!("{}", config.to_toml()?);
            Ok(0)
        }
        Some(Commands::Config { action: ConfigAction::Path }) => {
            println!("{}", config_path.display());
            Ok(0)
        }
        Some(Commands::Stats { json }) => {
            show_stats(&config_path, json)?;
            Ok(0)
        }
        Some(Commands::SessionId) => {
            println!("{}", uuid::Uuid::new_v4());
            Ok(0)
        }
        None => {
            println!("Use --help for usage information");
            Ok(0)
        }
    }
}

fn resolve_config_path(flag: Option<&str>) -> Result<PathBuf> {
    match flag.filter(|p| !p.is_empty()) {
        Some(path) => Ok(PathBuf::from(expand_tilde(path))),
        None => config_file(),
    }
}

fn home_string() -> String {
    dirs::home_dir().map(|h| h.display().to_string()).unwrap_or_default()
}

fn current_dir_string() -> String {
    env::current_dir().map(|d| d.display().to_string()).unwrap_or_default()
}

fn search(config_path: &Path, cwd: bool, height: usize, query: String) -> Result<i32> {
    let config = Config::load_or_create(config_path)?;
    let store = SqliteStore::open(&config.database_path()?)?;
    let instant_execute = config.display.instant_execute;

    let options = SearchOptions {
        query,
        cwd_mode: cwd,
        max_height: height,
        cwd: current_dir_string(),
        home: home_string(),
    };

    match run_search(config, &store, options)? {
        SearchOutcome::Selected(command) => {
            println!("{}", command);
            Ok(if instant_execute { EXIT_EXECUTE } else { 0 })
        }
        SearchOutcome::Cancelled => Ok(EXIT_CANCELLED),
    }
}

struct RecordRequest {
    command: String,
    exit_code: i32,
    directory: Option<String>,
    session: String,
    ts: String,
    duration: Option<i64>,
}

fn record(config_path: &Path, request: RecordRequest) -> Result<()> {
    let config = Config::load_or_create(config_path)?;
    let filter = RecordFilter::new(&config.filters)?;
    let directory = request.directory.unwrap_or_else(current_dir_string);

    if !filter.should_record(&request.command, request.exit_code, &directory) {
        debug!(exit_code = request.exit_code, "command filtered out");
        return Ok(());
    }

    let now = now_ms();
    let timestamp_ms = parse_timestamp(&request.ts, now)?;
    let entry = HistoryEntry {
        id: 0,
        timestamp_ms,
        duration_ms: resolve_duration(request.duration, timestamp_ms, now),
        exit_code: request.exit_code,
        command: request.command,
        directory,
        session_id: request.session,
        hostname: hostname(),
    };

    let store = SqliteStore::open(&config.database_path()?)?;
    let id = store.insert(&entry)?;
    info!(id, exit_code = entry.exit_code, "recorded command");
    Ok(())
}

/// Parse `now`, `<secs>s`, or a bare number (seconds below 10^12, else ms).
pub fn parse_timestamp(raw: &str, now_ms: i64) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("now") {
        return Ok(now_ms);
    }

    if let Some(secs) = raw.strip_suffix('s') {
        let secs: f64 =
            secs.parse().with_context(|| format!("Invalid timestamp: {}", raw))?;
        return Ok((secs * 1000.0) as i64);
    }

    let value: i64 = raw.parse().with_context(|| format!("Invalid timestamp: {}", raw))?;
    if value < 0 {
        bail!("Invalid timestamp: {}", raw);
    }
    Ok(if value < SECONDS_CUTOFF { value.saturating_mul(1000) } else { value })
}

/// A missing or negative duration becomes the time elapsed since `ts_ms`.
pub fn resolve_duration(duration: Option<i64>, ts_ms: i64, now_ms: i64) -> i64 {
    match duration {
        Some(d) if d >= 0 => d,
        _ if ts_ms > 0 && ts_ms < now_ms => now_ms - ts_ms,
        _ => 0,
    }
}

#[cfg(unix)]
fn hostname() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: the buffer is valid for `buf.len()` bytes.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return String::new();
    }
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

#[cfg(not(unix))]
fn hostname() -> String {
    env::var("COMPUTERNAME").unwrap_or_default()
}

fn format_ms(ts_ms: i64) -> String {
    DateTime::from_timestamp_millis(ts_ms)
        .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

fn show_stats(config_path: &Path, json: bool) -> Result<()> {
    let config = Config::load_or_create(config_path)?;
    let db_path = config.database_path()?;
    let store = SqliteStore::open(&db_path)?;
    let stats = store.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Shell History Statistics");
    println!("========================");
    println!("Total commands: {}", stats.total);
    println!("  Failed: {}", stats.failures);
    println!("  Distinct: {}", stats.distinct_commands);
    println!();
    println!("Database: {}", format_path_with_tilde(&db_path.display().to_string(), &home_string()));

    if let Some(oldest) = stats.oldest_ms {
        println!("Oldest entry: {}", format_ms(oldest));
    }
    if let Some(newest) = stats.newest_ms {
        println!("Newest entry: {}", format_ms(newest));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_parse_timestamp_now() {
        assert_eq!(parse_timestamp("now", NOW).unwrap(), NOW);
        assert_eq!(parse_timestamp("", NOW).unwrap(), NOW);
    }

    #[test]
    fn test_parse_timestamp_units() {
        assert_eq!(parse_timestamp("1699999990", NOW).unwrap(), 1_699_999_990_000);
        assert_eq!(parse_timestamp("1699999990s", NOW).unwrap(), 1_699_999_990_000);
        assert_eq!(parse_timestamp("1699999990123", NOW).unwrap(), 1_699_999_990_123);
        assert_eq!(parse_timestamp("1699999990.5s", NOW).unwrap(), 1_699_999_990_500);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday", NOW).is_err());
        assert!(parse_timestamp("-5", NOW).is_err());
        assert!(parse_timestamp("xs", NOW).is_err());
    }

    #[test]
    fn test_resolve_duration() {
        assert_eq!(resolve_duration(Some(42), NOW - 5000, NOW), 42);
        assert_eq!(resolve_duration(None, NOW - 5000, NOW), 5000);
        assert_eq!(resolve_duration(Some(-1), NOW - 250, NOW), 250);
        assert_eq!(resolve_duration(None, NOW + 1000, NOW), 0);
        assert_eq!(resolve_duration(None, 0, NOW), 0);
    }

    #[test]
    fn test_resolve_config_path_flag_wins() {
        let path = resolve_config_path(Some("/tmp/custom.toml")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn test_hostname_has_no_nul() {
        assert!(!hostname().contains('\0'));
    }
}
