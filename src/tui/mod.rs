//! Interactive history picker.
//!
//! - `app` - State and the reducer
//! - `events` - Key normalisation and binding resolution
//! - `layout` / `styles` - Geometry and theme resolution
//! - `rendering` - Pure drawing of an [`App`] into a frame
//! - [`transform`] - Display text pipeline (collapse, truncate, highlight)

mod app;
mod events;
mod layout;
mod rendering;
mod styles;
mod terminal;
mod timestamps;
pub mod transform;

use anyhow::Result;
use tracing::info;

pub use app::{App, Command, SearchOptions, SearchOutcome};
pub use events::{KeyPress, Message};
pub use styles::Styles;
pub use terminal::TerminalManager;
pub use timestamps::{format_duration, format_when, now_ms};

use crate::config::Config;
use crate::storage::HistoryStore;

/// Run the picker on the controlling terminal until the user accepts or
/// cancels.
pub fn run_search(config: Config, store: &impl HistoryStore, options: SearchOptions) -> Result<SearchOutcome> {
    let mut app = App::new(config, options);
    app.reload(store);

    let mut manager = TerminalManager::new()?;
    let result = app.run(manager.terminal_mut(), store);
    manager.restore()?;
    result?;

    let outcome = app.outcome().unwrap_or(SearchOutcome::Cancelled);
    info!(cancelled = matches!(outcome, SearchOutcome::Cancelled), "search finished");
    Ok(outcome)
}
