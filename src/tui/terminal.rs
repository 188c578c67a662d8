use std::io::{self, Stderr};
use std::panic;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::error;

pub type PickerTerminal = Terminal<CrosstermBackend<Stderr>>;

/// Raw mode and the alternate screen for the lifetime of the picker.
///
/// Everything is drawn on stderr so stdout only ever carries the selected
/// command, which lets shells capture it with `$(histsearch search)`. The
/// terminal is put back on [`restore`](Self::restore), on drop, and from a
/// panic hook, whichever comes first.
pub struct TerminalManager {
    terminal: PickerTerminal,
    restored: bool,
}

impl TerminalManager {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        install_panic_hook();

        let mut stderr = io::stderr();
        let terminal = execute!(stderr, EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stderr)));
        match terminal {
            Ok(terminal) => Ok(Self { terminal, restored: false }),
            Err(e) => {
                reset_terminal();
                Err(e).context("Failed to set up the terminal")
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut PickerTerminal {
        &mut self.terminal
    }

    pub fn restore(mut self) -> Result<()> {
        self.leave()
    }

    fn leave(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stderr(), LeaveAlternateScreen);
}

/// Leave the alternate screen before the default hook prints, so panic
/// messages land on the normal screen.
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        reset_terminal();
        error!("panic: {}", info);
        previous(info);
    }));
}
