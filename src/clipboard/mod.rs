//! System clipboard access for the picker's copy key.

use anyhow::{Context, Result};
use arboard::Clipboard;
use tracing::debug;

/// Largest command we hand to the clipboard (1 MiB).
const MAX_CLIPBOARD_BYTES: usize = 1024 * 1024;

/// Clipboard seam so copying can be tested without a display server.
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_command(command: &str) -> Result<()> {
    if command.trim().is_empty() {
        anyhow::bail!("Nothing to copy: command is empty");
    }
    if command.len() > MAX_CLIPBOARD_BYTES {
        anyhow::bail!(
            "Command too large for clipboard ({} bytes, max {})",
            command.len(),
            MAX_CLIPBOARD_BYTES
        );
    }
    Ok(())
}

fn copy_with(command: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_command(command)?;
    provider.set_text(command)?;
    debug!(bytes = command.len(), "copied command to clipboard");
    Ok(())
}

/// Copy a command to the system clipboard.
///
/// Validation runs before the clipboard is opened, so empty or oversized
/// input fails the same way with or without a display server.
pub fn copy_to_clipboard(command: &str) -> Result<()> {
    validate_command(command)?;
    let mut clipboard = SystemClipboard::new()?;
    copy_with(command, &mut clipboard)
}
