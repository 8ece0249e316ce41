// chatveil/src/utils/clipboard.rs
//! System clipboard access, available with the `clipboard` feature.

use anyhow::Result;

/// Copies `text` to the system clipboard.
#[cfg(feature = "clipboard")]
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    use anyhow::Context;

    let mut clipboard = arboard::Clipboard::new().context("Failed to open the system clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to write to the system clipboard")?;
    log::debug!("Copied {} bytes to the clipboard.", text.len());
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_to_clipboard(_text: &str) -> Result<()> {
    anyhow::bail!("chatveil was built without clipboard support")
}
