//! Clipboard access for the URL field

use arboard::Clipboard;

/// Read the clipboard as text, trimmed of surrounding whitespace
pub fn paste_text() -> Result<String, String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    let text = clipboard
        .get_text()
        .map_err(|e| format!("Failed to read clipboard: {}", e))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Clipboard is empty".to_string());
    }
    Ok(trimmed.to_string())
}

/// Copy a file path or error text so it can be shared
pub fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .set_text(text)
        .map_err(|e| format!("Failed to write clipboard: {}", e))
}
