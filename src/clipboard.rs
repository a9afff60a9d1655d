//! Clipboard abstraction layer.
//!
//! Copy/cut/paste go through [`ClipboardProvider`] so command mode and tests
//! never touch the system clipboard.

/// Trait for clipboard operations.
pub trait ClipboardProvider {
    /// Get text from clipboard.
    fn get_text(&mut self) -> Option<String>;

    /// Set text to clipboard. Returns `false` if the text could not be stored.
    fn set_text(&mut self, text: String) -> bool;
}

/// Process-local clipboard.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: String) -> bool {
        self.text = Some(text);
        true
    }
}

/// System clipboard using arboard.
///
/// Falls back to an in-process copy when no system clipboard is reachable
/// (e.g. a headless session), so copy/paste keeps working inside the app.
#[cfg(feature = "tui")]
#[derive(Default)]
pub struct SystemClipboard {
    fallback: MemoryClipboard,
}

#[cfg(feature = "tui")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "tui")]
impl ClipboardProvider for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match arboard::Clipboard::new().and_then(|mut cb| cb.get_text()) {
            Ok(text) => Some(text),
            Err(err) => {
                log::debug!("system clipboard unavailable: {}", err);
                self.fallback.get_text()
            }
        }
    }

    fn set_text(&mut self, text: String) -> bool {
        self.fallback.set_text(text.clone());
        if let Err(err) = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            log::debug!("system clipboard unavailable, kept copy in memory: {}", err);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_starts_empty_and_keeps_last_text() {
        let mut clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.get_text(), None);
        assert!(clipboard.set_text("one".to_string()));
        assert!(clipboard.set_text("two".to_string()));
        assert_eq!(clipboard.get_text().as_deref(), Some("two"));
    }
}
