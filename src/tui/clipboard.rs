use crate::error::{Error, Result};

/// Write access to the system clipboard
pub trait Clipboard {
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by `arboard`, opened on first use and kept open so the
/// copied text stays available on platforms where the owner must stay alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }
}

impl Clipboard for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| Error::ClipboardUnavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(Error::ClipboardUnavailable("clipboard not initialized".to_string()));
        };

        clipboard
            .set_text(text.to_string())
            .map_err(|e| Error::ClipboardUnavailable(e.to_string()))?;
        log::debug!("[tui::clipboard] write: len={}", text.len());
        Ok(())
    }
}
