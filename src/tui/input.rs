use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text field edited at its end
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    placeholder: &'static str,
    char_limit: Option<usize>,
}

impl TextInput {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            value: String::new(),
            placeholder,
            char_limit: None,
        }
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Return the current text and leave the field empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    /// Apply an editing key. Returns false for keys the field does not use.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                true
            }
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => false,
            KeyCode::Char(c) => {
                let at_limit = self
                    .char_limit
                    .is_some_and(|limit| self.value.chars().count() >= limit);
                if !at_limit {
                    self.value.push(c);
                }
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }
}
