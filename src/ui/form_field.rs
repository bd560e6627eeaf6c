//! Single-line text input used by the wizard forms

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Editable single-line field. The cursor is a character index, so
/// multi-byte input edits cleanly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    label: &'static str,
    placeholder: &'static str,
    value: String,
    cursor: usize,
    max_length: Option<usize>,
}

impl TextInput {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Replace the contents and park the cursor at the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_len();
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Handle a key, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                if self.max_length.map_or(true, |m| self.char_len() < m) {
                    let at = self.byte_index(self.cursor);
                    self.value.insert(at, c);
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            _ => false,
        }
    }

    /// Render as a bordered box titled with the label
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let content = if self.value.is_empty() && !focused {
            Line::from(Span::styled(
                self.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else if focused {
            let at = self.byte_index(self.cursor);
            Line::from(vec![
                Span::raw(&self.value[..at]),
                Span::styled("|", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                Span::raw(&self.value[at..]),
            ])
        } else {
            Line::from(Span::raw(self.value.as_str()))
        };

        let para = Paragraph::new(content)
            .block(block)
            .style(Style::default().fg(if focused { Color::White } else { Color::Gray }));
        frame.render_widget(para, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = TextInput::new("Email", "you@example.com");
        type_str(&mut input, "ada@example.comm");
        input.handle_key(KeyCode::Backspace);
        assert_eq!(input.value(), "ada@example.com");
    }

    #[test]
    fn test_cursor_movement_inserts_in_place() {
        let mut input = TextInput::new("Street", "").with_value("1 Main St");
        input.handle_key(KeyCode::Home);
        input.handle_key(KeyCode::Char('3'));
        assert_eq!(input.value(), "31 Main St");

        input.handle_key(KeyCode::End);
        input.handle_key(KeyCode::Left);
        input.handle_key(KeyCode::Delete);
        assert_eq!(input.value(), "31 Main S");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new("City", "");
        type_str(&mut input, "Señora");
        input.handle_key(KeyCode::Left);
        input.handle_key(KeyCode::Left);
        input.handle_key(KeyCode::Left);
        input.handle_key(KeyCode::Backspace);
        assert_eq!(input.value(), "Seora");
    }

    #[test]
    fn test_max_length() {
        let mut input = TextInput::new("State", "").with_max_length(2);
        type_str(&mut input, "ILL");
        assert_eq!(input.value(), "IL");
    }

    #[test]
    fn test_unhandled_keys() {
        let mut input = TextInput::new("Name", "");
        assert!(!input.handle_key(KeyCode::Enter));
        assert!(!input.handle_key(KeyCode::Tab));
        assert!(input.is_blank());
    }
}
