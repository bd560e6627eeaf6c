//! Contact details step, which also performs the submission

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::signup::types::StepCommand;
use crate::ui::{centered_rect, key_hints, TextInput};
use crate::wizard::validation::require;
use crate::wizard::{validate_email, FieldError, WizardData, WizardPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl DetailField {
    const ORDER: [DetailField; 4] = [
        DetailField::FirstName,
        DetailField::LastName,
        DetailField::Email,
        DetailField::Phone,
    ];

    fn index(self) -> usize {
        match self {
            DetailField::FirstName => 0,
            DetailField::LastName => 1,
            DetailField::Email => 2,
            DetailField::Phone => 3,
        }
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct UserDetailsStep {
    first_name: TextInput,
    last_name: TextInput,
    email: TextInput,
    phone: TextInput,
    focus: DetailField,
    email_touched: bool,
    email_error: Option<FieldError>,
    submit_attempted: bool,
    submitting: bool,
    error: Option<String>,
}

impl UserDetailsStep {
    pub fn mount(data: &WizardData) -> Self {
        Self {
            first_name: TextInput::new("First Name", "Jane").with_value(data.first_name.clone()),
            last_name: TextInput::new("Last Name", "Doe").with_value(data.last_name.clone()),
            email: TextInput::new("Email", "you@example.com").with_value(data.email.clone()),
            phone: TextInput::new("Phone (optional)", "(555) 123-4567")
                .with_value(data.phone.clone().unwrap_or_default()),
            focus: DetailField::FirstName,
            email_touched: false,
            email_error: None,
            submit_attempted: false,
            submitting: false,
            error: None,
        }
    }

    pub fn focus(&self) -> DetailField {
        self.focus
    }

    pub fn email_error(&self) -> Option<&FieldError> {
        self.email_error.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn field_mut(&mut self, field: DetailField) -> &mut TextInput {
        match field {
            DetailField::FirstName => &mut self.first_name,
            DetailField::LastName => &mut self.last_name,
            DetailField::Email => &mut self.email,
            DetailField::Phone => &mut self.phone,
        }
    }

    fn validate_email(&mut self) {
        self.email_error = validate_email(self.email.value()).err();
    }

    fn move_focus(&mut self, to: DetailField) {
        if self.focus == DetailField::Email && to != DetailField::Email {
            self.email_touched = true;
            self.validate_email();
        }
        self.focus = to;
    }

    /// Names and a valid email filled in, an address in the aggregate and
    /// nothing in flight
    pub fn can_submit(&self, data: &WizardData) -> bool {
        !self.submitting
            && !self.first_name.is_blank()
            && !self.last_name.is_blank()
            && validate_email(self.email.value()).is_ok()
            && !data.address.trim().is_empty()
    }

    fn draft_patch(&self) -> WizardPatch {
        WizardPatch {
            first_name: Some(self.first_name.value().trim().to_string()),
            last_name: Some(self.last_name.value().trim().to_string()),
            email: Some(self.email.value().trim().to_string()),
            phone: Some(self.phone.value().trim().to_string()),
            ..Default::default()
        }
    }

    /// Re-enable the form and show why the submission failed
    pub fn submission_failed(&mut self, message: &str) {
        self.submitting = false;
        self.error = Some(message.to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent, data: &WizardData) -> StepCommand {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return StepCommand::None;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(self.focus.next());
                StepCommand::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(self.focus.prev());
                StepCommand::None
            }
            KeyCode::Esc if !self.submitting => StepCommand::Back,
            KeyCode::Enter => {
                if self.submitting {
                    return StepCommand::None;
                }
                self.submit_attempted = true;
                self.email_touched = true;
                self.validate_email();
                if self.can_submit(data) {
                    self.submitting = true;
                    self.error = None;
                    StepCommand::Submit(self.draft_patch())
                } else {
                    StepCommand::None
                }
            }
            code if !self.submitting => {
                let focus = self.focus;
                self.field_mut(focus).handle_key(code);
                if focus == DetailField::Email && self.email_touched {
                    self.validate_email();
                }
                StepCommand::None
            }
            _ => StepCommand::None,
        }
    }

    fn required_error(&self, input: &TextInput) -> Option<String> {
        if self.submit_attempted {
            require(input.label(), input.value()).err().map(|e| e.to_string())
        } else {
            None
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = centered_rect(80, 95, area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Your Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(3), // First / last name
                Constraint::Length(1), // Name errors
                Constraint::Length(3), // Email
                Constraint::Length(1), // Email error
                Constraint::Length(3), // Phone
                Constraint::Min(1),    // Submission status
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "Almost there!",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Tell us how to reach you about your Block.",
                Style::default().fg(Color::Gray),
            )),
        ]);
        frame.render_widget(title, chunks[0]);

        let names = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        self.first_name
            .render(frame, names[0], self.focus == DetailField::FirstName);
        self.last_name
            .render(frame, names[1], self.focus == DetailField::LastName);

        let name_errors: Vec<String> = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|input| self.required_error(input))
            .collect();
        if !name_errors.is_empty() {
            frame.render_widget(
                Paragraph::new(name_errors.join("  ")).style(Style::default().fg(Color::Red)),
                chunks[2],
            );
        }

        self.email
            .render(frame, chunks[3], self.focus == DetailField::Email);
        if self.email_touched {
            if let Some(err) = &self.email_error {
                frame.render_widget(
                    Paragraph::new(err.to_string()).style(Style::default().fg(Color::Red)),
                    chunks[4],
                );
            }
        }

        self.phone
            .render(frame, chunks[5], self.focus == DetailField::Phone);

        let status = if self.submitting {
            Some(Line::from(Span::styled(
                "Submitting...",
                Style::default().fg(Color::Yellow),
            )))
        } else {
            self.error.as_ref().map(|message| {
                Line::from(vec![
                    Span::styled("! ", Style::default().fg(Color::Red)),
                    Span::styled(message.clone(), Style::default().fg(Color::Red)),
                    Span::styled("  Press Enter to retry", Style::default().fg(Color::DarkGray)),
                ])
            })
        };
        if let Some(line) = status {
            frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), chunks[6]);
        }

        let footer = Paragraph::new(key_hints(&[
            ("Tab", "next field"),
            ("Enter", "submit"),
            ("Esc", "back"),
        ]));
        frame.render_widget(footer, chunks[7]);
    }
}
