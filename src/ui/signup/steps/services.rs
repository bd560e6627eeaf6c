//! Service selection steps (current and future offerings)

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::ui::signup::types::StepCommand;
use crate::ui::{centered_rect, key_hints};
use crate::wizard::{ServiceKind, ServiceSet, WizardData};

/// Checklist over one service catalog. Toggles go straight to the
/// aggregate, so the step only keeps the highlight.
#[derive(Debug, Clone)]
pub struct ServiceStep {
    kind: ServiceKind,
    list_state: ListState,
    /// Set when Continue was refused for an empty selection
    needs_selection: bool,
}

impl ServiceStep {
    pub fn mount(kind: ServiceKind) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            kind,
            list_state,
            needs_selection: false,
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn highlighted(&self) -> Option<&'static str> {
        self.list_state
            .selected()
            .and_then(|i| self.kind.offerings().get(i))
            .map(|o| o.id)
    }

    fn selected<'a>(&self, data: &'a WizardData) -> &'a ServiceSet {
        match self.kind {
            ServiceKind::Current => &data.services,
            ServiceKind::Future => &data.future_services,
        }
    }

    pub fn can_continue(&self, data: &WizardData) -> bool {
        !self.kind.requires_selection() || !self.selected(data).is_empty()
    }

    fn select_next(&mut self) {
        let len = self.kind.offerings().len();
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % len);
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        let len = self.kind.offerings().len();
        let i = self
            .list_state
            .selected()
            .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
        self.list_state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyEvent, data: &WizardData) -> StepCommand {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                StepCommand::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                StepCommand::None
            }
            KeyCode::Char(' ') => match self.highlighted() {
                Some(id) => {
                    self.needs_selection = false;
                    StepCommand::Toggle(self.kind, id)
                }
                None => StepCommand::None,
            },
            KeyCode::Enter => {
                if self.can_continue(data) {
                    StepCommand::Next
                } else {
                    self.needs_selection = true;
                    StepCommand::None
                }
            }
            KeyCode::Esc => StepCommand::Back,
            _ => StepCommand::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, data: &WizardData) {
        let area = centered_rect(80, 90, area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(match self.kind {
                ServiceKind::Current => " Services ",
                ServiceKind::Future => " Future Services ",
            })
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Description
                Constraint::Min(6),    // Checklist
                Constraint::Length(1), // Selection status
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(Span::styled(
            self.kind.title(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(title, chunks[0]);

        let desc = Paragraph::new(self.kind.description())
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        frame.render_widget(desc, chunks[1]);

        let selected = self.selected(data);
        let items: Vec<ListItem> = self
            .kind
            .offerings()
            .iter()
            .map(|offering| {
                let checked = selected.contains(offering.id);
                let checkbox = if checked { "[x]" } else { "[ ]" };
                let style = if checked {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{checkbox} "), style),
                    Span::styled(offering.name, style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = self.list_state.clone();
        frame.render_stateful_widget(list, chunks[2], &mut list_state);

        let status = if self.needs_selection && selected.is_empty() {
            Line::from(Span::styled(
                "Select at least one service to continue",
                Style::default().fg(Color::Red),
            ))
        } else {
            Line::from(Span::styled(
                format!("{} selected", selected.len()),
                Style::default().fg(Color::DarkGray),
            ))
        };
        frame.render_widget(Paragraph::new(status), chunks[3]);

        let footer = Paragraph::new(key_hints(&[
            ("Space", "toggle"),
            ("↑↓", "navigate"),
            ("Enter", "continue"),
            ("Esc", "back"),
        ]));
        frame.render_widget(footer, chunks[4]);
    }
}
