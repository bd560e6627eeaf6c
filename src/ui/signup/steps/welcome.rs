//! Welcome step

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::signup::types::StepCommand;
use crate::ui::{centered_rect, key_hints};

/// Landing screen, no fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WelcomeStep;

impl WelcomeStep {
    pub fn handle_key(&self, key: KeyEvent) -> StepCommand {
        match key.code {
            KeyCode::Enter => StepCommand::Next,
            KeyCode::Esc | KeyCode::Char('q') => StepCommand::Quit,
            _ => StepCommand::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = centered_rect(70, 70, area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "Bulqit",
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Signup "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Headline
                Constraint::Length(1), // Spacer
                Constraint::Min(3),    // Description
                Constraint::Length(1), // Call to action
                Constraint::Length(1), // Hint
                Constraint::Length(2), // Footer
            ])
            .split(inner);

        let headline = Paragraph::new(vec![
            Line::from(Span::styled(
                "Join your Block.",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Bulk home services.",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(headline, chunks[0]);

        let desc = Paragraph::new(
            "Answer a few questions so we can bring better deals on home services \
             to your neighborhood.",
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(desc, chunks[2]);

        let cta = Paragraph::new(Line::from(Span::styled(
            "[ Get Started ]",
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(cta, chunks[3]);

        let hint = Paragraph::new(Span::styled(
            "Takes less than 2 minutes",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[4]);

        let footer = Paragraph::new(key_hints(&[("Enter", "get started"), ("Esc", "quit")]))
            .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[5]);
    }
}
