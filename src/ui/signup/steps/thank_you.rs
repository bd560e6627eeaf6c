//! Terminal thank-you step with the confetti overlay

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::signup::types::StepCommand;
use crate::ui::{centered_rect, key_hints, Celebration};

#[derive(Debug)]
pub struct ThankYouStep {
    celebration: Celebration,
}

impl ThankYouStep {
    pub fn mount(celebration: Celebration) -> Self {
        Self { celebration }
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn tick(&mut self, dt: Duration) {
        self.celebration.tick(dt);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.celebration.resize(cols, rows);
    }

    pub fn handle_key(&self, key: KeyEvent) -> StepCommand {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => StepCommand::Quit,
            _ => StepCommand::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let card = centered_rect(70, 60, area);
        frame.render_widget(Clear, card);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let headline = Paragraph::new(Span::styled(
            "Thank you for your interest!",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(headline, chunks[0]);

        let launch = Paragraph::new(Span::styled(
            "Bulqit will come in 2026",
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(launch, chunks[1]);

        let body = Paragraph::new(
            "We're building now. Your input helps decide what launches first. \
             Invite your neighbors to grow demand, and we'll be in touch as we \
             plan to launch in early 2026.",
        )
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(body, chunks[2]);

        let updates = Paragraph::new(Line::from(Span::styled(
            "We'll keep you updated on your Bulqit Block",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(updates, chunks[3]);

        frame.render_widget(
            Paragraph::new(key_hints(&[("Enter", "exit")])).alignment(Alignment::Center),
            chunks[4],
        );

        self.celebration.render(frame, area);
    }
}
