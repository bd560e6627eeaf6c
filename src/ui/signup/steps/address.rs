//! Address step with autocomplete and verification

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::maps::{
    AddressComponent, AddressLookup, AuthFailureSubscription, MapsError, StructuredAddress,
    Suggestion, Verification, VerificationStatus,
};
use crate::ui::signup::types::{
    Effect, StepCommand, AUTH_FAILURE_NOTICE, LOOKUP_FAILURE_NOTICE, MIN_SUGGEST_CHARS,
    VERIFICATION_UNCONFIGURED_NOTICE,
};
use crate::ui::{centered_rect, key_hints, TextInput};
use crate::wizard::{WizardData, WizardPatch};

const MAX_SUGGESTIONS: usize = 5;

/// Draft of the address fields plus lookup state.
///
/// While mounted with a lookup, an auth-failure callback stays registered
/// with the provider. Dropping the step deregisters it.
pub struct AddressStep {
    input: TextInput,
    city: String,
    state: String,
    zip_code: String,
    verification: Verification,
    suggestions: Vec<Suggestion>,
    highlighted: Option<usize>,
    lookup_configured: bool,
    auth_failed: Arc<AtomicBool>,
    /// Set once the provider is unreachable; cleared by remounting
    lookup_failed: bool,
    notice: Arc<Mutex<Option<String>>>,
    /// Time of the last edit not yet sent for suggestions
    pending_edit: Option<Instant>,
    _auth_subscription: Option<AuthFailureSubscription>,
}

impl std::fmt::Debug for AddressStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressStep")
            .field("address", &self.input.value())
            .field("verification", &self.verification)
            .field("suggestions", &self.suggestions.len())
            .finish_non_exhaustive()
    }
}

impl AddressStep {
    pub fn mount(data: &WizardData, lookup: Option<&dyn AddressLookup>) -> Self {
        let notice = Arc::new(Mutex::new(None));
        let auth_failed = Arc::new(AtomicBool::new(false));

        let subscription = lookup.map(|lookup| {
            let notice = Arc::clone(&notice);
            let auth_failed = Arc::clone(&auth_failed);
            lookup.auth_hooks().register(Box::new(move |_err: &MapsError| {
                auth_failed.store(true, Ordering::SeqCst);
                if let Ok(mut slot) = notice.lock() {
                    *slot = Some(AUTH_FAILURE_NOTICE.to_string());
                }
            }))
        });

        if lookup.is_none() {
            if let Ok(mut slot) = notice.lock() {
                *slot = Some(VERIFICATION_UNCONFIGURED_NOTICE.to_string());
            }
        }

        Self {
            input: TextInput::new("Street Address", "730 South Loomis Street")
                .with_value(data.address.clone()),
            city: data.city.clone().unwrap_or_default(),
            state: data.state.clone().unwrap_or_default(),
            zip_code: data.zip_code.clone().unwrap_or_default(),
            verification: Verification::idle(),
            suggestions: Vec::new(),
            highlighted: None,
            lookup_configured: lookup.is_some(),
            auth_failed,
            lookup_failed: false,
            notice,
            pending_edit: None,
            _auth_subscription: subscription,
        }
    }

    pub fn address(&self) -> &str {
        self.input.value()
    }

    pub fn verification(&self) -> &Verification {
        &self.verification
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn notice(&self) -> Option<String> {
        self.notice.lock().ok().and_then(|n| n.clone())
    }

    pub fn dismiss_notice(&mut self) {
        if let Ok(mut slot) = self.notice.lock() {
            *slot = None;
        }
    }

    fn set_notice(&self, message: &str) {
        if let Ok(mut slot) = self.notice.lock() {
            *slot = Some(message.to_string());
        }
    }

    /// False when no key is configured or the provider failed during this mount
    pub fn verification_available(&self) -> bool {
        self.lookup_configured && !self.lookup_failed && !self.auth_failed.load(Ordering::SeqCst)
    }

    /// Auth failures are handled by the registered hook
    fn lookup_error(&mut self, e: &MapsError) {
        if e.is_unavailable() {
            self.lookup_failed = true;
            self.pending_edit = None;
            self.set_notice(LOOKUP_FAILURE_NOTICE);
        } else if !e.is_auth_error() {
            self.set_notice(LOOKUP_FAILURE_NOTICE);
        }
    }

    pub fn can_continue(&self) -> bool {
        !self.input.is_blank()
            && (self.verification.status == VerificationStatus::Valid
                || !self.verification_available())
    }

    fn can_verify(&self) -> bool {
        self.verification_available()
            && self.verification.status == VerificationStatus::Idle
            && !self.input.is_blank()
    }

    fn begin_verify(&mut self) -> StepCommand {
        self.verification = Verification::validating();
        StepCommand::Effect(Effect::Verify {
            query: self.input.value().trim().to_string(),
        })
    }

    fn draft_patch(&self) -> WizardPatch {
        WizardPatch {
            address: Some(self.input.value().trim().to_string()),
            city: Some(self.city.clone()),
            state: Some(self.state.clone()),
            zip_code: Some(self.zip_code.clone()),
            ..Default::default()
        }
    }

    fn on_edit(&mut self, now: Instant) {
        self.verification = Verification::idle();
        self.city.clear();
        self.state.clear();
        self.zip_code.clear();
        self.suggestions.clear();
        self.highlighted = None;
        if self.verification_available() {
            self.pending_edit = Some(now);
        }
    }

    fn highlight_next(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1) % len));
    }

    fn highlight_prev(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(
            self.highlighted
                .map_or(len - 1, |i| if i == 0 { len - 1 } else { i - 1 }),
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> StepCommand {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('v') if self.can_verify() => self.begin_verify(),
                KeyCode::Char('d') => {
                    self.dismiss_notice();
                    StepCommand::None
                }
                _ => StepCommand::None,
            };
        }

        match key.code {
            KeyCode::Down if !self.suggestions.is_empty() => {
                self.highlight_next();
                StepCommand::None
            }
            KeyCode::Up if !self.suggestions.is_empty() => {
                self.highlight_prev();
                StepCommand::None
            }
            KeyCode::Enter => {
                if let Some(chosen) = self.highlighted.and_then(|i| self.suggestions.get(i)) {
                    let place_id = chosen.place_id.clone();
                    self.suggestions.clear();
                    self.highlighted = None;
                    self.pending_edit = None;
                    return StepCommand::Effect(Effect::Resolve { place_id });
                }
                if self.can_continue() {
                    StepCommand::MergeNext(self.draft_patch())
                } else if self.can_verify() {
                    self.begin_verify()
                } else {
                    StepCommand::None
                }
            }
            KeyCode::Esc => {
                if self.suggestions.is_empty() {
                    StepCommand::Back
                } else {
                    self.suggestions.clear();
                    self.highlighted = None;
                    StepCommand::None
                }
            }
            code => {
                let before = self.input.value().to_string();
                self.input.handle_key(code);
                if self.input.value() != before {
                    self.on_edit(now);
                }
                StepCommand::None
            }
        }
    }

    /// Suggestions are fetched once typing has paused for `debounce`
    pub fn poll_lookup(&mut self, now: Instant, debounce: Duration) -> Option<Effect> {
        let edited = self.pending_edit?;
        if now.saturating_duration_since(edited) < debounce {
            return None;
        }
        self.pending_edit = None;
        let input = self.input.value().trim().to_string();
        if !self.verification_available() || input.chars().count() < MIN_SUGGEST_CHARS {
            return None;
        }
        Some(Effect::Suggest { input })
    }

    pub fn apply_suggestions(&mut self, input: &str, result: Result<Vec<Suggestion>, MapsError>) {
        if input != self.input.value().trim() {
            tracing::debug!(input, "discarding stale suggestions");
            return;
        }
        match result {
            Ok(suggestions) => {
                self.suggestions = suggestions.into_iter().take(MAX_SUGGESTIONS).collect();
                self.highlighted = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "address suggestions failed");
                self.lookup_error(&e);
            }
        }
    }

    /// Fill the fields from a chosen suggestion and verify the result
    pub fn apply_resolved(
        &mut self,
        result: Result<Vec<AddressComponent>, MapsError>,
    ) -> Option<Effect> {
        match result {
            Ok(components) => {
                let address = StructuredAddress::from_components(&components);
                self.input.set_value(address.display());
                self.city = address.city;
                self.state = address.state;
                self.zip_code = address.zip_code;
                if let StepCommand::Effect(effect) = self.begin_verify() {
                    Some(effect)
                } else {
                    None
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "place details lookup failed");
                self.lookup_error(&e);
                None
            }
        }
    }

    pub fn apply_verification(
        &mut self,
        query: &str,
        result: Result<Vec<crate::maps::GeocodeMatch>, MapsError>,
    ) {
        if query != self.input.value().trim() {
            tracing::debug!(query, "discarding stale verification");
            return;
        }
        self.verification = Verification::from_geocode(&result);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "address verification failed");
            if e.is_unavailable() {
                self.lookup_error(e);
            }
        }
        tracing::debug!(status = ?self.verification.status, "address verification finished");
    }

    fn status_line(&self) -> Line<'static> {
        match self.verification.status {
            VerificationStatus::Idle => {
                if self.can_verify() {
                    Line::from(Span::styled(
                        "Press Ctrl+V or Enter to verify this address",
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    Line::default()
                }
            }
            VerificationStatus::Validating => Line::from(Span::styled(
                "... Verifying address",
                Style::default().fg(Color::Gray),
            )),
            VerificationStatus::Valid => Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::styled(
                    self.verification.message.clone(),
                    Style::default().fg(Color::Green),
                ),
            ]),
            VerificationStatus::Invalid => Line::from(vec![
                Span::styled("! ", Style::default().fg(Color::Red)),
                Span::styled(
                    self.verification.message.clone(),
                    Style::default().fg(Color::Red),
                ),
            ]),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = centered_rect(80, 90, area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Address ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let notice = self.notice();
        let notice_rows = if notice.is_some() { 4 } else { 0 };
        let suggestion_rows = if self.suggestions.is_empty() {
            0
        } else {
            self.suggestions.len() as u16 + 2
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2),               // Title
                Constraint::Length(notice_rows),     // Notice
                Constraint::Length(3),               // Address input
                Constraint::Length(suggestion_rows), // Suggestions
                Constraint::Length(1),               // Verification
                Constraint::Length(1),               // City/state/zip
                Constraint::Min(0),
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "Where is your home?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Enter your address so we can find your Bulqit Block.",
                Style::default().fg(Color::Gray),
            )),
        ]);
        frame.render_widget(title, chunks[0]);

        if let Some(message) = notice {
            let para = Paragraph::new(message)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .title(" Address verification ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                );
            frame.render_widget(para, chunks[1]);
        }

        self.input.render(frame, chunks[2], true);

        if !self.suggestions.is_empty() {
            let items: Vec<ListItem> = self
                .suggestions
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let style = if Some(i) == self.highlighted {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    ListItem::new(Line::from(Span::styled(s.description.clone(), style)))
                })
                .collect();
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(list, chunks[3]);
        }

        frame.render_widget(Paragraph::new(self.status_line()), chunks[4]);

        if !self.city.is_empty() || !self.state.is_empty() || !self.zip_code.is_empty() {
            let details = Line::from(vec![
                Span::styled("City ", Style::default().fg(Color::Gray)),
                Span::raw(self.city.clone()),
                Span::styled("  State ", Style::default().fg(Color::Gray)),
                Span::raw(self.state.clone()),
                Span::styled("  ZIP ", Style::default().fg(Color::Gray)),
                Span::raw(self.zip_code.clone()),
            ]);
            frame.render_widget(Paragraph::new(details), chunks[5]);
        }

        let mut hints = vec![("Enter", "continue")];
        if !self.suggestions.is_empty() {
            hints.push(("↑↓", "suggestions"));
        }
        if self.verification_available() {
            hints.push(("Ctrl+V", "verify"));
        }
        if self.notice().is_some() {
            hints.push(("Ctrl+D", "dismiss"));
        }
        hints.push(("Esc", "back"));
        frame.render_widget(Paragraph::new(key_hints(&hints)), chunks[7]);
    }
}
