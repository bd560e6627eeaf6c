//! Signup wizard screen.
//!
//! Owns the [`WizardController`] and the mounted step. Moving to another
//! step drops the previous step's state and mounts a fresh one from the
//! aggregate. Steps never perform I/O themselves: they return an
//! [`Effect`] and the event loop awaits [`SignupScreen::run_effect`] after
//! drawing the pending state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::maps::AddressLookup;
use crate::rest::dto::SurveySubmission;
use crate::submit::SubmissionClient;
use crate::ui::Celebration;
use crate::wizard::{Progress, ServiceKind, Step, WizardController, WizardData};

pub mod steps;
pub mod types;

pub use steps::*;
pub use types::*;


/// Assumed until the first resize event arrives
const DEFAULT_TERMINAL_SIZE: (u16, u16) = (80, 24);

/// The mounted step and its typed state
#[derive(Debug)]
pub enum StepScreen {
    Welcome(WelcomeStep),
    Address(AddressStep),
    Services(ServiceStep),
    UserDetails(UserDetailsStep),
    ThankYou(ThankYouStep),
}

impl StepScreen {
    fn mount(
        step: Step,
        data: &WizardData,
        lookup: Option<&dyn AddressLookup>,
        settings: &ScreenSettings,
        size: Option<(u16, u16)>,
    ) -> Self {
        match step {
            Step::Welcome => StepScreen::Welcome(WelcomeStep),
            Step::Address => StepScreen::Address(AddressStep::mount(data, lookup)),
            Step::Services => StepScreen::Services(ServiceStep::mount(ServiceKind::Current)),
            Step::FutureServices => StepScreen::Services(ServiceStep::mount(ServiceKind::Future)),
            Step::UserDetails => StepScreen::UserDetails(UserDetailsStep::mount(data)),
            Step::ThankYou => {
                let (cols, rows) = size.unwrap_or(DEFAULT_TERMINAL_SIZE);
                StepScreen::ThankYou(ThankYouStep::mount(Celebration::new(
                    settings.celebration,
                    cols,
                    rows,
                )))
            }
        }
    }
}

/// Signup wizard shown in the terminal
pub struct SignupScreen {
    controller: WizardController,
    screen: StepScreen,
    lookup: Option<Arc<dyn AddressLookup>>,
    submitter: Arc<dyn SubmissionClient>,
    settings: ScreenSettings,
    size: Option<(u16, u16)>,
    should_quit: bool,
}

impl SignupScreen {
    /// Create the screen on the welcome step. Without a lookup the address
    /// step accepts any non-empty address.
    pub fn new(
        lookup: Option<Arc<dyn AddressLookup>>,
        submitter: Arc<dyn SubmissionClient>,
        settings: ScreenSettings,
    ) -> Self {
        let controller = WizardController::new();
        let screen = StepScreen::mount(
            controller.current_step(),
            controller.data(),
            lookup.as_deref(),
            &settings,
            None,
        );
        Self {
            controller,
            screen,
            lookup,
            submitter,
            settings,
            size: None,
            should_quit: false,
        }
    }

    pub fn current_step(&self) -> Step {
        self.controller.current_step()
    }

    pub fn data(&self) -> &WizardData {
        self.controller.data()
    }

    pub fn screen(&self) -> &StepScreen {
        &self.screen
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn remount(&mut self) {
        self.screen = StepScreen::mount(
            self.controller.current_step(),
            self.controller.data(),
            self.lookup.as_deref(),
            &self.settings,
            self.size,
        );
    }

    /// Route a key press to the mounted step
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        let data = self.controller.data();
        let command = match &mut self.screen {
            StepScreen::Welcome(step) => step.handle_key(key),
            StepScreen::Address(step) => step.handle_key(key, Instant::now()),
            StepScreen::Services(step) => step.handle_key(key, data),
            StepScreen::UserDetails(step) => step.handle_key(key, data),
            StepScreen::ThankYou(step) => step.handle_key(key),
        };
        self.apply(command)
    }

    fn apply(&mut self, command: StepCommand) -> Option<Effect> {
        match command {
            StepCommand::None => None,
            StepCommand::Next => {
                self.controller.advance();
                self.remount();
                None
            }
            StepCommand::Back => {
                self.controller.retreat();
                self.remount();
                None
            }
            StepCommand::Quit => {
                self.should_quit = true;
                None
            }
            StepCommand::Toggle(kind, id) => {
                self.controller.toggle_service(kind, id);
                None
            }
            StepCommand::MergeNext(patch) => {
                self.controller.merge(patch);
                self.controller.advance();
                self.remount();
                None
            }
            StepCommand::Submit(patch) => {
                self.controller.merge(patch);
                Some(Effect::Submit(SurveySubmission::from(
                    self.controller.data(),
                )))
            }
            StepCommand::Effect(effect) => Some(effect),
        }
    }

    /// Run one effect to completion. May return a follow-up effect, as when
    /// a resolved suggestion is verified next.
    pub async fn run_effect(&mut self, effect: Effect) -> Option<Effect> {
        match effect {
            Effect::Suggest { input } => {
                let lookup = self.lookup.clone()?;
                let result = lookup.suggest(&input).await;
                if let StepScreen::Address(step) = &mut self.screen {
                    step.apply_suggestions(&input, result);
                }
                None
            }
            Effect::Resolve { place_id } => {
                let lookup = self.lookup.clone()?;
                let result = lookup.resolve(&place_id).await;
                match &mut self.screen {
                    StepScreen::Address(step) => step.apply_resolved(result),
                    _ => None,
                }
            }
            Effect::Verify { query } => {
                let lookup = self.lookup.clone()?;
                let result = lookup.geocode(&query).await;
                if let StepScreen::Address(step) = &mut self.screen {
                    step.apply_verification(&query, result);
                }
                None
            }
            Effect::Submit(submission) => {
                let submitter = Arc::clone(&self.submitter);
                match submitter.submit(&submission).await {
                    Ok(receipt) => {
                        tracing::info!(id = ?receipt.id, "survey submitted");
                        if self.current_step() == Step::UserDetails {
                            self.controller.advance();
                            self.remount();
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "survey submission failed");
                        if let StepScreen::UserDetails(step) = &mut self.screen {
                            step.submission_failed(e.user_message());
                        }
                    }
                }
                None
            }
        }
    }

    /// Debounced suggestion fetch for the address step
    pub fn poll_lookup(&mut self, now: Instant) -> Option<Effect> {
        match &mut self.screen {
            StepScreen::Address(step) => step.poll_lookup(now, self.settings.lookup_debounce),
            _ => None,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        if let StepScreen::ThankYou(step) = &mut self.screen {
            step.tick(dt);
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = Some((cols, rows));
        if let StepScreen::ThankYou(step) = &mut self.screen {
            step.resize(cols, rows);
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let progress = Progress::for_step(self.current_step());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(if progress.is_some() { 3 } else { 0 }),
                Constraint::Min(0),
            ])
            .split(area);

        if let Some(progress) = progress {
            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL))
                .gauge_style(
                    Style::default()
                        .fg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
                .ratio(progress.ratio())
                .label(format!("{}  {:.0}%", progress.label(), progress.percent()));
            frame.render_widget(gauge, chunks[0]);
        }

        let body = chunks[1];
        let data = self.controller.data();
        match &self.screen {
            StepScreen::Welcome(step) => step.render(frame, body),
            StepScreen::Address(step) => step.render(frame, body),
            StepScreen::Services(step) => step.render(frame, body, data),
            StepScreen::UserDetails(step) => step.render(frame, body),
            StepScreen::ThankYou(step) => step.render(frame, area),
        }
    }
}
