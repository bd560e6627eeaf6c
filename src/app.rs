use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use crate::config::Config;
use crate::maps::{AddressLookup, GoogleMapsClient};
use crate::submit::HttpSubmissionClient;
use crate::ui::signup::{Effect, ScreenSettings};
use crate::ui::{SignupScreen, TerminalGuard};

/// Terminal wizard session
pub struct App {
    config: Config,
    screen: SignupScreen,
}

impl App {
    /// Build the wizard posting to `submission_url`
    pub fn new(config: Config, submission_url: &str) -> Result<Self> {
        let timeout = config.wizard.request_timeout();

        let lookup: Option<Arc<dyn AddressLookup>> =
            match GoogleMapsClient::from_config(&config.maps, timeout)
                .context("Failed to create the Google Maps client")?
            {
                Some(client) => Some(Arc::new(client)),
                None => {
                    tracing::info!("No Google Maps API key configured; address verification disabled");
                    None
                }
            };

        let submitter = HttpSubmissionClient::new(submission_url, timeout)
            .context("Failed to create the submission client")?;
        tracing::info!(endpoint = submitter.endpoint(), "Wizard submitting surveys");

        let screen = SignupScreen::new(
            lookup,
            Arc::new(submitter),
            ScreenSettings::from_config(&config.wizard),
        );

        Ok(Self { config, screen })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::new()?;

        let size = terminal.size()?;
        self.screen.resize(size.width, size.height);

        let tick_rate = Duration::from_millis(self.config.wizard.refresh_rate_ms);
        let mut last_tick = Instant::now();

        while !self.screen.should_quit() {
            terminal.draw(|f| self.screen.render(f))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if let Some(effect) = self.screen.handle_key(key) {
                            self.run_effects(&mut terminal, effect).await?;
                        }
                    }
                    Event::Resize(cols, rows) => self.screen.resize(cols, rows),
                    _ => {}
                }
            }

            if let Some(effect) = self.screen.poll_lookup(Instant::now()) {
                self.run_effects(&mut terminal, effect).await?;
            }

            let now = Instant::now();
            self.screen.tick(now.duration_since(last_tick));
            last_tick = now;
        }

        terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the pending state, then await each effect and its follow-ups
    async fn run_effects(&mut self, terminal: &mut TerminalGuard, effect: Effect) -> Result<()> {
        let mut next = Some(effect);
        while let Some(effect) = next {
            terminal.draw(|f| self.screen.render(f))?;
            next = self.screen.run_effect(effect).await;
        }
        Ok(())
    }
}
