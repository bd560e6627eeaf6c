//! Type definitions for the signup wizard screen

use std::time::Duration;

use crate::rest::dto::SurveySubmission;
use crate::wizard::{ServiceKind, WizardPatch};

/// Notice shown on the address step when no maps key is configured
pub const VERIFICATION_UNCONFIGURED_NOTICE: &str =
    "Address verification is not configured. You can still enter your address manually.";

/// Notice shown when the maps provider rejects the key
pub const AUTH_FAILURE_NOTICE: &str = "Google Maps authentication failed. Check the API key and \
     make sure the Geocoding and Places APIs are enabled. You can still enter your address manually.";

/// Notice shown when suggestions cannot be fetched
pub const LOOKUP_FAILURE_NOTICE: &str =
    "Address lookup is unavailable right now. You can still enter your address manually.";

/// Minimum input length before suggestions are requested
pub const MIN_SUGGEST_CHARS: usize = 3;

/// Async work requested by a step. The orchestrator runs one at a time
/// after drawing the pending state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Autocomplete suggestions for partial input
    Suggest { input: String },
    /// Structured components for a chosen suggestion
    Resolve { place_id: String },
    /// Geocode and classify an address
    Verify { query: String },
    /// Send the survey
    Submit(SurveySubmission),
}

/// Outcome of a key press on the mounted step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCommand {
    None,
    Next,
    Back,
    Quit,
    /// Flip one service id in the aggregate
    Toggle(ServiceKind, &'static str),
    /// Merge the draft and move forward
    MergeNext(WizardPatch),
    /// Merge the draft and send the aggregate
    Submit(WizardPatch),
    Effect(Effect),
}

/// Settings the screen needs from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSettings {
    /// Quiet period after the last keystroke before suggestions are fetched
    pub lookup_debounce: Duration,
    /// How long the confetti flies before fading
    pub celebration: Duration,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            lookup_debounce: Duration::from_millis(300),
            celebration: Duration::from_millis(4000),
        }
    }
}

impl ScreenSettings {
    pub fn from_config(config: &crate::config::WizardConfig) -> Self {
        Self {
            lookup_debounce: Duration::from_millis(config.lookup_debounce_ms),
            celebration: Duration::from_millis(config.celebration_ms),
        }
    }
}
