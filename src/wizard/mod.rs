//! Step sequencing for the signup wizard.
//!
//! The wizard is a strictly linear state machine. [`Step`] has one variant per
//! page and [`WizardController`] owns the current step together with the
//! [`WizardData`] aggregate. Moves are always exactly one step and clamp at
//! both ends, so there is no way to land outside the sequence.

pub mod catalog;
pub mod data;
pub mod progress;
pub mod validation;

pub use catalog::{ServiceKind, ServiceOffering, CURRENT_SERVICES, FUTURE_SERVICES};
pub use data::{toggle_service, RequiredField, ServiceSet, WizardData, WizardPatch};
pub use progress::Progress;
pub use validation::{is_valid_email, validate_email, FieldError};

/// Pages of the signup flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Landing page
    Welcome,
    /// Home address with optional verification
    Address,
    /// Services offered today
    Services,
    /// Services we might add later
    FutureServices,
    /// Contact details; submits the survey
    UserDetails,
    /// Terminal confirmation page
    ThankYou,
}

/// Number of steps in the flow
pub const TOTAL_STEPS: usize = Step::ALL.len();

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Welcome,
        Step::Address,
        Step::Services,
        Step::FutureServices,
        Step::UserDetails,
        Step::ThankYou,
    ];

    pub fn index(self) -> usize {
        match self {
            Step::Welcome => 0,
            Step::Address => 1,
            Step::Services => 2,
            Step::FutureServices => 3,
            Step::UserDetails => 4,
            Step::ThankYou => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    /// Following step; the last step maps to itself
    pub fn next(self) -> Step {
        Self::from_index(self.index() + 1).unwrap_or(self)
    }

    /// Preceding step; the first step maps to itself
    pub fn prev(self) -> Step {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(self)
    }

    pub fn is_first(self) -> bool {
        self.index() == 0
    }

    /// Thank-You has no outbound transitions
    pub fn is_terminal(self) -> bool {
        self.index() == TOTAL_STEPS - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Welcome => "welcome",
            Step::Address => "address",
            Step::Services => "services",
            Step::FutureServices => "future_services",
            Step::UserDetails => "user_details",
            Step::ThankYou => "thank_you",
        }
    }
}

/// Owns the current step and the aggregate for one wizard session
#[derive(Debug, Clone)]
pub struct WizardController {
    step: Step,
    data: WizardData,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Start at Welcome with an empty aggregate
    pub fn new() -> Self {
        Self {
            step: Step::Welcome,
            data: WizardData::default(),
        }
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn data(&self) -> &WizardData {
        &self.data
    }

    pub fn total_steps(&self) -> usize {
        TOTAL_STEPS
    }

    pub fn is_terminal(&self) -> bool {
        self.step.is_terminal()
    }

    /// Move forward one step, clamped at Thank-You. Returns the new step.
    pub fn advance(&mut self) -> Step {
        let from = self.step;
        self.step = self.step.next();
        if from != self.step {
            tracing::debug!(from = from.name(), to = self.step.name(), "wizard advanced");
        }
        self.step
    }

    /// Move back one step, clamped at Welcome. Returns the new step.
    pub fn retreat(&mut self) -> Step {
        let from = self.step;
        self.step = self.step.prev();
        if from != self.step {
            tracing::debug!(from = from.name(), to = self.step.name(), "wizard retreated");
        }
        self.step
    }

    /// Merge a partial update into the aggregate
    pub fn merge(&mut self, patch: WizardPatch) {
        self.data.merge(patch);
    }

    /// Flip one service identifier in the catalog's set. Returns whether it is
    /// now selected.
    pub fn toggle_service(&mut self, kind: ServiceKind, id: &str) -> bool {
        let mut set = match kind {
            ServiceKind::Current => self.data.services.clone(),
            ServiceKind::Future => self.data.future_services.clone(),
        };
        let selected = toggle_service(&mut set, id);
        let patch = match kind {
            ServiceKind::Current => WizardPatch {
                services: Some(set),
                ..Default::default()
            },
            ServiceKind::Future => WizardPatch {
                future_services: Some(set),
                ..Default::default()
            },
        };
        self.merge(patch);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_indices_round_trip() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
            assert_eq!(Step::from_index(i), Some(*step));
        }
        assert_eq!(Step::from_index(TOTAL_STEPS), None);
    }

    #[test]
    fn test_controller_starts_at_welcome() {
        let controller = WizardController::new();
        assert_eq!(controller.current_step(), Step::Welcome);
        assert_eq!(controller.data(), &WizardData::default());
        assert_eq!(controller.total_steps(), 6);
    }

    #[test]
    fn test_retreat_clamps_at_first_step() {
        let mut controller = WizardController::new();
        assert_eq!(controller.retreat(), Step::Welcome);
        assert_eq!(controller.retreat(), Step::Welcome);
    }

    #[test]
    fn test_advance_clamps_at_last_step() {
        let mut controller = WizardController::new();
        for _ in 0..20 {
            controller.advance();
        }
        assert_eq!(controller.current_step(), Step::ThankYou);
        assert!(controller.is_terminal());
    }

    #[test]
    fn test_mixed_moves_stay_in_bounds() {
        // Deterministic pseudo-random walk over advance/retreat
        let mut controller = WizardController::new();
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..1_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let before = controller.current_step().index();
            let after = if seed % 3 == 0 {
                controller.retreat().index()
            } else {
                controller.advance().index()
            };
            assert!(after < TOTAL_STEPS);
            assert!(before.abs_diff(after) <= 1);
        }
    }

    #[test]
    fn test_toggle_service_is_idempotent_in_pairs() {
        let mut controller = WizardController::new();
        controller.toggle_service(ServiceKind::Current, "lawn-care");
        let snapshot = controller.data().services.clone();

        assert!(controller.toggle_service(ServiceKind::Current, "pest-control"));
        assert!(!controller.toggle_service(ServiceKind::Current, "pest-control"));
        assert_eq!(controller.data().services, snapshot);
        assert!(controller.data().future_services.is_empty());
    }

    #[test]
    fn test_toggle_future_service_leaves_current_untouched() {
        let mut controller = WizardController::new();
        controller.toggle_service(ServiceKind::Current, "lawn-care");
        controller.toggle_service(ServiceKind::Future, "housekeeping");

        assert!(controller.data().services.contains("lawn-care"));
        assert!(controller.data().future_services.contains("housekeeping"));
        assert_eq!(controller.data().future_services.len(), 1);
    }
}
