//! Completion percentage shown above the data-collecting steps.

use super::{Step, TOTAL_STEPS};

/// Progress through the page steps (everything between Welcome and Thank-You)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based position among the page steps
    pub current: usize,
    /// Number of page steps
    pub total: usize,
}

impl Progress {
    /// Progress for `step`, or `None` on the first and last step where the
    /// indicator is hidden
    pub fn for_step(step: Step) -> Option<Self> {
        let index = step.index();
        if index == 0 || index >= TOTAL_STEPS - 1 {
            return None;
        }
        Some(Self {
            current: index - 1,
            total: TOTAL_STEPS - 2,
        })
    }

    /// Completion in percent, 0.0 to 100.0
    pub fn percent(&self) -> f64 {
        (self.current + 1) as f64 / self.total as f64 * 100.0
    }

    /// Ratio for gauge widgets, 0.0 to 1.0
    pub fn ratio(&self) -> f64 {
        (self.percent() / 100.0).clamp(0.0, 1.0)
    }

    pub fn label(&self) -> String {
        format!("Step {} of {}", self.current + 1, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_on_welcome_and_thank_you() {
        assert_eq!(Progress::for_step(Step::Welcome), None);
        assert_eq!(Progress::for_step(Step::ThankYou), None);
    }

    #[test]
    fn test_percent_per_page_step() {
        let pages = [
            (Step::Address, 25.0),
            (Step::Services, 50.0),
            (Step::FutureServices, 75.0),
            (Step::UserDetails, 100.0),
        ];
        for (step, expected) in pages {
            let progress = Progress::for_step(step).unwrap();
            assert!((progress.percent() - expected).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_label() {
        let progress = Progress::for_step(Step::Services).unwrap();
        assert_eq!(progress.label(), "Step 2 of 4");
        assert!((progress.ratio() - 0.5).abs() < f64::EPSILON);
    }
}
