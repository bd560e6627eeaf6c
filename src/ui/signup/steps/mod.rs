//! Per-step state, key handling and rendering

mod address;
mod services;
mod thank_you;
mod user_details;
mod welcome;

pub use address::AddressStep;
pub use services::ServiceStep;
pub use thank_you::ThankYouStep;
pub use user_details::{DetailField, UserDetailsStep};
pub use welcome::WelcomeStep;
