//! Address autocomplete and verification.
//!
//! [`AddressLookup`] abstracts the geocoding collaborator so the Address step
//! can run against Google Maps in production and against stubs in tests.
//! Authentication failures are pushed to callbacks registered through
//! [`AuthFailureHooks`]; each registration is released when its
//! [`AuthFailureSubscription`] is dropped.

mod error;
mod google;

pub use error::MapsError;
pub use google::GoogleMapsClient;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use serde::Deserialize;

/// Result types that count as a complete street address
pub const STREET_ADDRESS_TYPES: &[&str] = &["street_address", "premise", "subpremise"];

/// One component of a structured address
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// A geocoding match for a free-text address
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeocodeMatch {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl GeocodeMatch {
    /// Whether this match points at a building rather than a street or area
    pub fn is_street_address(&self) -> bool {
        self.types
            .iter()
            .any(|t| STREET_ADDRESS_TYPES.contains(&t.as_str()))
    }
}

/// An autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestion {
    pub place_id: String,
    pub description: String,
}

/// Street, city, region code and postal code decomposed from components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl StructuredAddress {
    pub fn from_components(components: &[AddressComponent]) -> Self {
        let mut street_number = "";
        let mut route = "";
        let mut address = StructuredAddress::default();

        for component in components {
            if component.has_type("street_number") {
                street_number = &component.long_name;
            }
            if component.has_type("route") {
                route = &component.long_name;
            }
            if component.has_type("locality") {
                address.city.clone_from(&component.long_name);
            }
            if component.has_type("administrative_area_level_1") {
                address.state.clone_from(&component.short_name);
            }
            if component.has_type("postal_code") {
                address.zip_code.clone_from(&component.long_name);
            }
        }

        address.street = format!("{street_number} {route}").trim().to_string();
        address
    }

    /// One-line form shown in the address field
    pub fn display(&self) -> String {
        compose_query(&self.street, &self.city, &self.state, &self.zip_code)
    }
}

/// Free-text query sent to the geocoder
pub fn compose_query(address: &str, city: &str, state: &str, zip_code: &str) -> String {
    format!("{address}, {city}, {state} {zip_code}")
        .trim()
        .to_string()
}

/// Outcome of verifying an address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerificationStatus {
    #[default]
    Idle,
    Validating,
    Valid,
    Invalid,
}

/// Status plus the message shown under the address field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    pub status: VerificationStatus,
    pub message: String,
}

impl Verification {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn validating() -> Self {
        Self {
            status: VerificationStatus::Validating,
            message: String::new(),
        }
    }

    fn valid(message: &str) -> Self {
        Self {
            status: VerificationStatus::Valid,
            message: message.to_string(),
        }
    }

    fn invalid(message: &str) -> Self {
        Self {
            status: VerificationStatus::Invalid,
            message: message.to_string(),
        }
    }

    /// Classify a geocoding result using the best (first) match
    pub fn from_geocode(result: &Result<Vec<GeocodeMatch>, MapsError>) -> Self {
        match result {
            Ok(matches) => match matches.first() {
                Some(best) if best.is_street_address() => Self::valid("Address verified"),
                Some(_) => Self::invalid("Please enter a complete street address"),
                None => Self::invalid("Address not found. Please check and try again."),
            },
            Err(_) => Self::invalid("Unable to verify address. Please check and try again."),
        }
    }
}

/// Callback fired when the lookup provider rejects its credentials
pub type AuthFailureCallback = Box<dyn Fn(&MapsError) + Send + Sync>;

type HookTable = Mutex<HookSlots>;

#[derive(Default)]
struct HookSlots {
    next_id: u64,
    callbacks: BTreeMap<u64, AuthFailureCallback>,
}

/// Registry of auth-failure callbacks
#[derive(Clone, Default)]
pub struct AuthFailureHooks {
    inner: Arc<HookTable>,
}

impl std::fmt::Debug for AuthFailureHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFailureHooks")
            .field("registered", &self.len())
            .finish()
    }
}

impl AuthFailureHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` until the returned subscription is dropped
    pub fn register(&self, callback: AuthFailureCallback) -> AuthFailureSubscription {
        let id = match self.inner.lock() {
            Ok(mut slots) => {
                let id = slots.next_id;
                slots.next_id += 1;
                slots.callbacks.insert(id, callback);
                id
            }
            Err(_) => u64::MAX,
        };
        AuthFailureSubscription {
            hooks: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Fire every registered callback
    pub fn notify(&self, error: &MapsError) {
        if let Ok(slots) = self.inner.lock() {
            for callback in slots.callbacks.values() {
                callback(error);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|s| s.callbacks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps an auth-failure callback registered while alive
#[must_use = "the callback is deregistered when the subscription is dropped"]
pub struct AuthFailureSubscription {
    hooks: Weak<HookTable>,
    id: u64,
}

impl Drop for AuthFailureSubscription {
    fn drop(&mut self) {
        if let Some(table) = self.hooks.upgrade() {
            if let Ok(mut slots) = table.lock() {
                slots.callbacks.remove(&self.id);
            }
        }
    }
}

/// Geocoding and autocomplete provider
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Best matches for a free-text address, restricted to the configured country
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeMatch>, MapsError>;

    /// Address suggestions for partial input
    async fn suggest(&self, input: &str) -> Result<Vec<Suggestion>, MapsError>;

    /// Structured components for a chosen suggestion
    async fn resolve(&self, place_id: &str) -> Result<Vec<AddressComponent>, MapsError>;

    /// Where auth-failure callbacks are registered
    fn auth_hooks(&self) -> &AuthFailureHooks;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn component(long: &str, short: &str, kind: &str) -> AddressComponent {
        AddressComponent {
            long_name: long.to_string(),
            short_name: short.to_string(),
            types: vec![kind.to_string(), "political".to_string()],
        }
    }

    fn geocode_match(types: &[&str]) -> GeocodeMatch {
        GeocodeMatch {
            formatted_address: "730 S Loomis St, Chicago, IL 60607, USA".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_structured_address_from_components() {
        let components = vec![
            component("730", "730", "street_number"),
            component("South Loomis Street", "S Loomis St", "route"),
            component("Chicago", "Chicago", "locality"),
            component("Illinois", "IL", "administrative_area_level_1"),
            component("60607", "60607", "postal_code"),
        ];

        let address = StructuredAddress::from_components(&components);
        assert_eq!(address.street, "730 South Loomis Street");
        assert_eq!(address.city, "Chicago");
        assert_eq!(address.state, "IL");
        assert_eq!(address.zip_code, "60607");
        assert_eq!(
            address.display(),
            "730 South Loomis Street, Chicago, IL 60607"
        );
    }

    #[test]
    fn test_structured_address_without_number() {
        let components = vec![component("Main Street", "Main St", "route")];
        let address = StructuredAddress::from_components(&components);
        assert_eq!(address.street, "Main Street");
    }

    #[test]
    fn test_compose_query_trims() {
        assert_eq!(compose_query("1 Main St", "", "", ""), "1 Main St, ,");
        assert_eq!(
            compose_query("1 Main St", "Springfield", "IL", "62701"),
            "1 Main St, Springfield, IL 62701"
        );
    }

    #[test]
    fn test_street_address_types() {
        assert!(geocode_match(&["street_address"]).is_street_address());
        assert!(geocode_match(&["premise"]).is_street_address());
        assert!(geocode_match(&["subpremise"]).is_street_address());
        assert!(!geocode_match(&["route"]).is_street_address());
        assert!(!geocode_match(&["locality", "political"]).is_street_address());
    }

    #[test]
    fn test_verification_from_geocode() {
        let valid = Verification::from_geocode(&Ok(vec![geocode_match(&["premise"])]));
        assert_eq!(valid.status, VerificationStatus::Valid);
        assert_eq!(valid.message, "Address verified");

        let partial = Verification::from_geocode(&Ok(vec![geocode_match(&["route"])]));
        assert_eq!(partial.status, VerificationStatus::Invalid);
        assert_eq!(partial.message, "Please enter a complete street address");

        let missing = Verification::from_geocode(&Ok(vec![]));
        assert_eq!(missing.status, VerificationStatus::Invalid);
        assert!(missing.message.starts_with("Address not found"));

        let failed = Verification::from_geocode(&Err(MapsError::network("test", "down")));
        assert_eq!(failed.status, VerificationStatus::Invalid);
        assert!(failed.message.starts_with("Unable to verify"));
    }

    #[test]
    fn test_auth_hooks_fire_while_subscribed() {
        let hooks = AuthFailureHooks::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let subscription = hooks.register(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hooks.len(), 1);

        let err = MapsError::AuthFailed {
            provider: "test".to_string(),
            message: "denied".to_string(),
        };
        hooks.notify(&err);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        drop(subscription);
        assert!(hooks.is_empty());
        hooks.notify(&err);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_outliving_hooks_is_harmless() {
        let hooks = AuthFailureHooks::new();
        let subscription = hooks.register(Box::new(|_| {}));
        drop(hooks);
        drop(subscription);
    }
}
