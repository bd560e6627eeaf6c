//! The session aggregate collected across wizard steps.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Set of service identifiers. Ordered so payloads serialize deterministically.
pub type ServiceSet = BTreeSet<String>;

/// Everything the wizard has collected so far.
///
/// Created empty when the wizard starts and only ever grows or overwrites
/// fields through [`WizardData::merge`]. It is never written to disk on the
/// client side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardData {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub services: ServiceSet,
    pub future_services: ServiceSet,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Fields that must be non-empty before the aggregate may be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Address,
    FirstName,
    LastName,
    Email,
}

impl RequiredField {
    pub fn all() -> &'static [RequiredField] {
        &[
            RequiredField::Address,
            RequiredField::FirstName,
            RequiredField::LastName,
            RequiredField::Email,
        ]
    }

    /// Human label used in inline validation messages
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Address => "Address",
            RequiredField::FirstName => "First name",
            RequiredField::LastName => "Last name",
            RequiredField::Email => "Email",
        }
    }

    /// Field name on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            RequiredField::Address => "address",
            RequiredField::FirstName => "firstName",
            RequiredField::LastName => "lastName",
            RequiredField::Email => "email",
        }
    }
}

impl WizardData {
    /// Shallow-merge a partial update. Last write wins per field.
    pub fn merge(&mut self, patch: WizardPatch) {
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city) = patch.city {
            self.city = non_empty(city);
        }
        if let Some(state) = patch.state {
            self.state = non_empty(state);
        }
        if let Some(zip_code) = patch.zip_code {
            self.zip_code = non_empty(zip_code);
        }
        if let Some(services) = patch.services {
            self.services = services;
        }
        if let Some(future_services) = patch.future_services {
            self.future_services = future_services;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = non_empty(phone);
        }
    }

    /// Required fields that are still blank
    pub fn missing_required(&self) -> Vec<RequiredField> {
        RequiredField::all()
            .iter()
            .copied()
            .filter(|field| self.field_value(*field).trim().is_empty())
            .collect()
    }

    /// Whether every required field is populated
    pub fn is_submittable(&self) -> bool {
        self.missing_required().is_empty()
    }

    fn field_value(&self, field: RequiredField) -> &str {
        match field {
            RequiredField::Address => &self.address,
            RequiredField::FirstName => &self.first_name,
            RequiredField::LastName => &self.last_name,
            RequiredField::Email => &self.email,
        }
    }
}

/// Partial update produced by a step. `None` leaves the field untouched.
///
/// Optional text fields (`city`, `state`, `zip_code`, `phone`) are cleared
/// when patched with a blank string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardPatch {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub services: Option<ServiceSet>,
    pub future_services: Option<ServiceSet>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Flip membership of `id` in `set`. Returns whether `id` is now selected.
pub fn toggle_service(set: &mut ServiceSet, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_only_supplied_fields() {
        let mut data = WizardData {
            address: "1 Main St".to_string(),
            first_name: "Ada".to_string(),
            ..Default::default()
        };

        data.merge(WizardPatch {
            address: Some("730 South Loomis Street".to_string()),
            city: Some("Chicago".to_string()),
            ..Default::default()
        });

        assert_eq!(data.address, "730 South Loomis Street");
        assert_eq!(data.city.as_deref(), Some("Chicago"));
        assert_eq!(data.first_name, "Ada");
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut data = WizardData::default();
        data.merge(WizardPatch {
            email: Some("first@example.com".to_string()),
            ..Default::default()
        });
        data.merge(WizardPatch {
            email: Some("second@example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(data.email, "second@example.com");
    }

    #[test]
    fn test_blank_optional_fields_clear() {
        let mut data = WizardData {
            phone: Some("(773) 837-2198".to_string()),
            ..Default::default()
        };
        data.merge(WizardPatch {
            phone: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(data.phone, None);
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let mut set: ServiceSet = ["pest-control".to_string()].into_iter().collect();
        let before = set.clone();

        assert!(toggle_service(&mut set, "lawn-care"));
        assert!(!toggle_service(&mut set, "lawn-care"));
        assert_eq!(set, before);

        assert!(!toggle_service(&mut set, "pest-control"));
        assert!(toggle_service(&mut set, "pest-control"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_toggle_never_duplicates() {
        let mut set = ServiceSet::new();
        toggle_service(&mut set, "lawn-care");
        set.insert("lawn-care".to_string());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_required_lists_blank_fields() {
        let data = WizardData {
            address: "1 Main St".to_string(),
            first_name: "Ada".to_string(),
            last_name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            data.missing_required(),
            vec![RequiredField::LastName, RequiredField::Email]
        );
        assert!(!data.is_submittable());
    }

    #[test]
    fn test_serializes_camel_case() {
        let data = WizardData {
            zip_code: Some("60607".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"zipCode\":\"60607\""));
        assert!(json.contains("\"futureServices\":[]"));
    }
}
