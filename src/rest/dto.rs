//! Request and response bodies for the survey API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::NewSurveyResponse;
use crate::wizard::WizardData;

// =============================================================================
// Survey DTOs
// =============================================================================

/// Body of `POST /api/survey`.
///
/// Every field is optional on the wire so that a partial body reaches the
/// required-field check instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveySubmission {
    #[schema(example = "730 South Loomis Street, Chicago, IL 60607")]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub services: Option<Vec<String>>,
    pub future_services: Option<Vec<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "user@example.com")]
    pub email: Option<String>,
    /// Accepted but not stored
    pub phone: Option<String>,
}

fn filled(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl SurveySubmission {
    /// Wire names of required fields that are absent or blank
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("address", self.address.as_ref()),
            ("firstName", self.first_name.as_ref()),
            ("lastName", self.last_name.as_ref()),
            ("email", self.email.as_ref()),
        ]
        .into_iter()
        .filter(|(_, value)| !filled(*value))
        .map(|(name, _)| name)
        .collect()
    }

    /// Convert into an insertable row, or list what is missing
    pub fn into_new_response(self) -> Result<NewSurveyResponse, Vec<&'static str>> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(missing);
        }
        Ok(NewSurveyResponse {
            address: self.address.unwrap_or_default(),
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            services: self.services.unwrap_or_default(),
            future_services: self.future_services.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        })
    }
}

impl From<&WizardData> for SurveySubmission {
    fn from(data: &WizardData) -> Self {
        Self {
            address: Some(data.address.clone()),
            city: data.city.clone(),
            state: data.state.clone(),
            zip_code: data.zip_code.clone(),
            services: Some(data.services.iter().cloned().collect()),
            future_services: Some(data.future_services.iter().cloned().collect()),
            first_name: Some(data.first_name.clone()),
            last_name: Some(data.last_name.clone()),
            email: Some(data.email.clone()),
            phone: data.phone.clone(),
        }
    }
}

/// Response for a stored survey
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    /// Identifier of the inserted row
    #[schema(example = "5f1c9a7e-3e0b-4a53-9d1b-1f0f5c2a8e44")]
    pub id: String,
}

// =============================================================================
// Health/Status DTOs
// =============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Status response with store info
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    /// Storage backend in use (postgres, sqlite, memory)
    pub backend: String,
    /// Stored responses, absent when the store could not be queried
    pub response_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::WizardPatch;

    #[test]
    fn test_deserializes_camel_case_with_missing_fields() {
        let body = r#"{"address":"1 Main St","firstName":"Ada","zipCode":"60607"}"#;
        let submission: SurveySubmission = serde_json::from_str(body).unwrap();
        assert_eq!(submission.zip_code.as_deref(), Some("60607"));
        assert_eq!(submission.missing_required(), vec!["lastName", "email"]);
    }

    #[test]
    fn test_null_and_blank_count_as_missing() {
        let body = r#"{"address":"  ","firstName":null,"lastName":"L","email":"e@x.io"}"#;
        let submission: SurveySubmission = serde_json::from_str(body).unwrap();
        assert_eq!(submission.missing_required(), vec!["address", "firstName"]);
    }

    #[test]
    fn test_into_new_response_defaults_lists() {
        let submission = SurveySubmission {
            address: Some("1 Main St".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        let row = submission.into_new_response().unwrap();
        assert!(row.services.is_empty());
        assert!(row.future_services.is_empty());
        assert_eq!(row.city, None);
    }

    #[test]
    fn test_from_wizard_data() {
        let mut data = WizardData::default();
        data.merge(WizardPatch {
            address: Some("1 Main St".to_string()),
            services: Some(
                ["pest-control", "lawn-care"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        });

        let submission = SurveySubmission::from(&data);
        assert_eq!(
            submission.services,
            Some(vec!["lawn-care".to_string(), "pest-control".to_string()])
        );
        assert_eq!(submission.future_services, Some(vec![]));

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["futureServices"], serde_json::json!([]));
        assert_eq!(json["email"], "ada@example.com");
    }
}
