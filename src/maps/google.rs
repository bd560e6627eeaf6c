//! Google Maps web services provider (Geocoding, Places Autocomplete, Place Details)

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    AddressComponent, AddressLookup, AuthFailureHooks, GeocodeMatch, MapsError, Suggestion,
};
use crate::config::MapsConfig;

const PROVIDER_NAME: &str = "google_maps";

/// Google Maps client restricted to a single country
pub struct GoogleMapsClient {
    api_key: String,
    country: String,
    client: reqwest::Client,
    base_url: String,
    hooks: AuthFailureHooks,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeMatch>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Suggestion>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetails>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

impl GoogleMapsClient {
    /// Create a client with the given key
    pub fn new(
        api_key: impl Into<String>,
        country: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, MapsError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "signup/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| MapsError::network(PROVIDER_NAME, e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            country: country.into(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            hooks: AuthFailureHooks::new(),
        })
    }

    /// Build from configuration. `Ok(None)` when no API key is configured,
    /// which disables verification.
    pub fn from_config(
        config: &MapsConfig,
        timeout: Option<Duration>,
    ) -> Result<Option<Self>, MapsError> {
        match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(Some(Self::new(
                key.trim(),
                config.country.clone(),
                config.base_url.clone(),
                timeout,
            )?)),
            _ => Ok(None),
        }
    }

    /// Map a Google status string to a result, firing auth hooks on denial
    fn check_status(&self, status: &str, error_message: Option<String>) -> Result<(), MapsError> {
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            "REQUEST_DENIED" => {
                let err = MapsError::AuthFailed {
                    provider: PROVIDER_NAME.to_string(),
                    message: error_message.unwrap_or_else(|| "request denied".to_string()),
                };
                tracing::warn!(provider = PROVIDER_NAME, error = %err, "Maps authentication failed");
                self.hooks.notify(&err);
                Err(err)
            }
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(MapsError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
            }),
            other => Err(MapsError::Lookup {
                provider: PROVIDER_NAME.to_string(),
                status: other.to_string(),
                message: error_message.unwrap_or_default(),
            }),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MapsError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MapsError::network(PROVIDER_NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapsError::Lookup {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16().to_string(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MapsError::invalid_response(PROVIDER_NAME, e.to_string()))
    }
}

#[async_trait]
impl AddressLookup for GoogleMapsClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeMatch>, MapsError> {
        let components = format!("country:{}", self.country);
        let body: GeocodeResponse = self
            .get_json(
                "geocode/json",
                &[("address", query), ("components", components.as_str())],
            )
            .await?;
        self.check_status(&body.status, body.error_message)?;
        tracing::debug!(results = body.results.len(), "Geocode lookup complete");
        Ok(body.results)
    }

    async fn suggest(&self, input: &str) -> Result<Vec<Suggestion>, MapsError> {
        let components = format!("country:{}", self.country.to_lowercase());
        let body: AutocompleteResponse = self
            .get_json(
                "place/autocomplete/json",
                &[
                    ("input", input),
                    ("types", "address"),
                    ("components", components.as_str()),
                ],
            )
            .await?;
        self.check_status(&body.status, body.error_message)?;
        Ok(body.predictions)
    }

    async fn resolve(&self, place_id: &str) -> Result<Vec<AddressComponent>, MapsError> {
        let body: DetailsResponse = self
            .get_json(
                "place/details/json",
                &[
                    ("place_id", place_id),
                    ("fields", "address_component,formatted_address"),
                ],
            )
            .await?;
        self.check_status(&body.status, body.error_message)?;
        Ok(body
            .result
            .map(|r| r.address_components)
            .unwrap_or_default())
    }

    fn auth_hooks(&self) -> &AuthFailureHooks {
        &self.hooks
    }
}
