//! Errors from the address lookup collaborator

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapsError {
    /// Key rejected or the required APIs are not enabled for it
    #[error("{provider} authentication failed: {message}")]
    AuthFailed { provider: String, message: String },
    /// Quota exhausted
    #[error("{provider} rate limited")]
    RateLimited { provider: String },
    /// Lookup returned a non-OK status
    #[error("{provider} lookup failed with status {status}: {message}")]
    Lookup {
        provider: String,
        status: String,
        message: String,
    },
    /// Connection, TLS or timeout problem
    #[error("{provider} network error: {message}")]
    Network { provider: String, message: String },
    /// Body did not match the expected shape
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse { provider: String, message: String },
}

impl MapsError {
    pub fn is_auth_error(&self) -> bool {
        matches!(self, MapsError::AuthFailed { .. })
    }

    /// The provider could not be reached or answered unusably, as opposed
    /// to answering with a lookup status for this particular query
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            MapsError::Network { .. }
                | MapsError::RateLimited { .. }
                | MapsError::InvalidResponse { .. }
        )
    }

    pub fn provider_name(&self) -> &str {
        match self {
            MapsError::AuthFailed { provider, .. } => provider,
            MapsError::RateLimited { provider } => provider,
            MapsError::Lookup { provider, .. } => provider,
            MapsError::Network { provider, .. } => provider,
            MapsError::InvalidResponse { provider, .. } => provider,
        }
    }

    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        MapsError::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        MapsError::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_detection() {
        let err = MapsError::AuthFailed {
            provider: "google_maps".to_string(),
            message: "The provided API key is invalid.".to_string(),
        };
        assert!(err.is_auth_error());
        assert_eq!(err.provider_name(), "google_maps");
        assert!(!MapsError::network("google_maps", "timed out").is_auth_error());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_display_includes_status() {
        let err = MapsError::Lookup {
            provider: "google_maps".to_string(),
            status: "INVALID_REQUEST".to_string(),
            message: "missing address".to_string(),
        };
        assert!(err.to_string().contains("INVALID_REQUEST"));
    }

    #[test]
    fn test_unavailable_covers_transport_failures() {
        assert!(MapsError::network("google_maps", "connection refused").is_unavailable());
        assert!(MapsError::invalid_response("google_maps", "missing status").is_unavailable());
        assert!(MapsError::RateLimited {
            provider: "google_maps".to_string()
        }
        .is_unavailable());

        let per_query = MapsError::Lookup {
            provider: "google_maps".to_string(),
            status: "INVALID_REQUEST".to_string(),
            message: String::new(),
        };
        assert!(!per_query.is_unavailable());
    }
}
