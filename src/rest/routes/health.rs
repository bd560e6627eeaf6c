//! Liveness and store status.

use axum::{extract::State, Json};

use crate::rest::dto::{HealthResponse, StatusResponse};
use crate::rest::state::ApiState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness check; never touches the store
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "The API process is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: VERSION.into(),
    })
}

/// Store backend and response count. A store that cannot be counted
/// reports `degraded` with no count instead of failing the request.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Health",
    responses(
        (status = 200, description = "Backend name and stored response count", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    let (status, response_count) = match state.store.count().await {
        Ok(count) => ("ok", Some(count)),
        Err(e) => {
            tracing::warn!(error = %e, backend = state.backend_name(), "Survey store unavailable");
            ("degraded", None)
        }
    };

    Json(StatusResponse {
        status: status.into(),
        version: VERSION.into(),
        backend: state.backend_name().into(),
        response_count,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::store::{MemoryStore, NewSurveyResponse, StoreError, SurveyStore};

    struct BrokenStore;

    #[async_trait]
    impl SurveyStore for BrokenStore {
        fn backend_name(&self) -> &'static str {
            "broken"
        }

        async fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert(&self, _: &NewSurveyResponse) -> Result<Uuid, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[tokio::test]
    async fn test_health_reports_crate_version() {
        let Json(resp) = health().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, VERSION);
    }

    #[tokio::test]
    async fn test_status_counts_memory_rows() {
        let state = ApiState::new(Config::default(), Arc::new(MemoryStore::new()));

        let Json(resp) = status(State(state)).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.backend, "memory");
        assert_eq!(resp.response_count, Some(0));
    }

    #[tokio::test]
    async fn test_status_degrades_when_store_fails() {
        let state = ApiState::new(Config::default(), Arc::new(BrokenStore));

        let Json(resp) = status(State(state)).await;
        assert_eq!(resp.status, "degraded");
        assert_eq!(resp.backend, "broken");
        assert_eq!(resp.response_count, None);
    }
}
