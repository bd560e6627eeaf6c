//! Survey submission endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::rest::dto::{CreatedResponse, SurveySubmission};
use crate::rest::error::{ApiError, ErrorResponse, MISSING_FIELDS_MESSAGE};
use crate::rest::state::ApiState;

/// Store one survey response
#[utoipa::path(
    post,
    path = "/api/survey",
    tag = "Survey",
    request_body = SurveySubmission,
    responses(
        (status = 201, description = "Survey stored", body = CreatedResponse),
        (status = 400, description = "Missing required fields or malformed body", body = ErrorResponse),
        (status = 500, description = "Survey could not be stored", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    payload: Result<Json<SurveySubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(submission) = payload?;

    let row = submission.into_new_response().map_err(|missing| {
        tracing::info!(?missing, "Rejected survey with missing fields");
        ApiError::BadRequest(MISSING_FIELDS_MESSAGE.to_string())
    })?;

    let id = state.store.insert(&row).await?;
    tracing::info!(%id, backend = state.backend_name(), "Stored survey response");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::{MemoryStore, NewSurveyResponse, StoreError, SurveyStore};
    use async_trait::async_trait;
    use std::sync::Arc;
    use uuid::Uuid;

    struct FailingStore;

    #[async_trait]
    impl SurveyStore for FailingStore {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert(&self, _response: &NewSurveyResponse) -> Result<Uuid, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn complete() -> SurveySubmission {
        SurveySubmission {
            address: Some("1 Main St".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            services: Some(vec!["lawn-care".to_string()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_inserts_one_row() {
        let store = Arc::new(MemoryStore::new());
        let state = ApiState::new(Config::default(), store.clone());

        let (status, Json(body)) = create(State(state), Ok(Json(complete()))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.rows()[0].0.to_string(), body.id);
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected_without_insert() {
        let store = Arc::new(MemoryStore::new());
        let state = ApiState::new(Config::default(), store.clone());
        let mut submission = complete();
        submission.email = None;

        let err = create(State(state), Ok(Json(submission))).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == MISSING_FIELDS_MESSAGE));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let state = ApiState::new(Config::default(), Arc::new(FailingStore));
        let err = create(State(state), Ok(Json(complete()))).await.unwrap_err();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
