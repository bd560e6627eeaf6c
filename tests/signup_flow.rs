//! End-to-end tests for survey submission
//!
//! These tests verify that:
//! - The wizard's HTTP client reaches the API and gets an id back
//! - A stored survey lands in the configured store
//! - Incomplete surveys are rejected with the API's message and not stored
//! - The SQLite backend works through URL dispatch and table creation
//!
//! Every server binds `127.0.0.1:0`, so tests can run in parallel.

use std::sync::Arc;

use serde::Deserialize;
use tempfile::TempDir;

use signup::config::{Config, DatabaseConfig};
use signup::rest::dto::SurveySubmission;
use signup::rest::{ApiState, RestApiServer};
use signup::store::{self, MemoryStore, SurveyStore};
use signup::submit::{HttpSubmissionClient, SubmissionClient, SubmitError};
use signup::wizard::{ServiceSet, WizardData};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn completed_survey() -> WizardData {
    let services: ServiceSet = ["lawn-care", "pest-control"]
        .into_iter()
        .map(String::from)
        .collect();
    let future_services: ServiceSet = ["housekeeping".to_string()].into_iter().collect();

    WizardData {
        address: "730 South Loomis Street, Chicago, IL 60607".to_string(),
        city: Some("Chicago".to_string()),
        state: Some("IL".to_string()),
        zip_code: Some("60607".to_string()),
        services,
        future_services,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "user@example.com".to_string(),
        phone: Some("(773) 837-2198".to_string()),
    }
}

/// Start a server over `store` and a client pointed at it
async fn start(store: Arc<dyn SurveyStore>) -> (RestApiServer, HttpSubmissionClient, String) {
    let server = RestApiServer::new(ApiState::new(Config::default(), store), "127.0.0.1:0");
    let addr = server.start().await.expect("server should bind");
    let base = format!("http://{addr}");
    let client = HttpSubmissionClient::new(format!("{base}/api/survey"), None)
        .expect("client should build");
    (server, client, base)
}

#[derive(Debug, Deserialize)]
struct Status {
    backend: String,
    response_count: Option<u64>,
}

async fn status(base: &str) -> Status {
    reqwest::get(format!("{base}/api/v1/status"))
        .await
        .expect("status request")
        .json()
        .await
        .expect("status body")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_submission_reaches_memory_store() {
    let store = Arc::new(MemoryStore::new());
    let (server, client, _) = start(store.clone()).await;

    let receipt = client
        .submit(&SurveySubmission::from(&completed_survey()))
        .await
        .expect("submission should be accepted");

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    let (id, row) = &rows[0];
    assert_eq!(receipt.id, Some(id.to_string()));
    assert_eq!(row.first_name, "Ada");
    assert_eq!(row.zip_code.as_deref(), Some("60607"));
    assert_eq!(row.services, vec!["lawn-care", "pest-control"]);
    assert_eq!(row.future_services, vec!["housekeeping"]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_missing_email_is_rejected_and_not_stored() {
    let store = Arc::new(MemoryStore::new());
    let (server, client, _) = start(store.clone()).await;

    let mut submission = SurveySubmission::from(&completed_survey());
    submission.email = None;

    let err = client.submit(&submission).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Rejected {
            status: 400,
            message: "Missing required fields".to_string(),
        }
    );
    assert_eq!(err.user_message(), "Missing required fields");
    assert_eq!(store.count().await.unwrap(), 0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let store = Arc::new(MemoryStore::new());
    let (server, client, _) = start(store).await;
    server.shutdown().await;

    let err = client
        .submit(&SurveySubmission::from(&completed_survey()))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Network(_)));
    assert_eq!(err.user_message(), "Something went wrong");
}

#[tokio::test]
async fn test_sqlite_store_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let database = DatabaseConfig {
        url: Some(format!(
            "sqlite:{}",
            temp_dir.path().join("surveys.db").display()
        )),
        ..Default::default()
    };
    let store = store::connect(&database).await.expect("sqlite store");
    let (server, client, base) = start(store).await;

    let submission = SurveySubmission::from(&completed_survey());
    let first = client.submit(&submission).await.unwrap();
    let second = client.submit(&submission).await.unwrap();
    assert_ne!(first.id, second.id);

    let status = status(&base).await;
    assert_eq!(status.backend, "sqlite");
    assert_eq!(status.response_count, Some(2));

    server.shutdown().await;
}
