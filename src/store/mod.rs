//! Survey response persistence.
//!
//! One table, `wizard_survey_responses`, written by the submission endpoint.
//! The backend is picked from the database URL scheme:
//!
//! - `postgres://` / `postgresql://` -> [`PostgresStore`] (text arrays)
//! - `sqlite:` -> [`SqliteStore`] (JSON-encoded arrays)
//! - `memory:` -> [`MemoryStore`] (process-local, for demos and tests)
//!
//! Every backend creates its table on startup if it is missing.

mod error;
mod memory;
mod postgres;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::DatabaseConfig;

/// Name of the single table every backend writes to
pub const TABLE_NAME: &str = "wizard_survey_responses";

/// A validated survey ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSurveyResponse {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub services: Vec<String>,
    pub future_services: Vec<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Storage backend for survey responses
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Short backend name for logs and the status endpoint
    fn backend_name(&self) -> &'static str;

    /// Create the table if it does not exist
    async fn init(&self) -> Result<(), StoreError>;

    /// Insert one row and return its generated identifier
    async fn insert(&self, response: &NewSurveyResponse) -> Result<Uuid, StoreError>;

    /// Number of stored responses
    async fn count(&self) -> Result<u64, StoreError>;
}

/// Which backend a database URL points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Postgres(String),
    Sqlite(String),
    Memory,
}

/// Pull the connection URL out of a pasted `psql '...'` command.
/// Anything else is returned trimmed.
pub fn extract_url(input: &str) -> &str {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("psql ") {
        let mut quoted = rest.split('\'');
        if let (Some(_), Some(url)) = (quoted.next(), quoted.next()) {
            if !url.is_empty() {
                return url;
            }
        }
    }
    trimmed
}

/// Classify a raw database setting
pub fn parse_database_url(raw: &str) -> Result<DatabaseUrl, StoreError> {
    let url = extract_url(raw);
    if url.is_empty() {
        return Err(StoreError::NotConfigured);
    }

    let parsed = reqwest::Url::parse(url).map_err(|_| StoreError::InvalidUrl {
        received: url.to_string(),
    })?;

    match parsed.scheme() {
        "postgres" | "postgresql" => Ok(DatabaseUrl::Postgres(url.to_string())),
        "sqlite" => Ok(DatabaseUrl::Sqlite(url.to_string())),
        "memory" => Ok(DatabaseUrl::Memory),
        other => Err(StoreError::UnsupportedScheme(other.to_string())),
    }
}

/// Open and initialise the configured backend
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn SurveyStore>, StoreError> {
    let raw = config.url.as_deref().ok_or(StoreError::NotConfigured)?;

    let store: Arc<dyn SurveyStore> = match parse_database_url(raw)? {
        DatabaseUrl::Postgres(url) => {
            Arc::new(PostgresStore::connect(&url, config.max_connections).await?)
        }
        DatabaseUrl::Sqlite(url) => {
            Arc::new(SqliteStore::connect(&url, config.max_connections).await?)
        }
        DatabaseUrl::Memory => Arc::new(MemoryStore::new()),
    };

    store.init().await?;
    tracing::info!(backend = store.backend_name(), "Survey store ready");
    Ok(store)
}
