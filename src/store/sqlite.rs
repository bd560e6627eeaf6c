//! SQLite backend. Service lists are stored as JSON arrays.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};
use uuid::Uuid;

use super::{NewSurveyResponse, StoreError, SurveyStore};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("connections", &self.pool.size())
            .finish()
    }
}

impl SqliteStore {
    /// Open a pool for `url`, creating the database file if needed
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(std::time::Duration::from_secs(5));

        // Each connection to :memory: is its own database, so pin one
        // connection and never recycle it
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };

        info!(in_memory, "SQLite survey store connected");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SurveyStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wizard_survey_responses (
                id TEXT PRIMARY KEY NOT NULL,
                address TEXT NOT NULL,
                city TEXT,
                state TEXT,
                zip_code TEXT,
                services TEXT NOT NULL DEFAULT '[]',
                future_services TEXT NOT NULL DEFAULT '[]',
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("SQLite survey table initialized");
        Ok(())
    }

    async fn insert(&self, response: &NewSurveyResponse) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let services = serde_json::to_string(&response.services)?;
        let future_services = serde_json::to_string(&response.future_services)?;

        sqlx::query(
            r#"
            INSERT INTO wizard_survey_responses (
                id, address, city, state, zip_code, services, future_services,
                first_name, last_name, email
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&response.address)
        .bind(&response.city)
        .bind(&response.state)
        .bind(&response.zip_code)
        .bind(services)
        .bind(future_services)
        .bind(&response.first_name)
        .bind(&response.last_name)
        .bind(&response.email)
        .execute(&self.pool)
        .await?;

        debug!(%id, "Stored survey response in SQLite");
        Ok(id)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wizard_survey_responses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}
