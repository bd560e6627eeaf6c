//! PostgreSQL backend. Service lists are stored as `TEXT[]`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::{NewSurveyResponse, StoreError, SurveyStore};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("connections", &self.pool.size())
            .finish()
    }
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await?;

        info!(max_connections, "PostgreSQL survey store connected");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SurveyStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wizard_survey_responses (
                id UUID PRIMARY KEY,
                address TEXT NOT NULL,
                city TEXT,
                state TEXT,
                zip_code TEXT,
                services TEXT[] NOT NULL DEFAULT '{}',
                future_services TEXT[] NOT NULL DEFAULT '{}',
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("PostgreSQL survey table initialized");
        Ok(())
    }

    async fn insert(&self, response: &NewSurveyResponse) -> Result<Uuid, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO wizard_survey_responses (
                id, address, city, state, zip_code, services, future_services,
                first_name, last_name, email
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&response.address)
        .bind(&response.city)
        .bind(&response.state)
        .bind(&response.zip_code)
        .bind(&response.services)
        .bind(&response.future_services)
        .bind(&response.first_name)
        .bind(&response.last_name)
        .bind(&response.email)
        .fetch_one(&self.pool)
        .await?;

        debug!(%id, "Stored survey response in PostgreSQL");
        Ok(id)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wizard_survey_responses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}
