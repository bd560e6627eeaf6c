//! Process-local store

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{NewSurveyResponse, StoreError, SurveyStore};

/// Keeps responses in memory; lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<(Uuid, NewSurveyResponse)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored rows in insertion order
    pub fn rows(&self) -> Vec<(Uuid, NewSurveyResponse)> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, response: &NewSurveyResponse) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let mut rows = self.rows.lock().map_err(|_| StoreError::Poisoned)?;
        rows.push((id, response.clone()));
        tracing::debug!(%id, "Stored survey response in memory");
        Ok(id)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let rows = self.rows.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let response = NewSurveyResponse {
            address: "1 Main St".to_string(),
            city: None,
            state: None,
            zip_code: None,
            services: vec!["lawn-care".to_string()],
            future_services: vec![],
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };

        let first = store.insert(&response).await.unwrap();
        let second = store.insert(&response).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.rows()[0].0, first);
    }
}
