//! API state shared by handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::store::SurveyStore;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Where survey responses are inserted
    pub store: Arc<dyn SurveyStore>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(config: Config, store: Arc<dyn SurveyStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_api_state_new() {
        let state = ApiState::new(Config::default(), Arc::new(MemoryStore::new()));
        assert_eq!(state.backend_name(), "memory");
        assert_eq!(state.config.server.port, 7008);
    }
}
