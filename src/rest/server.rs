//! REST API server lifecycle management.
//!
//! Runs the survey API on a background task so the terminal wizard can post
//! to an in-process endpoint (`signup wizard --serve`).

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::rest::{build_router, ApiState};

/// Status of the REST API server
#[derive(Debug, Clone, PartialEq)]
pub enum RestApiStatus {
    Stopped,
    Starting,
    Running { port: u16 },
    Error(String),
}

impl RestApiStatus {
    /// Returns true if the server is running
    pub fn is_running(&self) -> bool {
        matches!(self, RestApiStatus::Running { .. })
    }
}

/// REST API server handle for lifecycle management
pub struct RestApiServer {
    state: ApiState,
    addr: String,
    status: Arc<Mutex<RestApiStatus>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

fn set_status(status: &Mutex<RestApiStatus>, value: RestApiStatus) {
    if let Ok(mut guard) = status.lock() {
        *guard = value;
    }
}

impl RestApiServer {
    /// Create a server handle that will bind `addr` (`host:port`)
    pub fn new(state: ApiState, addr: impl Into<String>) -> Self {
        Self {
            state,
            addr: addr.into(),
            status: Arc::new(Mutex::new(RestApiStatus::Stopped)),
            shutdown_tx: Mutex::new(None),
            task_handle: Mutex::new(None),
        }
    }

    /// Get current server status
    pub fn status(&self) -> RestApiStatus {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|e| RestApiStatus::Error(e.to_string()))
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.status().is_running()
    }

    /// Bind and start serving in the background. Returns the bound address,
    /// which matters when the configured port is 0.
    pub async fn start(&self) -> Result<SocketAddr, String> {
        if let RestApiStatus::Running { port } = self.status() {
            return Err(format!("REST API already running on port {port}"));
        }
        set_status(&self.status, RestApiStatus::Starting);

        let listener = match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => listener,
            Err(e) => {
                let message = format!("Failed to bind {}: {}", self.addr, e);
                tracing::error!("{}", message);
                set_status(&self.status, RestApiStatus::Error(message.clone()));
                return Err(message);
            }
        };
        let local = listener.local_addr().map_err(|e| e.to_string())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        if let Ok(mut slot) = self.shutdown_tx.lock() {
            *slot = Some(shutdown_tx);
        }

        let router = build_router(self.state.clone());
        let status = self.status.clone();
        set_status(&status, RestApiStatus::Running { port: local.port() });
        tracing::info!("Survey API listening on http://{}", local);

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            match result {
                Ok(()) => set_status(&status, RestApiStatus::Stopped),
                Err(e) => {
                    tracing::error!("Survey API stopped with error: {}", e);
                    set_status(&status, RestApiStatus::Error(e.to_string()));
                }
            }
        });

        if let Ok(mut slot) = self.task_handle.lock() {
            *slot = Some(handle);
        }
        Ok(local)
    }

    /// Ask the server to stop; in-flight requests finish first
    pub fn stop(&self) {
        if let Some(tx) = self.shutdown_tx.lock().ok().and_then(|mut tx| tx.take()) {
            let _ = tx.send(());
            tracing::info!("Survey API server stopping");
        }
        set_status(&self.status, RestApiStatus::Stopped);
    }

    /// Stop and wait for the background task to exit
    pub async fn shutdown(&self) {
        self.stop();
        let handle = self.task_handle.lock().ok().and_then(|mut h| h.take());
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for RestApiServer {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;

    fn test_server() -> RestApiServer {
        let state = ApiState::new(Config::default(), Arc::new(MemoryStore::new()));
        RestApiServer::new(state, "127.0.0.1:0")
    }

    #[test]
    fn test_rest_api_status_is_running() {
        assert!(!RestApiStatus::Stopped.is_running());
        assert!(!RestApiStatus::Starting.is_running());
        assert!(RestApiStatus::Running { port: 7008 }.is_running());
        assert!(!RestApiStatus::Error("test".to_string()).is_running());
    }

    #[test]
    fn test_rest_api_server_initial_status() {
        let server = test_server();
        assert_eq!(server.status(), RestApiStatus::Stopped);
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_start_serves_health_then_stops() {
        let server = test_server();
        let addr = server.start().await.unwrap();
        assert_eq!(server.status(), RestApiStatus::Running { port: addr.port() });

        let body: serde_json::Value = reqwest::get(format!("http://{addr}/api/v1/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");

        server.shutdown().await;
        assert_eq!(server.status(), RestApiStatus::Stopped);
    }

    #[tokio::test]
    async fn test_server_double_start_error() {
        let server = test_server();
        server.start().await.unwrap();

        let err = server.start().await.unwrap_err();
        assert!(err.contains("already running"));
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_bind_failure_sets_error_status() {
        let state = ApiState::new(Config::default(), Arc::new(MemoryStore::new()));
        let server = RestApiServer::new(state, "not-an-address");
        assert!(server.start().await.is_err());
        assert!(matches!(server.status(), RestApiStatus::Error(_)));
    }
}
