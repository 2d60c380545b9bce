//! Session keeper
//!
//! Owns the client, its store and the heartbeat task.

use parking_lot::Mutex;
use std::sync::Arc;

use sessionrpc_client::{start_heartbeat, HeartbeatHandle, SessionedRpcClient};
use sessionrpc_storage::{MemoryStore, SessionStore, SqliteStore};

use crate::config::{Config, StoreConfig};
use crate::Result;

pub struct SessionKeeper {
    config: Config,
    client: SessionedRpcClient,
    heartbeat: Mutex<Option<HeartbeatHandle>>,
}

impl SessionKeeper {
    /// Build the store and client. Nothing touches the network yet.
    pub fn new(config: Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let store: Arc<dyn SessionStore> = match &config.store {
            StoreConfig::Memory => Arc::new(MemoryStore::new(config.session_key.clone())?),
            StoreConfig::Sqlite { path } => {
                Arc::new(SqliteStore::open(path, config.session_key.clone())?)
            }
        };

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            http = http.timeout(timeout);
        }
        let client = SessionedRpcClient::with_http_client(http.build()?, endpoint, store);

        tracing::info!(
            endpoint = %client.endpoint(),
            store = ?config.store,
            "Session keeper created"
        );

        Ok(Self {
            config,
            client,
            heartbeat: Mutex::new(None),
        })
    }

    /// Start the heartbeat if enabled. Calling it again is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let Some(interval) = self.config.heartbeat_interval() else {
            tracing::info!("Heartbeat disabled");
            return;
        };

        let mut heartbeat = self.heartbeat.lock();
        if heartbeat.as_ref().is_some_and(HeartbeatHandle::is_running) {
            return;
        }
        *heartbeat = Some(start_heartbeat(self.client.clone(), interval));
    }

    /// Stop the heartbeat and wait for it to exit
    pub async fn shutdown(&self) {
        let handle = self.heartbeat.lock().take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    pub fn heartbeat_running(&self) -> bool {
        self.heartbeat
            .lock()
            .as_ref()
            .is_some_and(HeartbeatHandle::is_running)
    }

    pub fn client(&self) -> &SessionedRpcClient {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_keeper_calls_and_heartbeat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .and(body_partial_json(json!({ "methodName": "newSession" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sessionId": "k1" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .and(body_partial_json(json!({ "methodName": "getUserName" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "username": "" })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::new(server.uri());
        config.heartbeat_interval_secs = 3600;
        let keeper = SessionKeeper::new(config).unwrap();

        keeper.start();
        assert!(keeper.heartbeat_running());
        keeper.start();

        let response = keeper.client().call_empty("getUserName").await.unwrap();
        assert_eq!(response.get("username"), Some(&json!("")));
        assert_eq!(keeper.client().session_id().unwrap(), Some("k1".to_string()));

        keeper.shutdown().await;
        assert!(!keeper.heartbeat_running());
    }

    #[tokio::test]
    async fn test_heartbeat_disabled() {
        let mut config = Config::default();
        config.heartbeat_interval_secs = 0;
        let keeper = SessionKeeper::new(config).unwrap();

        keeper.start();
        assert!(!keeper.heartbeat_running());
        keeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_between_keepers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store = StoreConfig::Sqlite {
            path: dir.path().join("client.db"),
        };
        config.request_timeout_secs = Some(5);

        {
            let keeper = SessionKeeper::new(config.clone()).unwrap();
            assert_eq!(keeper.client().session_id().unwrap(), None);
            keeper.client().reset_session().unwrap();
        }

        let store = SqliteStore::open(dir.path().join("client.db"), "sessionId").unwrap();
        store.set("persisted").unwrap();

        let keeper = SessionKeeper::new(config).unwrap();
        assert_eq!(
            keeper.client().session_id().unwrap(),
            Some("persisted".to_string())
        );
        assert_eq!(keeper.config().request_timeout(), Some(Duration::from_secs(5)));
    }
}
