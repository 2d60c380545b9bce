//! Heartbeat scheduler
//!
//! Calls `updateSession` on a fixed interval until stopped. A failed or
//! reset tick never ends the schedule; the next tick bootstraps again.

use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::SessionedRpcClient;

pub const UPDATE_SESSION_METHOD: &str = "updateSession";
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running heartbeat. Dropping it also stops the task.
pub struct HeartbeatHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    interval: Duration,
}

impl HeartbeatHandle {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signal the task and wait for it to exit. An in-flight tick is abandoned.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Heartbeat task ended abnormally");
            }
        }

        tracing::info!("Heartbeat stopped");
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Spawn the heartbeat. The first tick fires one `interval` after start.
///
/// Must be called from within a tokio runtime.
pub fn start_heartbeat(client: SessionedRpcClient, interval: Duration) -> HeartbeatHandle {
    let interval = interval.max(MIN_INTERVAL);
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_ms = interval.as_millis() as u64, "Heartbeat started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop_rx.changed() => break,
            }

            tokio::select! {
                result = client.run_on_backend(UPDATE_SESSION_METHOD, Value::Object(Map::new())) => {
                    match result {
                        Some(response) if response.has_error() => {
                            tracing::warn!(response = %response, "Heartbeat rejected by backend");
                        }
                        Some(_) => tracing::debug!("Heartbeat sent"),
                        None => tracing::warn!("Heartbeat did not complete"),
                    }
                }
                _ = stop_rx.changed() => break,
            }
        }
    });

    HeartbeatHandle {
        stop_tx,
        task: Some(task),
        interval,
    }
}
