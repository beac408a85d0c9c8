//! Background health polling of the agent service.
//!
//! The footer shows whether the backend is reachable without ever making a
//! page load or a search wait on a health check. A single spawned task
//! polls `GET /status` on a fixed interval and publishes the latest result
//! through a watch channel; readers always see the most recent check and
//! never block.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::client::AgentClient;
use crate::models::StatusResponse;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Latest known state of the agent service. `Unknown` only before the
/// first poll lands. A failed poll degrades to `Offline` and the next
/// successful one recovers to `Online`; the search lifecycle is never
/// touched either way.
#[derive(Debug, Clone)]
pub enum BackendHealth {
    Unknown,
    Online {
        status: StatusResponse,
        checked_at: DateTime<Utc>,
    },
    Offline {
        message: String,
        checked_at: DateTime<Utc>,
    },
}

/// Handle to the polling task. Dropping the handle does not stop the task;
/// call [`shutdown`](StatusPoller::shutdown) when the server stops.
pub struct StatusPoller {
    rx: watch::Receiver<BackendHealth>,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn spawn(client: AgentClient) -> StatusPoller {
        StatusPoller::spawn_with_interval(client, POLL_INTERVAL)
    }

    pub fn spawn_with_interval(client: AgentClient, interval: Duration) -> StatusPoller {
        let (tx, rx) = watch::channel(BackendHealth::Unknown);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            // first tick fires immediately, so the footer fills in on startup
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let health = match client.status().await {
                    Ok(status) => BackendHealth::Online {
                        status,
                        checked_at: Utc::now(),
                    },
                    Err(err) => {
                        tracing::warn!("status poll failed: {}", err);
                        BackendHealth::Offline {
                            message: err.to_string(),
                            checked_at: Utc::now(),
                        }
                    }
                };
                if tx.send(health).is_err() {
                    break;
                }
            }
        });
        StatusPoller { rx, cancel }
    }

    /// A receiver that always holds the latest health value.
    pub fn subscribe(&self) -> watch::Receiver<BackendHealth> {
        self.rx.clone()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
