//! Periodic sweep of expired sessions.
//!
//! Inserting a session already sweeps expired rows, but on a quiet server
//! nothing is inserted for long stretches. This task bounds how long an
//! expired row can linger.

use std::sync::Arc;
use std::time::Duration;

use auth_core::{AuthRepository, AuthService};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Spawn the sweep loop. It runs until the returned handle is aborted.
pub fn spawn_sweeper<R>(service: Arc<AuthService<R>>, interval: Duration) -> JoinHandle<()>
where
    R: AuthRepository + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match service.sweep_expired().await {
                Ok(0) => {}
                Ok(swept) => info!(swept, "Sweeper removed expired sessions"),
                Err(e) => error!(error = %e, "Session sweep failed"),
            }
        }
    })
}
