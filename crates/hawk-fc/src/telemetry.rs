//! The telemetry scheduler: a process-lifetime task that applies the
//! autonomous tick to the store on a fixed cadence. It is reachable from no
//! HTTP request and stops only on the shutdown signal.

use crate::store::StatusStore;
use crate::tick;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// `[telemetry]` config table.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Seconds between autonomous ticks.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

fn default_tick_interval_secs() -> u64 {
    5
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { tick_interval_secs: default_tick_interval_secs() }
    }
}

impl TelemetryConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

/// Spawn the recurring tick task. One task per process; each firing goes
/// through `StatusStore::update`, which serializes it against commands.
pub fn spawn_telemetry_loop(
    store: StatusStore,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval yields immediately once; consume that so a fresh process
        // holds its state for a full period before the first tick.
        ticker.tick().await;

        info!(period_s = period.as_secs_f64(), "telemetry loop started");
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("telemetry loop shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let st = store.update(tick::tick);
                    debug!(
                        state = ?st.state,
                        battery = st.battery,
                        altitude = st.altitude,
                        wp = ?st.current_wp_index,
                        "telemetry tick"
                    );
                }
            }
        }
    })
}
