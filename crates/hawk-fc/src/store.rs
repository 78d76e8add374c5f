//! Shared ownership of the single drone status record.
//!
//! One `StatusStore` is created at process start and handed to both the HTTP
//! command layer and the telemetry scheduler. The lock is held across the
//! whole compute-and-apply of a transition, so `read` only ever observes a
//! value produced by one completed `update`, `apply`, or `reset`.

use crate::command::{CommandError, CommandOutput};
use hawk_proto::DroneStatus;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct StatusStore {
    inner: Arc<Mutex<DroneStatus>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent snapshot of the current status.
    pub fn read(&self) -> DroneStatus {
        self.inner.lock().unwrap().clone()
    }

    /// Atomically install `f(current)` and return the new snapshot.
    pub fn update(&self, f: impl FnOnce(&DroneStatus) -> DroneStatus) -> DroneStatus {
        let mut guard = self.inner.lock().unwrap();
        *guard = f(&guard);
        guard.clone()
    }

    /// Run a command handler against the current status. The new status is
    /// installed only when the handler accepts; on rejection the stored
    /// value is untouched.
    pub fn apply(
        &self,
        f: impl FnOnce(&DroneStatus) -> Result<CommandOutput, CommandError>,
    ) -> Result<CommandOutput, CommandError> {
        let mut guard = self.inner.lock().unwrap();
        let out = f(&guard)?;
        *guard = out.status.clone();
        Ok(out)
    }

    /// Atomically restore the default record.
    pub fn reset(&self) -> DroneStatus {
        let mut guard = self.inner.lock().unwrap();
        *guard = DroneStatus::default();
        guard.clone()
    }
}
