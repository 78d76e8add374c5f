pub mod command;
pub mod store;
pub mod telemetry;
pub mod tick;


pub use command::{CommandError, CommandOutput};
pub use store::StatusStore;
pub use telemetry::TelemetryConfig;
