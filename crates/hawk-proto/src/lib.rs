pub mod status;

pub use status::{DroneStatus, FlightMode, FlightState, Waypoint};
