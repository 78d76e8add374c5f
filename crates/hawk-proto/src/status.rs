use serde::{Deserialize, Serialize};

/// Ceiling for the simulated airframe, meters AGL.
pub const MAX_ALTITUDE_M: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightState {
    Disarmed,
    Armed,
    Flying,
    Landing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightMode {
    Manual,
    Auto,
    Failsafe,
}

/// A named point of an uploaded mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// The single drone's status record. One instance lives for the whole
/// process; field names are the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneStatus {
    pub armed: bool,
    pub altitude: u32,
    pub mission: Vec<Waypoint>,
    pub current_wp_index: Option<usize>,
    pub state: FlightState,
    pub battery: u8,
    pub gps_locked: bool,
    pub flight_mode: FlightMode,
}

impl Default for DroneStatus {
    fn default() -> Self {
        Self {
            armed: false,
            altitude: 0,
            mission: Vec::new(),
            current_wp_index: None,
            state: FlightState::Disarmed,
            battery: 100,
            gps_locked: true,
            flight_mode: FlightMode::Manual,
        }
    }
}
