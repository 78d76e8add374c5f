//! The autonomous tick transition.
//!
//! Applied once per telemetry interval while the drone is not disarmed.
//! Sub-rule order is load-bearing: drain, altitude, critical-battery
//! failsafe, mission progression, terminal disarm.

use hawk_proto::{status::MAX_ALTITUDE_M, DroneStatus, FlightMode, FlightState};

pub const TICK_BATTERY_DRAIN: u8 = 1;
pub const CLIMB_RATE_M: u32 = 2;
pub const DESCENT_RATE_M: u32 = 5;
pub const CRITICAL_BATTERY: u8 = 5;

pub fn tick(status: &DroneStatus) -> DroneStatus {
    if status.state == FlightState::Disarmed {
        return status.clone();
    }
    let mut next = status.clone();

    next.battery = next.battery.saturating_sub(TICK_BATTERY_DRAIN);

    match next.state {
        FlightState::Flying => {
            next.altitude = (next.altitude + CLIMB_RATE_M).min(MAX_ALTITUDE_M);
        }
        FlightState::Landing => {
            next.altitude = next.altitude.saturating_sub(DESCENT_RATE_M);
        }
        _ => {}
    }

    if next.battery <= CRITICAL_BATTERY && next.state == FlightState::Flying {
        next.state = FlightState::Landing;
        next.flight_mode = FlightMode::Failsafe;
        next.current_wp_index = None;
    }

    if next.state == FlightState::Flying && !next.mission.is_empty() {
        if let Some(idx) = next.current_wp_index {
            if idx + 1 < next.mission.len() {
                next.current_wp_index = Some(idx + 1);
            } else {
                // Final waypoint reached.
                next.state = FlightState::Landing;
                next.flight_mode = FlightMode::Manual;
                next.current_wp_index = None;
            }
        }
    }

    // Touching the ground disarms, whatever brought the drone down.
    if next.altitude == 0 {
        next.state = FlightState::Disarmed;
        next.armed = false;
        next.flight_mode = FlightMode::Manual;
        next.current_wp_index = None;
    }

    next
}
