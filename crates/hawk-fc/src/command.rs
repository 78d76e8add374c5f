//! Operator command transitions.
//!
//! Each handler is a pure function from the current status to either a new
//! status plus an operator-facing message, or a rejection. Handlers never
//! touch the store themselves; callers apply the result atomically through
//! [`crate::store::StatusStore`].

use hawk_proto::{DroneStatus, FlightMode, FlightState, Waypoint};

pub const ARM_MIN_BATTERY: u8 = 10;
pub const TAKEOFF_MIN_BATTERY: u8 = 20;
pub const TAKEOFF_ALTITUDE_M: u32 = 10;
pub const INJECTED_LOW_BATTERY: u8 = 4;

const ARM_BATTERY_COST: u8 = 1;
const TAKEOFF_BATTERY_COST: u8 = 5;
const LAND_BATTERY_COST: u8 = 2;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InsufficientResource(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error(transparent)]
    PlacementFailed(#[from] hawk_nav::PlacementError),
    #[error("{0}")]
    InvalidInput(String),
}

/// An accepted command: the status to install and the message for the operator.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: DroneStatus,
    pub message: String,
}

fn accepted(status: DroneStatus, message: &str) -> CommandOutput {
    CommandOutput { status, message: message.to_string() }
}

pub fn arm(status: &DroneStatus) -> Result<CommandOutput, CommandError> {
    if status.battery < ARM_MIN_BATTERY {
        return Err(CommandError::InsufficientResource("Battery too low to arm".into()));
    }
    if status.state != FlightState::Disarmed {
        return Err(CommandError::InvalidState("Cannot arm from current state".into()));
    }

    let mut next = status.clone();
    next.armed = true;
    next.state = FlightState::Armed;
    next.battery = next.battery.saturating_sub(ARM_BATTERY_COST);
    Ok(accepted(next, "Drone armed"))
}

pub fn takeoff(status: &DroneStatus) -> Result<CommandOutput, CommandError> {
    if status.battery < TAKEOFF_MIN_BATTERY {
        return Err(CommandError::InsufficientResource("Battery too low to take off".into()));
    }
    if !status.gps_locked {
        return Err(CommandError::PreconditionFailed("Cannot take off: GPS signal lost".into()));
    }
    if status.state != FlightState::Armed {
        return Err(CommandError::InvalidState("Drone must be armed before takeoff".into()));
    }

    let mut next = status.clone();
    next.altitude = TAKEOFF_ALTITUDE_M;
    next.state = FlightState::Flying;
    next.flight_mode = FlightMode::Auto;
    next.battery = next.battery.saturating_sub(TAKEOFF_BATTERY_COST);
    if !next.mission.is_empty() {
        next.current_wp_index = Some(0);
    }
    Ok(accepted(next, "Drone took off to 10m"))
}

pub fn land(status: &DroneStatus) -> Result<CommandOutput, CommandError> {
    if status.state != FlightState::Flying {
        return Err(CommandError::InvalidState("Drone must be flying to land".into()));
    }

    let mut next = status.clone();
    next.state = FlightState::Landing;
    next.flight_mode = FlightMode::Manual;
    next.battery = next.battery.saturating_sub(LAND_BATTERY_COST);
    Ok(accepted(next, "Landing sequence started"))
}

/// Gate shared by the upload path: missions need a GPS fix.
pub fn require_gps(status: &DroneStatus) -> Result<(), CommandError> {
    if status.gps_locked {
        Ok(())
    } else {
        Err(CommandError::PreconditionFailed("Cannot upload mission: GPS lock required".into()))
    }
}

/// Install an already-generated mission. Waypoint placement happens in
/// `hawk-nav` before this point; a placement failure never reaches here, so
/// the previous mission stays untouched on any rejection.
pub fn upload_mission(
    status: &DroneStatus,
    mission: Vec<Waypoint>,
) -> Result<CommandOutput, CommandError> {
    require_gps(status)?;

    let mut next = status.clone();
    next.mission = mission;
    // An active index may outlive a shorter replacement mission.
    if next.current_wp_index.is_some_and(|i| i >= next.mission.len()) {
        next.current_wp_index = None;
    }
    Ok(accepted(next, "Mission uploaded"))
}

pub fn clear_mission(status: &DroneStatus) -> CommandOutput {
    let mut next = status.clone();
    next.mission.clear();
    next.current_wp_index = None;
    accepted(next, "Mission cleared")
}

pub fn inject_failure(status: &DroneStatus, mode: &str) -> Result<CommandOutput, CommandError> {
    let mut next = status.clone();
    match mode {
        "gps_loss" => {
            next.gps_locked = false;
            Ok(accepted(next, "GPS signal lost"))
        }
        "low_battery" => {
            next.battery = INJECTED_LOW_BATTERY;
            Ok(accepted(next, "Battery forced to critical"))
        }
        "motor_fail" => {
            if status.state != FlightState::Flying {
                return Err(CommandError::InvalidState(
                    "Cannot inject motor failure unless flying".into(),
                ));
            }
            next.flight_mode = FlightMode::Failsafe;
            next.state = FlightState::Landing;
            Ok(accepted(next, "Motor failure: failsafe landing initiated"))
        }
        "reset_failures" => {
            next.gps_locked = true;
            next.battery = 100;
            next.flight_mode = FlightMode::Manual;
            Ok(accepted(next, "Failure conditions cleared"))
        }
        other => Err(CommandError::InvalidInput(format!("Unknown failure mode: {other}"))),
    }
}

pub fn reset() -> CommandOutput {
    accepted(DroneStatus::default(), "Drone reset to default state")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flying() -> DroneStatus {
        let armed = arm(&DroneStatus::default()).unwrap().status;
        takeoff(&armed).unwrap().status
    }

    #[test]
    fn arm_with_good_battery() {
        let out = arm(&DroneStatus::default()).unwrap();
        assert!(out.status.armed);
        assert_eq!(out.status.state, FlightState::Armed);
        assert_eq!(out.status.battery, 99);
        assert_eq!(out.message, "Drone armed");
    }

    #[test]
    fn arm_with_low_battery() {
        let st = DroneStatus { battery: ARM_MIN_BATTERY - 1, ..DroneStatus::default() };
        let err = arm(&st).unwrap_err();
        assert!(matches!(err, CommandError::InsufficientResource(_)));
        assert!(err.to_string().to_lowercase().contains("battery"));
    }

    #[test]
    fn arm_at_exact_threshold_succeeds() {
        let st = DroneStatus { battery: ARM_MIN_BATTERY, ..DroneStatus::default() };
        assert_eq!(arm(&st).unwrap().status.battery, ARM_MIN_BATTERY - 1);
    }

    #[test]
    fn arm_while_already_armed() {
        let armed = arm(&DroneStatus::default()).unwrap().status;
        let err = arm(&armed).unwrap_err();
        assert!(matches!(err, CommandError::InvalidState(_)));
    }

    #[test]
    fn arm_while_flying() {
        let err = arm(&flying()).unwrap_err();
        assert!(matches!(err, CommandError::InvalidState(_)));
    }

    #[test]
    fn takeoff_after_arming() {
        let st = flying();
        assert_eq!(st.state, FlightState::Flying);
        assert_eq!(st.altitude, TAKEOFF_ALTITUDE_M);
        assert_eq!(st.flight_mode, FlightMode::Auto);
        assert_eq!(st.battery, 94);
        assert_eq!(st.current_wp_index, None);
    }

    #[test]
    fn takeoff_without_arming() {
        let err = takeoff(&DroneStatus::default()).unwrap_err();
        assert!(matches!(err, CommandError::InvalidState(_)));
        assert!(err.to_string().contains("armed"));
    }

    #[test]
    fn takeoff_without_gps_lock() {
        let mut armed = arm(&DroneStatus::default()).unwrap().status;
        armed.gps_locked = false;
        let err = takeoff(&armed).unwrap_err();
        assert!(matches!(err, CommandError::PreconditionFailed(_)));
    }

    #[test]
    fn takeoff_with_low_battery() {
        let mut armed = arm(&DroneStatus::default()).unwrap().status;
        armed.battery = TAKEOFF_MIN_BATTERY - 1;
        let err = takeoff(&armed).unwrap_err();
        assert!(matches!(err, CommandError::InsufficientResource(_)));
    }

    #[test]
    fn takeoff_with_mission_starts_first_leg() {
        let mut armed = arm(&DroneStatus::default()).unwrap().status;
        armed.mission = vec![
            Waypoint { name: "A".into(), lat: 51.0, lng: -114.0 },
            Waypoint { name: "B".into(), lat: 51.1, lng: -114.1 },
        ];
        let st = takeoff(&armed).unwrap().status;
        assert_eq!(st.current_wp_index, Some(0));
    }

    #[test]
    fn land_only_from_flying() {
        let st = land(&flying()).unwrap().status;
        assert_eq!(st.state, FlightState::Landing);
        assert_eq!(st.flight_mode, FlightMode::Manual);
        assert!(st.armed, "armed carries through the descent");
        assert_eq!(st.battery, 92);

        let err = land(&DroneStatus::default()).unwrap_err();
        assert!(matches!(err, CommandError::InvalidState(_)));
        assert!(err.to_string().contains("must be flying"));
    }

    #[test]
    fn battery_costs_clamp_at_zero() {
        let mut st = flying();
        st.battery = 1;
        assert_eq!(land(&st).unwrap().status.battery, 0);
    }

    #[test]
    fn upload_requires_gps_lock() {
        let st = DroneStatus { gps_locked: false, ..DroneStatus::default() };
        let err = upload_mission(&st, Vec::new()).unwrap_err();
        assert!(matches!(err, CommandError::PreconditionFailed(_)));
        assert!(err.to_string().to_lowercase().contains("gps"));
    }

    #[test]
    fn upload_replaces_mission() {
        let st = DroneStatus::default();
        let mission = vec![Waypoint { name: "A".into(), lat: 51.0, lng: -114.0 }];
        let out = upload_mission(&st, mission).unwrap();
        assert_eq!(out.status.mission.len(), 1);
        assert_eq!(out.message, "Mission uploaded");
    }

    #[test]
    fn upload_shorter_mission_clears_stale_index() {
        let mut st = flying();
        st.mission = vec![
            Waypoint { name: "A".into(), lat: 51.0, lng: -114.0 },
            Waypoint { name: "B".into(), lat: 51.1, lng: -114.1 },
        ];
        st.current_wp_index = Some(1);
        let out = upload_mission(&st, vec![Waypoint { name: "C".into(), lat: 51.2, lng: -114.2 }])
            .unwrap();
        assert_eq!(out.status.current_wp_index, None);
    }

    #[test]
    fn clear_mission_always_succeeds() {
        let mut st = flying();
        st.mission = vec![Waypoint { name: "A".into(), lat: 51.0, lng: -114.0 }];
        st.current_wp_index = Some(0);
        let out = clear_mission(&st);
        assert!(out.status.mission.is_empty());
        assert_eq!(out.status.current_wp_index, None);
    }

    #[test]
    fn inject_gps_loss() {
        let out = inject_failure(&DroneStatus::default(), "gps_loss").unwrap();
        assert!(!out.status.gps_locked);
    }

    #[test]
    fn inject_low_battery() {
        let out = inject_failure(&DroneStatus::default(), "low_battery").unwrap();
        assert_eq!(out.status.battery, INJECTED_LOW_BATTERY);
    }

    #[test]
    fn inject_motor_fail_requires_flying() {
        let err = inject_failure(&DroneStatus::default(), "motor_fail").unwrap_err();
        assert!(matches!(err, CommandError::InvalidState(_)));

        let out = inject_failure(&flying(), "motor_fail").unwrap();
        assert_eq!(out.status.state, FlightState::Landing);
        assert_eq!(out.status.flight_mode, FlightMode::Failsafe);
    }

    #[test]
    fn inject_reset_failures_restores_health() {
        let broken = DroneStatus {
            gps_locked: false,
            battery: 4,
            flight_mode: FlightMode::Failsafe,
            ..DroneStatus::default()
        };
        let out = inject_failure(&broken, "reset_failures").unwrap();
        assert!(out.status.gps_locked);
        assert_eq!(out.status.battery, 100);
        assert_eq!(out.status.flight_mode, FlightMode::Manual);
    }

    #[test]
    fn inject_unknown_mode() {
        let err = inject_failure(&DroneStatus::default(), "gremlins").unwrap_err();
        assert!(matches!(err, CommandError::InvalidInput(_)));
        assert!(err.to_string().contains("gremlins"));
    }

    #[test]
    fn reset_is_idempotent() {
        let first = reset();
        let second = reset();
        assert_eq!(first.status, second.status);
        assert_eq!(first.status, DroneStatus::default());
    }
}
