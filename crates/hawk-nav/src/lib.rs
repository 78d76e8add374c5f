pub mod doctor;
pub mod geo;

pub use geo::{plan_mission, MissionArea, PlacementError};
