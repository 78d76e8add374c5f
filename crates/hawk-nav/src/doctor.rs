use crate::geo::MissionArea;
use anyhow::Result;

pub fn check_mission_area(area: &MissionArea) -> Result<()> {
    anyhow::ensure!(
        area.base_lat.is_finite() && area.base_lat.abs() <= 90.0,
        "mission.base_lat invalid"
    );
    anyhow::ensure!(
        area.base_lng.is_finite() && area.base_lng.abs() <= 180.0,
        "mission.base_lng invalid"
    );
    anyhow::ensure!(area.max_radius_km > 0.0, "mission.max_radius_km must be positive");
    anyhow::ensure!(area.max_attempts >= 1, "mission.max_attempts must be >= 1");
    Ok(())
}
