use hawk_proto::Waypoint;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Area waypoints are placed in: a disc around the base coordinate.
/// Radius and attempt budget are operator policy, so they come from config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionArea {
    pub base_lat: f64,
    pub base_lng: f64,
    pub max_radius_km: f64,
    pub max_attempts: u32,
}

impl Default for MissionArea {
    fn default() -> Self {
        Self {
            base_lat: 51.0447,
            base_lng: -114.0719,
            max_radius_km: 5.0,
            max_attempts: 8,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("could not place waypoint '{name}' within {radius_km} km of base after {attempts} attempts")]
pub struct PlacementError {
    pub name: String,
    pub radius_km: f64,
    pub attempts: u32,
}

/// Place one named waypoint inside the mission area.
///
/// Samples a lat/lng offset uniformly from the bounding box of the radius and
/// keeps the first sample whose great-circle distance to the base is inside
/// the disc. Exhausting the attempt budget fails the placement.
pub fn place_waypoint<R: Rng>(
    rng: &mut R,
    name: &str,
    area: &MissionArea,
) -> Result<Waypoint, PlacementError> {
    let r_lat = area.max_radius_km / KM_PER_DEG_LAT;
    // Longitude degrees shrink with latitude; keep the divisor off zero near the poles.
    let r_lng = area.max_radius_km / (KM_PER_DEG_LAT * area.base_lat.to_radians().cos().max(1e-6));

    for _ in 0..area.max_attempts {
        let lat = area.base_lat + rng.gen_range(-r_lat..=r_lat);
        let lng = area.base_lng + rng.gen_range(-r_lng..=r_lng);
        if haversine_km(area.base_lat, area.base_lng, lat, lng) <= area.max_radius_km {
            return Ok(Waypoint { name: name.to_string(), lat, lng });
        }
    }

    Err(PlacementError {
        name: name.to_string(),
        radius_km: area.max_radius_km,
        attempts: area.max_attempts,
    })
}

/// Generate a full mission from an ordered name list.
/// The first unplaceable waypoint aborts the whole plan.
pub fn plan_mission<R: Rng>(
    rng: &mut R,
    names: &[String],
    area: &MissionArea,
) -> Result<Vec<Waypoint>, PlacementError> {
    names.iter().map(|name| place_waypoint(rng, name, area)).collect()
}

// ----- Geometry -----

const KM_PER_DEG_LAT: f64 = 111.32;

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let r = 6_371.0_f64;
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    r * c
}
