//! Great-circle distance and geofence checks.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_METERS`]. Inputs are degrees.
//!
//! # Preconditions
//!
//! Latitudes are expected in `[-90, 90]` and longitudes in `[-180, 180]`.
//! Nothing here validates them; see [`crate::models::PunchRequest::validate`].

use serde::{Deserialize, Serialize};

use crate::config::WorkSite;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Outcome of checking a location against the work-site geofence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeofenceCheck {
    /// Distance from the site center in meters.
    pub distance_meters: f64,
    /// True when the distance is within the radius (inclusive).
    pub within: bool,
}

/// Computes the great-circle distance between two points in meters.
///
/// The result is symmetric in the order of the points and zero for
/// identical points.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::distance_meters;
///
/// // One degree of latitude is roughly 111.2 km
/// let d = distance_meters(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111_194.9).abs() < 1.0);
/// assert_eq!(distance_meters(34.0, -84.0, 34.0, -84.0), 0.0);
/// ```
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Returns true if `(lat, lon)` lies within `radius_meters` of the origin.
///
/// The boundary is inclusive: a point exactly `radius_meters` away is inside.
pub fn is_within_geofence(
    lat: f64,
    lon: f64,
    origin_lat: f64,
    origin_lon: f64,
    radius_meters: f64,
) -> bool {
    distance_meters(lat, lon, origin_lat, origin_lon) <= radius_meters
}

/// Checks a location against the configured work site.
///
/// # Example
///
/// ```
/// use timeclock_engine::calculation::check_geofence;
/// use timeclock_engine::config::WorkSite;
///
/// let site = WorkSite {
///     name: "HQ".to_string(),
///     latitude: 34.0659,
///     longitude: -84.6769,
///     geofence_radius_meters: 100.0,
/// };
/// assert!(check_geofence(&site, 34.0660, -84.6770).within);
/// assert!(!check_geofence(&site, 34.0700, -84.6769).within);
/// ```
pub fn check_geofence(site: &WorkSite, lat: f64, lon: f64) -> GeofenceCheck {
    let distance = distance_meters(lat, lon, site.latitude, site.longitude);
    GeofenceCheck {
        distance_meters: distance,
        within: distance <= site.geofence_radius_meters,
    }
}
