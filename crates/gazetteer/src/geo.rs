//! Great-circle distance and radius containment on a spherical Earth.
//!
//! Accuracy of the spherical approximation is within ~0.5% of the ellipsoid,
//! which is acceptable for the sub-1000 km radii this directory serves.

use crate::model::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `point` lies within `radius_km` of `center`, boundary inclusive.
#[must_use]
pub fn within_radius(center: Coordinates, point: Coordinates, radius_km: f64) -> bool {
    distance_km(center, point) <= radius_km
}

/// Coarse lat/lng box guaranteed to contain the radius around `center`.
///
/// Used as a cheap prefilter before the exact haversine check. Widths blow
/// up near the poles; callers must still apply [`within_radius`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }
}

#[must_use]
pub fn bounding_box(center: Coordinates, radius_km: f64) -> BoundingBox {
    let lat_delta = (radius_km / EARTH_RADIUS_KM).to_degrees();
    // Longitude degrees shrink with latitude; clamp the cosine away from
    // zero so polar centers degrade to a full-longitude box.
    let cos_lat = center.lat.to_radians().cos().max(1e-6);
    let lng_delta = (lat_delta / cos_lat).min(180.0);

    BoundingBox {
        min_lat: center.lat - lat_delta,
        max_lat: center.lat + lat_delta,
        min_lng: center.lng - lng_delta,
        max_lng: center.lng + lng_delta,
    }
}
