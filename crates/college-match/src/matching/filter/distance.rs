use crate::matching::domain::GeoPoint;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance source used by the radius pass.
pub trait DistanceProvider: Send + Sync {
    fn distance_miles(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl DistanceProvider for HaversineDistance {
    fn distance_miles(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        let lat1 = from.latitude.to_radians();
        let lat2 = to.latitude.to_radians();
        let dlat = (to.latitude - from.latitude).to_radians();
        let dlon = (to.longitude - from.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_MILES * c
    }
}
