use super::{GeoPoint, LocationProvider};

/// Reports a configured position.
pub struct FixedLocation {
    point: GeoPoint,
}

impl FixedLocation {
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Option<GeoPoint> {
        Some(self.point)
    }
}

/// No location fix is ever available.
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn current_location(&self) -> Option<GeoPoint> {
        None
    }
}
