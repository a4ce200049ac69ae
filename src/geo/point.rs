use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Anything that may carry a resolved location.
pub trait Located {
    /// Returns `None` when the location is unknown or only partially known.
    fn coordinate(&self) -> Option<GeoPoint>;
}

impl Located for GeoPoint {
    fn coordinate(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl Located for Option<GeoPoint> {
    fn coordinate(&self) -> Option<GeoPoint> {
        *self
    }
}
