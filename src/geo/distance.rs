use tracing::debug;

use super::{GeoPoint, Located};

/// Mean Earth radius used as the haversine scale constant.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Keeps the candidates within `radius_km` of `origin`, preserving order.
///
/// Candidates without a coordinate are dropped. When `origin` is `None` the
/// candidates are returned unfiltered, so an unknown origin never empties a
/// result set on its own.
pub fn filter_within_radius<T: Located>(
    origin: Option<GeoPoint>,
    radius_km: f64,
    candidates: Vec<T>,
) -> Vec<T> {
    let Some(origin) = origin else {
        debug!("origin unresolved, skipping radius filter");
        return candidates;
    };

    let before = candidates.len();
    let kept: Vec<T> = candidates
        .into_iter()
        .filter(|candidate| {
            candidate
                .coordinate()
                .is_some_and(|point| haversine_km(origin, point) <= radius_km)
        })
        .collect();

    debug!(before, after = kept.len(), radius_km, "applied radius filter");
    kept
}
