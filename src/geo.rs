//! Postal-code geocoding and great-circle radius filtering.
//!
//! Geocoding is best-effort: an unknown postal code yields `None`, and a
//! radius filter with no resolved origin leaves its input untouched.

mod distance;
mod point;
mod postal;

pub use distance::{EARTH_RADIUS_KM, filter_within_radius, haversine_km};
pub use point::{GeoPoint, Located};
pub use postal::{PostalCodeDirectory, PostalCodeLookup, normalize_postal_code};
