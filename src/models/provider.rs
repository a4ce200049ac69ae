use serde::{Deserialize, Serialize};

use super::ProviderCcn;
use crate::geo::{GeoPoint, Located};

/// A provider's pricing row for a single diagnosis-related group.
///
/// Coordinates are stored as two nullable columns; a provider only has a
/// usable location when both are present (see [`Provider::coordinate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Row identifier from the database.
    pub id: i64,
    /// External provider identifier.
    pub provider_ccn: ProviderCcn,
    pub name: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Diagnosis-related group code, e.g. `"470"`.
    pub drg_code: String,
    /// Human-readable diagnosis description.
    pub drg_desc: String,
    pub average_covered_charges: Option<f64>,
    pub average_total_payments: Option<f64>,
    pub average_medicare_payments: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Provider {
    /// Returns the provider's location if both latitude and longitude are known.
    pub fn coordinate(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Covered charge used for price ranking. Missing charges rank as zero.
    pub fn covered_charge_rank(&self) -> f64 {
        self.average_covered_charges.unwrap_or(0.0)
    }
}

impl Located for Provider {
    fn coordinate(&self) -> Option<GeoPoint> {
        Provider::coordinate(self)
    }
}

/// Builder for constructing `Provider` instances with optional fields.
///
/// # Examples
///
/// ```
/// use costnav::ProviderBuilder;
///
/// let provider = ProviderBuilder::new("330101", "NYU Langone")
///     .drg("470", "MAJOR HIP AND KNEE JOINT REPLACEMENT")
///     .covered_charges(42_000.0)
///     .build();
///
/// assert_eq!(provider.provider_ccn.as_str(), "330101");
/// assert!(provider.coordinate().is_none());
/// ```
#[derive(Debug, Default)]
pub struct ProviderBuilder {
    id: i64,
    provider_ccn: String,
    name: String,
    city: String,
    state: String,
    zip: String,
    drg_code: String,
    drg_desc: String,
    average_covered_charges: Option<f64>,
    average_total_payments: Option<f64>,
    average_medicare_payments: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl ProviderBuilder {
    /// Creates a builder with the two identifying fields set.
    pub fn new(provider_ccn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider_ccn: provider_ccn.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the row ID. Ignored on insert; the database assigns its own.
    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets city, state and postal code.
    pub fn location(
        mut self,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        self.city = city.into();
        self.state = state.into();
        self.zip = zip.into();
        self
    }

    /// Sets the diagnosis code and description.
    pub fn drg(mut self, code: impl Into<String>, description: impl Into<String>) -> Self {
        self.drg_code = code.into();
        self.drg_desc = description.into();
        self
    }

    pub fn covered_charges(mut self, amount: f64) -> Self {
        self.average_covered_charges = Some(amount);
        self
    }

    pub fn total_payments(mut self, amount: f64) -> Self {
        self.average_total_payments = Some(amount);
        self
    }

    pub fn medicare_payments(mut self, amount: f64) -> Self {
        self.average_medicare_payments = Some(amount);
        self
    }

    /// Sets both coordinates.
    pub fn coordinate(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Sets coordinates independently, allowing half-populated rows.
    pub fn raw_coordinates(mut self, lat: Option<f64>, lon: Option<f64>) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }

    pub fn build(self) -> Provider {
        Provider {
            id: self.id,
            provider_ccn: ProviderCcn::new(self.provider_ccn),
            name: self.name,
            city: self.city,
            state: self.state,
            zip: self.zip,
            drg_code: self.drg_code,
            drg_desc: self.drg_desc,
            average_covered_charges: self.average_covered_charges,
            average_total_payments: self.average_total_payments,
            average_medicare_payments: self.average_medicare_payments,
            lat: self.lat,
            lon: self.lon,
        }
    }
}
