use thiserror::Error;

/// Rejected search filter input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchFilterError {
    #[error("radius must be a positive number of kilometres, got {0}")]
    NonPositiveRadius(f64),
}

/// Criteria for a structured provider search.
///
/// Blank strings are treated as absent. The radius, when present, is always
/// strictly positive because [`SearchFilter::with_radius_km`] refuses anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    drg: Option<String>,
    postal_code: Option<String>,
    radius_km: Option<f64>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a DRG code, or a substring of the DRG description.
    pub fn with_drg(mut self, drg: impl AsRef<str>) -> Self {
        self.drg = non_blank(drg.as_ref());
        self
    }

    /// Sets the origin postal code for radius filtering.
    pub fn with_postal_code(mut self, postal_code: impl AsRef<str>) -> Self {
        self.postal_code = non_blank(postal_code.as_ref());
        self
    }

    /// Sets the search radius in kilometres.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveRadius` for zero, negative, or NaN input.
    pub fn with_radius_km(mut self, radius_km: f64) -> Result<Self, SearchFilterError> {
        if radius_km.is_nan() || radius_km <= 0.0 {
            return Err(SearchFilterError::NonPositiveRadius(radius_km));
        }
        self.radius_km = Some(radius_km);
        Ok(self)
    }

    pub fn drg(&self) -> Option<&str> {
        self.drg.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn radius_km(&self) -> Option<f64> {
        self.radius_km
    }

    /// Returns the origin postal code and radius, only when both are set.
    pub fn radius_bounds(&self) -> Option<(&str, f64)> {
        match (self.postal_code.as_deref(), self.radius_km) {
            (Some(postal_code), Some(radius_km)) => Some((postal_code, radius_km)),
            _ => None,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
