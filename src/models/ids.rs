use serde::{Deserialize, Serialize};
use std::fmt;

/// CMS Certification Number identifying a provider.
///
/// Wraps the external identifier so it cannot be confused with other
/// free-form strings such as postal codes or DRG codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderCcn(String);

impl ProviderCcn {
    /// Creates a new provider CCN.
    pub fn new(ccn: impl Into<String>) -> Self {
        Self(ccn.into())
    }

    /// Returns the underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderCcn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderCcn {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccn_serializes_as_raw_string() {
        let ccn = ProviderCcn::new("330101");
        let json = serde_json::to_string(&ccn).unwrap();
        assert_eq!(json, r#""330101""#);

        let deserialized: ProviderCcn = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ccn);
    }

    #[test]
    fn ccn_display_matches_inner_value() {
        assert_eq!(ProviderCcn::from("050454").to_string(), "050454");
    }
}
