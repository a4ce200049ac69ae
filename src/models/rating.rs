use serde::{Deserialize, Serialize};

use super::ProviderCcn;

/// A quality score attached to a provider.
///
/// Scores are 1-10 in the seeded dataset; the range is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub provider_ccn: ProviderCcn,
    pub score: i64,
}
