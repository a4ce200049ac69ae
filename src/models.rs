mod ids;
mod provider;
mod rating;
mod record;
mod search_filter;

pub use ids::ProviderCcn;
pub use provider::{Provider, ProviderBuilder};
pub use rating::Rating;
pub use record::{Record, ScalarValue};
pub use search_filter::{SearchFilter, SearchFilterError};
