pub mod config;
pub mod db;
pub mod executor;
pub mod geo;
pub mod llm;
pub mod models;
pub mod service;
pub mod translator;

pub use config::Config;
pub use db::Database;
pub use executor::ExecutionError;
pub use geo::{GeoPoint, PostalCodeDirectory, PostalCodeLookup};
pub use llm::{CompletionClient, LlmError, OpenAiClient, OpenAiClientBuilder};
pub use models::{
    Provider, ProviderBuilder, ProviderCcn, Rating, Record, ScalarValue, SearchFilter,
    SearchFilterError,
};
pub use service::{AskResponse, CostNavigator, REFUSAL_MESSAGE};
pub use translator::{Provenance, QueryTranslator, RefusalReason, Template, TranslatedQuery};
