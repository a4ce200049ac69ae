use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::Database;
use crate::executor;
use crate::geo::{PostalCodeLookup, filter_within_radius};
use crate::models::{Provider, Record, SearchFilter};
use crate::translator::{Provenance, QueryTranslator};

/// Message returned for every question that cannot be answered.
pub const REFUSAL_MESSAGE: &str =
    "I can only help with hospital pricing and quality information.";

/// Outcome of [`CostNavigator::ask`].
///
/// Serializes to one of `{"answer": [...], "provenance": "..."}`,
/// `{"refusal": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AskResponse {
    /// The question was translated and the query ran.
    Answer {
        answer: Vec<Record>,
        provenance: Provenance,
    },
    /// Out of scope, or no translation was possible.
    Refusal { refusal: String },
    /// The question was understood but its query failed in the store.
    ExecutionError { error: String },
}

impl AskResponse {
    fn refusal() -> Self {
        Self::Refusal {
            refusal: REFUSAL_MESSAGE.to_string(),
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }

    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Refusal { .. })
    }

    /// Rows of a successful answer.
    pub fn rows(&self) -> Option<&[Record]> {
        match self {
            Self::Answer { answer, .. } => Some(answer),
            _ => None,
        }
    }
}

/// Service layer answering pricing questions and provider searches.
///
/// Owns the database and the translation pipeline. Holds no per-request
/// state, so every call is independent of the ones before it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use costnav::{CostNavigator, Database, PostalCodeDirectory, QueryTranslator};
///
/// # fn main() -> anyhow::Result<()> {
/// let navigator = CostNavigator::new(
///     Database::in_memory()?,
///     QueryTranslator::new(None),
///     Arc::new(PostalCodeDirectory::new()),
/// );
/// assert!(navigator.ask("tell me a joke").is_refusal());
/// # Ok(())
/// # }
/// ```
pub struct CostNavigator {
    db: Database,
    translator: QueryTranslator,
    postal_codes: Arc<dyn PostalCodeLookup>,
}

impl CostNavigator {
    pub fn new(
        db: Database,
        translator: QueryTranslator,
        postal_codes: Arc<dyn PostalCodeLookup>,
    ) -> Self {
        Self {
            db,
            translator,
            postal_codes,
        }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Answers a free-form question by translating it to SQL and running it.
    ///
    /// Never fails: every outcome, including store errors, is an
    /// [`AskResponse`] variant.
    pub fn ask(&self, question: &str) -> AskResponse {
        let query = match self.translator.translate(question) {
            Ok(query) => query,
            Err(reason) => {
                info!(%reason, "question refused");
                return AskResponse::refusal();
            }
        };

        let provenance = query.provenance();
        debug!(%provenance, sql = query.sql(), "executing translated query");

        match executor::execute(&self.db, &query) {
            Ok(rows) => {
                info!(%provenance, rows = rows.len(), "question answered");
                AskResponse::Answer {
                    answer: rows,
                    provenance,
                }
            }
            Err(error) => {
                warn!(%provenance, sql = query.sql(), %error, "translated query failed");
                AskResponse::ExecutionError {
                    error: error.to_string(),
                }
            }
        }
    }

    /// Lists providers matching `filter`, cheapest first.
    ///
    /// Radius filtering runs only when the filter has both a postal code and
    /// a radius; an unknown postal code skips it. Providers without a covered
    /// charge sort as zero, ahead of every priced provider.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store query fails.
    pub fn search_providers(&self, filter: &SearchFilter) -> Result<Vec<Provider>> {
        let mut providers = self.db.fetch_providers(filter.drg())?;

        if let Some((postal_code, radius_km)) = filter.radius_bounds() {
            let origin = self.postal_codes.resolve(postal_code);
            if origin.is_none() {
                debug!(postal_code, "postal code unresolved");
            }
            providers = filter_within_radius(origin, radius_km, providers);
        }

        sort_by_covered_charge(&mut providers);
        Ok(providers)
    }
}

/// Stable ascending sort on covered charge, missing values as zero.
fn sort_by_covered_charge(providers: &mut [Provider]) {
    providers.sort_by(|a, b| a.covered_charge_rank().total_cmp(&b.covered_charge_rank()));
}
