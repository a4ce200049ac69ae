//! Model-backed translation for questions no template covers.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::types::TranslatedQuery;
use crate::llm::{CompletionClient, LlmError};

/// Instruction describing the store to the model.
pub const SYSTEM_PROMPT: &str = "Translate the user question into a SQL query for a SQLite database. \
The database has tables 'providers' and 'ratings'.\n\
Schema: providers(id, name, city, state, zip, drg_code, drg_desc, \
average_covered_charges, average_total_payments, average_medicare_payments, \
lat, lon, provider_ccn); ratings(id, provider_ccn, score).\n\
Return ONLY the SQL.";

/// Why the model produced no usable query.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("no completion client configured")]
    NotConfigured,

    #[error("completion request failed: {0}")]
    Completion(#[from] LlmError),

    #[error("model returned no SQL")]
    EmptyResponse,
}

/// Asks a completion model to write SQL for a question.
///
/// Makes exactly one request per question. Any failure becomes "no
/// translation"; the cause is logged, never returned to the caller.
#[derive(Clone, Default)]
pub struct GenerativeTranslator {
    client: Option<Arc<dyn CompletionClient>>,
}

impl GenerativeTranslator {
    /// Creates a translator. `None` means the model is not configured.
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Translates `question`, or returns `None` if the model is unavailable.
    pub fn translate(&self, question: &str) -> Option<TranslatedQuery> {
        match self.try_translate(question) {
            Ok(query) => Some(query),
            Err(TranslationError::NotConfigured) => {
                debug!("generative translation skipped: no completion client configured");
                None
            }
            Err(error) => {
                warn!(%error, "generative translation failed");
                None
            }
        }
    }

    /// Like [`translate`](Self::translate) but keeps the failure reason.
    pub fn try_translate(&self, question: &str) -> Result<TranslatedQuery, TranslationError> {
        let client = self.client.as_ref().ok_or(TranslationError::NotConfigured)?;
        let response = client.complete(SYSTEM_PROMPT, question)?;
        let sql = sanitize_generated_sql(&response);
        debug!(%sql, "model produced SQL");
        TranslatedQuery::generated(sql).ok_or(TranslationError::EmptyResponse)
    }
}

/// Removes a surrounding Markdown code fence and trims whitespace.
///
/// Handles an optional language tag on the opening fence (```` ```sql ````).
/// Nested fences are peeled until none remain, so applying this twice is the
/// same as applying it once. Text without a fence is only trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let mut current = text.trim();
    while let Some(inner) = strip_one_fence(current) {
        current = inner;
    }
    current.to_string()
}

fn strip_one_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix("```")?.strip_suffix("```")?;
    let body = match body.split_once('\n') {
        Some((first_line, rest)) if is_language_tag(first_line.trim()) => rest,
        _ => body,
    };
    Some(body.trim())
}

/// An info-string like `sql` or `postgresql`, but not the start of a query.
fn is_language_tag(line: &str) -> bool {
    const SQL_LEADING_KEYWORDS: &[&str] = &["select", "with", "values"];

    line.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        && !SQL_LEADING_KEYWORDS
            .iter()
            .any(|keyword| line.eq_ignore_ascii_case(keyword))
}

/// Fence stripping plus removal of a trailing statement terminator.
fn sanitize_generated_sql(response: &str) -> String {
    strip_code_fence(response)
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
        .to_string()
}
