//! Natural-language question to SQL translation.
//!
//! Questions pass through three stages in order: a keyword scope gate, a
//! fixed priority list of SQL templates, and finally an optional completion
//! model. The first stage to decide wins.

mod classifier;
mod generative;
mod templates;
mod types;

use std::sync::Arc;

use tracing::debug;

use crate::llm::CompletionClient;

pub use classifier::{SCOPE_TERMS, is_in_scope};
pub use generative::{GenerativeTranslator, SYSTEM_PROMPT, TranslationError, strip_code_fence};
pub use templates::{RANKING_LIMIT, Template, extract_drg_code, match_template};
pub use types::{Provenance, RefusalReason, TranslatedQuery};

/// Full question-to-SQL pipeline.
#[derive(Clone, Default)]
pub struct QueryTranslator {
    generative: GenerativeTranslator,
}

impl QueryTranslator {
    /// Creates a pipeline. Without a client only template questions translate.
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self {
            generative: GenerativeTranslator::new(client),
        }
    }

    /// Translates a question into SQL, or explains why it could not.
    pub fn translate(&self, question: &str) -> Result<TranslatedQuery, RefusalReason> {
        if !is_in_scope(question) {
            debug!("question rejected by scope gate");
            return Err(RefusalReason::OutOfScope);
        }

        if let Some((template, sql)) = match_template(question) {
            debug!(%template, "question matched template");
            return Ok(TranslatedQuery::from_template(template, sql));
        }

        self.generative
            .translate(question)
            .ok_or(RefusalReason::TranslationUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and always answers with the same SQL.
    struct CountingClient {
        calls: AtomicUsize,
    }

    impl CompletionClient for CountingClient {
        fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("```sql\nSELECT COUNT(*) AS n FROM providers\n```".to_string())
        }
    }

    fn counting_pipeline() -> (Arc<CountingClient>, QueryTranslator) {
        let client = Arc::new(CountingClient {
            calls: AtomicUsize::new(0),
        });
        let shared: Arc<dyn CompletionClient> = client.clone();
        (client, QueryTranslator::new(Some(shared)))
    }

    #[test]
    fn out_of_scope_question_never_reaches_the_model() {
        let (client, translator) = counting_pipeline();

        assert_eq!(
            translator.translate("What's the capital of France?"),
            Err(RefusalReason::OutOfScope)
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn template_hit_skips_the_model() {
        let (client, translator) = counting_pipeline();

        let query = translator
            .translate("What is the average charge for drg 270?")
            .unwrap();
        assert_eq!(
            query.provenance(),
            Provenance::Template(Template::AverageChargeForDrg)
        );
        assert!(query.sql().contains("drg_code = '270'"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unmatched_in_scope_question_uses_the_model() {
        let (client, translator) = counting_pipeline();

        let query = translator.translate("How many hospitals are listed?").unwrap();
        assert_eq!(query.provenance(), Provenance::Generated);
        assert_eq!(query.sql(), "SELECT COUNT(*) AS n FROM providers");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unmatched_question_without_model_is_unavailable() {
        let translator = QueryTranslator::new(None);

        assert_eq!(
            translator.translate("How many hospitals are listed?"),
            Err(RefusalReason::TranslationUnavailable)
        );
    }

    #[test]
    fn templates_work_without_a_model() {
        let translator = QueryTranslator::default();

        let query = translator.translate("Show the highest rated providers").unwrap();
        assert_eq!(
            query.provenance(),
            Provenance::Template(Template::HighestRatedProviders)
        );
    }
}
