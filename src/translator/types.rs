//! Types produced by question translation.

use serde::{Serialize, Serializer};
use std::fmt;

use super::templates::Template;

/// Where a translated query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Rendered from a hand-written template.
    Template(Template),
    /// Produced by the generative model.
    Generated,
}

impl Provenance {
    /// Short tag: `"template"` or `"generated"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Generated => "generated",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => write!(f, "template:{}", template),
            Self::Generated => write!(f, "generated"),
        }
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.kind())
    }
}

/// A SQL string ready for execution, tagged with its provenance.
///
/// Always non-empty: a failed translation yields no `TranslatedQuery` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedQuery {
    sql: String,
    provenance: Provenance,
}

impl TranslatedQuery {
    pub(crate) fn from_template(template: Template, sql: String) -> Self {
        Self {
            sql,
            provenance: Provenance::Template(template),
        }
    }

    /// Wraps model output; `None` if nothing usable remains.
    pub(crate) fn generated(sql: String) -> Option<Self> {
        (!sql.trim().is_empty()).then_some(Self {
            sql,
            provenance: Provenance::Generated,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Why a question produced no query.
///
/// Both reasons surface to callers as the same refusal message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The question contains no healthcare pricing or quality vocabulary.
    OutOfScope,
    /// No template matched and the model was unavailable or failed.
    TranslationUnavailable,
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfScope => write!(f, "out_of_scope"),
            Self::TranslationUnavailable => write!(f, "translation_unavailable"),
        }
    }
}
