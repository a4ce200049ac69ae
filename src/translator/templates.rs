//! Hand-written SQL for question shapes that do not need the model.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// `drg` followed by optional whitespace and a number, e.g. "DRG 470", "drg470".
static DRG_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)drg\s*(\d+)").expect("DRG pattern is valid"));

/// Row cap for ranking templates.
pub const RANKING_LIMIT: usize = 5;

const HIGHEST_RATED_PHRASES: &[&str] = &[
    "highest rated",
    "highest-rated",
    "best rated",
    "best-rated",
    "top rated",
    "top-rated",
    "best rating",
];

const CHEAPEST_PHRASES: &[&str] = &[
    "cheapest",
    "lowest cost",
    "lowest price",
    "lowest charge",
    "least expensive",
];

/// A known question shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// "average charge for DRG X" -> mean covered charge for that code.
    AverageChargeForDrg,
    /// "highest rated providers" -> top scores across all providers.
    HighestRatedProviders,
    /// "cheapest providers for DRG X" -> lowest covered charges for that code.
    CheapestProvidersForDrg,
}

impl Template {
    /// Evaluation order. Earlier entries win when several shapes match.
    pub const PRIORITY: [Template; 3] = [
        Template::AverageChargeForDrg,
        Template::HighestRatedProviders,
        Template::CheapestProvidersForDrg,
    ];

    /// Renders SQL for `question` if it has this shape.
    ///
    /// `question` must already be lower-cased.
    fn render(self, question: &str) -> Option<String> {
        match self {
            Self::AverageChargeForDrg => {
                if !(question.contains("average") && question.contains("charge")) {
                    return None;
                }
                let drg = extract_drg_code(question)?;
                Some(format!(
                    "SELECT AVG(average_covered_charges) AS avg_charge \
                     FROM providers WHERE drg_code = '{drg}'"
                ))
            }
            Self::HighestRatedProviders => {
                if !contains_any(question, HIGHEST_RATED_PHRASES) {
                    return None;
                }
                Some(format!(
                    "SELECT p.name, r.score \
                     FROM providers p \
                     JOIN ratings r ON p.provider_ccn = r.provider_ccn \
                     ORDER BY r.score DESC LIMIT {RANKING_LIMIT}"
                ))
            }
            Self::CheapestProvidersForDrg => {
                if !contains_any(question, CHEAPEST_PHRASES) {
                    return None;
                }
                let drg = extract_drg_code(question)?;
                Some(format!(
                    "SELECT name, city, state, zip, average_covered_charges \
                     FROM providers WHERE drg_code = '{drg}' \
                     ORDER BY average_covered_charges ASC LIMIT {RANKING_LIMIT}"
                ))
            }
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AverageChargeForDrg => write!(f, "average_charge_for_drg"),
            Self::HighestRatedProviders => write!(f, "highest_rated_providers"),
            Self::CheapestProvidersForDrg => write!(f, "cheapest_providers_for_drg"),
        }
    }
}

/// Returns the first DRG code mentioned in `question`.
///
/// Only digits are captured, so the result is safe to inline into SQL.
pub fn extract_drg_code(question: &str) -> Option<&str> {
    DRG_CODE
        .captures(question)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Finds the highest-priority template matching `question`.
///
/// Returns the template and its rendered SQL, or `None` when no shape fits.
pub fn match_template(question: &str) -> Option<(Template, String)> {
    let lowered = question.to_lowercase();
    Template::PRIORITY
        .iter()
        .find_map(|template| template.render(&lowered).map(|sql| (*template, sql)))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_drg_code_with_or_without_space() {
        assert_eq!(extract_drg_code("average charge for drg 270"), Some("270"));
        assert_eq!(extract_drg_code("DRG470 prices"), Some("470"));
        assert_eq!(extract_drg_code("drg   023?"), Some("023"));
        assert_eq!(extract_drg_code("no code here"), None);
        assert_eq!(extract_drg_code("drg abc"), None);
    }

    #[test]
    fn average_charge_question_filters_on_extracted_code() {
        let (template, sql) =
            match_template("What is the average charge for drg 270?").expect("should match");

        assert_eq!(template, Template::AverageChargeForDrg);
        assert!(sql.contains("AVG(average_covered_charges)"));
        assert!(sql.contains("drg_code = '270'"));
    }

    #[test]
    fn average_charge_without_drg_code_does_not_fire() {
        assert_eq!(match_template("What is the average charge for hip surgery?"), None);
    }

    #[test]
    fn highest_rated_question_is_limited_to_five() {
        let (template, sql) = match_template("Who are the highest rated providers?").unwrap();

        assert_eq!(template, Template::HighestRatedProviders);
        assert!(sql.contains("JOIN ratings r"));
        assert!(sql.contains("ORDER BY r.score DESC LIMIT 5"));
    }

    #[test]
    fn best_ratings_phrasing_matches_highest_rated() {
        let (template, _) = match_template("Which hospitals have the best ratings?").unwrap();
        assert_eq!(template, Template::HighestRatedProviders);
    }

    #[test]
    fn cheapest_with_drg_code_uses_drg_ranking() {
        let (template, sql) = match_template("Cheapest hospitals for DRG 470?").unwrap();

        assert_eq!(template, Template::CheapestProvidersForDrg);
        assert!(sql.contains("drg_code = '470'"));
        assert!(sql.contains("ORDER BY average_covered_charges ASC LIMIT 5"));
    }

    #[test]
    fn cheapest_without_drg_code_does_not_fire() {
        assert_eq!(match_template("Which hospital is cheapest?"), None);
    }

    #[test]
    fn average_charge_outranks_cheapest_when_both_match() {
        let (template, _) =
            match_template("cheapest average charge for drg 470").expect("should match");
        assert_eq!(template, Template::AverageChargeForDrg);
    }

    #[test]
    fn highest_rated_outranks_cheapest_when_both_match() {
        let (template, _) =
            match_template("highest rated or cheapest provider for drg 470").unwrap();
        assert_eq!(template, Template::HighestRatedProviders);
    }

    #[test]
    fn priority_list_covers_every_template_once() {
        let mut seen = std::collections::HashSet::new();
        for template in Template::PRIORITY {
            assert!(seen.insert(template), "{template} listed twice");
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(Template::PRIORITY[0], Template::AverageChargeForDrg);
    }

    #[test]
    fn unmatched_question_returns_none() {
        assert_eq!(match_template("How many hospitals are in Albany?"), None);
    }
}
