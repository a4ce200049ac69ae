//! Runs translated SQL against the store.

use thiserror::Error;

use crate::Database;
use crate::models::{Record, ScalarValue};
use crate::translator::TranslatedQuery;

/// A translated query that the store refused or failed to run.
///
/// Carries the store's own message (syntax errors, unknown columns, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecutionError {
    message: String,
}

impl ExecutionError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<rusqlite::Error> for ExecutionError {
    fn from(error: rusqlite::Error) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Executes `query` and returns its rows in the order the store yields them.
///
/// The SQL is passed through unchanged; read-only access is a property of
/// how the database is deployed, not something checked here.
pub fn execute(db: &Database, query: &TranslatedQuery) -> Result<Vec<Record>, ExecutionError> {
    let mut stmt = db.connection().prepare(query.sql())?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Record::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            record.push(column.as_str(), ScalarValue::from(row.get_ref(index)?));
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderBuilder;
    use crate::translator::match_template;

    fn generated(sql: &str) -> TranslatedQuery {
        TranslatedQuery::generated(sql.to_string()).unwrap()
    }

    fn seeded_db() -> Database {
        let db = Database::in_memory().unwrap();
        for (ccn, charge) in [("1", Some(300.0)), ("2", None), ("3", Some(100.0))] {
            let mut builder = ProviderBuilder::new(ccn, format!("Hospital {ccn}"))
                .location("Albany", "NY", "12208")
                .drg("470", "HIP");
            if let Some(charge) = charge {
                builder = builder.covered_charges(charge);
            }
            db.insert_provider(&builder.build()).unwrap();
        }
        db
    }

    #[test]
    fn rows_keep_store_order_and_column_order() {
        let db = seeded_db();
        let records = execute(
            &db,
            &generated(
                "SELECT provider_ccn, average_covered_charges AS charge \
                 FROM providers ORDER BY provider_ccn DESC",
            ),
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        let ccns: Vec<&str> = records
            .iter()
            .map(|r| r.get("provider_ccn").and_then(ScalarValue::as_str).unwrap())
            .collect();
        assert_eq!(ccns, vec!["3", "2", "1"]);
        assert_eq!(
            records[0].columns().collect::<Vec<_>>(),
            vec!["provider_ccn", "charge"]
        );
        assert_eq!(records[1].get("charge"), Some(&ScalarValue::Null));
        assert_eq!(records[2].get("charge"), Some(&ScalarValue::Real(300.0)));
    }

    #[test]
    fn aggregate_template_returns_single_row() {
        let db = seeded_db();
        let (template, sql) = match_template("average charge for drg 470").unwrap();
        let query = TranslatedQuery::from_template(template, sql);

        let records = execute(&db, &query).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("avg_charge").and_then(ScalarValue::as_f64),
            Some(200.0)
        );
    }

    #[test]
    fn empty_result_set_is_not_an_error() {
        let db = seeded_db();
        let records = execute(&db, &generated("SELECT * FROM providers WHERE 0")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn syntax_error_is_reported_with_store_message() {
        let db = seeded_db();
        let error = execute(&db, &generated("SELEC name FROM providers")).unwrap_err();
        assert!(error.message().contains("syntax error"), "got: {error}");
    }

    #[test]
    fn unknown_column_is_reported() {
        let db = seeded_db();
        let error = execute(&db, &generated("SELECT price FROM providers")).unwrap_err();
        assert!(error.message().contains("no such column"), "got: {error}");
    }
}
