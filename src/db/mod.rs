mod schema;

use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, Row, params};

use crate::models::{Provider, ProviderCcn, Rating};
use schema::INITIAL_SCHEMA;

const PROVIDER_COLUMNS: &str = "id, provider_ccn, name, city, state, zip, drg_code, drg_desc, \
     average_covered_charges, average_total_payments, average_medicare_payments, lat, lon";

/// Database wrapper providing connection management and schema initialization.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically initializes the schema on connection open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Enables foreign keys (needed for rating cascades) and creates tables.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn.execute_batch(INITIAL_SCHEMA)?;
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Inserts a provider row and returns its assigned row ID.
    ///
    /// The `id` field of `provider` is ignored.
    pub fn insert_provider(&self, provider: &Provider) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO providers (provider_ccn, name, city, state, zip, drg_code, drg_desc,
                 average_covered_charges, average_total_payments, average_medicare_payments,
                 lat, lon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                provider.provider_ccn.as_str(),
                provider.name,
                provider.city,
                provider.state,
                provider.zip,
                provider.drg_code,
                provider.drg_desc,
                provider.average_covered_charges,
                provider.average_total_payments,
                provider.average_medicare_payments,
                provider.lat,
                provider.lon,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Records a rating for an existing provider.
    ///
    /// Fails if no provider with `ccn` exists.
    pub fn insert_rating(&self, ccn: &ProviderCcn, score: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO ratings (provider_ccn, score) VALUES (?1, ?2)",
            params![ccn.as_str(), score],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Deletes a provider and, through the foreign key cascade, its ratings.
    ///
    /// Returns `false` if no provider matched.
    pub fn delete_provider(&self, ccn: &ProviderCcn) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM providers WHERE provider_ccn = ?1",
            [ccn.as_str()],
        )?;
        Ok(deleted > 0)
    }

    /// Fetches providers, optionally restricted by a DRG filter.
    ///
    /// A provider matches when its `drg_code` equals `drg` or its `drg_desc`
    /// contains `drg` (case-insensitive). Rows come back in insertion order.
    pub fn fetch_providers(&self, drg: Option<&str>) -> Result<Vec<Provider>> {
        let providers = match drg {
            Some(drg) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {PROVIDER_COLUMNS} FROM providers
                     WHERE drg_code = ?1 OR LOWER(drg_desc) LIKE '%' || LOWER(?1) || '%'
                     ORDER BY id"
                ))?;
                stmt.query_map([drg], provider_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT {PROVIDER_COLUMNS} FROM providers ORDER BY id"))?;
                stmt.query_map([], provider_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(providers)
    }

    /// Returns all ratings for a provider, oldest first.
    pub fn ratings_for(&self, ccn: &ProviderCcn) -> Result<Vec<Rating>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, provider_ccn, score FROM ratings WHERE provider_ccn = ?1 ORDER BY id",
        )?;
        let ratings = stmt
            .query_map([ccn.as_str()], |row| {
                Ok(Rating {
                    id: row.get(0)?,
                    provider_ccn: ProviderCcn::new(row.get::<_, String>(1)?),
                    score: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ratings)
    }
}

fn provider_from_row(row: &Row<'_>) -> rusqlite::Result<Provider> {
    Ok(Provider {
        id: row.get(0)?,
        provider_ccn: ProviderCcn::new(row.get::<_, String>(1)?),
        name: row.get(2)?,
        city: row.get(3)?,
        state: row.get(4)?,
        zip: row.get(5)?,
        drg_code: row.get(6)?,
        drg_desc: row.get(7)?,
        average_covered_charges: row.get(8)?,
        average_total_payments: row.get(9)?,
        average_medicare_payments: row.get(10)?,
        lat: row.get(11)?,
        lon: row.get(12)?,
    })
}
