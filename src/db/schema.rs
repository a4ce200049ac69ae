/// Schema for the provider pricing store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- Providers: one row per provider and diagnosis-related group
CREATE TABLE IF NOT EXISTS providers (
    id INTEGER PRIMARY KEY,
    provider_ccn TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zip TEXT NOT NULL,
    drg_code TEXT NOT NULL,
    drg_desc TEXT NOT NULL,
    average_covered_charges REAL,
    average_total_payments REAL,
    average_medicare_payments REAL,
    lat REAL,
    lon REAL
);

-- Ratings: quality scores owned by a provider
CREATE TABLE IF NOT EXISTS ratings (
    id INTEGER PRIMARY KEY,
    provider_ccn TEXT NOT NULL,
    score INTEGER NOT NULL,
    FOREIGN KEY (provider_ccn) REFERENCES providers(provider_ccn) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS ix_providers_provider_ccn ON providers(provider_ccn);
CREATE INDEX IF NOT EXISTS ix_providers_drg_code ON providers(drg_code);
CREATE INDEX IF NOT EXISTS ix_ratings_provider_ccn ON ratings(provider_ccn);
"#;
