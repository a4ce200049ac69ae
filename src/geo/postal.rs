use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use super::GeoPoint;

/// Resolves postal codes to coordinates.
///
/// Implementations never fail: an unknown or malformed code is `None`.
pub trait PostalCodeLookup: Send + Sync {
    fn resolve(&self, postal_code: &str) -> Option<GeoPoint>;
}

/// Normalizes user-supplied postal codes before lookup.
///
/// Trims whitespace and drops a ZIP+4 extension (`"10001-1234"` -> `"10001"`).
/// Returns `None` for blank input or codes containing anything other than
/// ASCII letters, digits, and inner spaces.
pub fn normalize_postal_code(postal_code: &str) -> Option<String> {
    let base = postal_code.trim().split('-').next().unwrap_or_default().trim();
    if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return None;
    }
    Some(base.to_ascii_uppercase())
}

/// In-memory postal code table.
///
/// Usually loaded from a GeoNames postal code dump (the `US.txt` file from
/// `download.geonames.org/export/zip`), which is tab-separated with the
/// postal code in column 1 and latitude/longitude in columns 9 and 10.
#[derive(Debug, Clone, Default)]
pub struct PostalCodeDirectory {
    entries: HashMap<String, GeoPoint>,
}

/// Column positions in the GeoNames postal code export.
const GEONAMES_POSTAL_CODE: usize = 1;
const GEONAMES_LATITUDE: usize = 9;
const GEONAMES_LONGITUDE: usize = 10;

impl PostalCodeDirectory {
    /// Creates an empty directory; every lookup is unresolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a single entry.
    pub fn insert(&mut self, postal_code: &str, point: GeoPoint) {
        if let Some(code) = normalize_postal_code(postal_code) {
            self.entries.insert(code, point);
        }
    }

    /// Loads a GeoNames postal code file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open postal code file: {}", path.display()))?;
        Self::from_geonames(file)
            .with_context(|| format!("Failed to read postal code file: {}", path.display()))
    }

    /// Parses GeoNames tab-separated rows.
    ///
    /// The export has no header and no quoting. Rows with too few columns or
    /// unparseable coordinates are skipped. When a code appears more than
    /// once the first row wins.
    pub fn from_geonames(reader: impl Read) -> Result<Self> {
        let mut rows = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut directory = Self::new();
        let mut skipped = 0usize;

        for record in rows.records() {
            let record = record?;

            match parse_geonames_row(&record) {
                Some((code, point)) => {
                    directory.entries.entry(code).or_insert(point);
                }
                None => skipped += 1,
            }
        }

        debug!(
            entries = directory.entries.len(),
            skipped, "loaded postal code directory"
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PostalCodeLookup for PostalCodeDirectory {
    fn resolve(&self, postal_code: &str) -> Option<GeoPoint> {
        let code = normalize_postal_code(postal_code)?;
        self.entries.get(&code).copied()
    }
}

fn parse_geonames_row(record: &StringRecord) -> Option<(String, GeoPoint)> {
    let code = normalize_postal_code(record.get(GEONAMES_POSTAL_CODE)?)?;
    let latitude: f64 = record.get(GEONAMES_LATITUDE)?.trim().parse().ok()?;
    let longitude: f64 = record.get(GEONAMES_LONGITUDE)?.trim().parse().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    Some((code, GeoPoint::new(latitude, longitude)))
}
