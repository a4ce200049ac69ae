/// Integration tests for provider search against a file-backed store and a
/// GeoNames postal code file on disk.
use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use costnav::{
    CostNavigator, Database, PostalCodeDirectory, ProviderBuilder, ProviderCcn, QueryTranslator,
    SearchFilter,
};
use tempfile::{NamedTempFile, TempDir, tempdir};

const GEONAMES_ROWS: &str = "\
US\t10001\tNew York\tNew York\tNY\tNew York\t061\t\t\t40.7506\t-73.9972\t4
US\t07102\tNewark\tNew Jersey\tNJ\tEssex\t013\t\t\t40.7357\t-74.1724\t4
US\t12207\tAlbany\tNew York\tNY\tAlbany\t001\t\t\t42.6526\t-73.7562\t4
";

struct Fixture {
    _dir: TempDir,
    navigator: CostNavigator,
}

fn fixture() -> Result<Fixture> {
    let dir = tempdir()?;
    let db = Database::open(dir.path().join("providers.db"))?;

    let rows = [
        ("330001", "Midtown General", "10001", 40.7506, -73.9972, "470", Some(60_000.0)),
        ("310002", "Newark Beth Israel", "07102", 40.7357, -74.1724, "470", Some(45_000.0)),
        ("330003", "Albany Medical", "12207", 42.6526, -73.7562, "470", Some(30_000.0)),
        ("330004", "Chelsea Clinic", "10001", 40.7450, -74.0010, "470", None),
        ("330005", "Heart Institute", "10001", 40.7510, -73.9900, "291", Some(10_000.0)),
    ];
    for (ccn, name, zip, lat, lon, drg, charge) in rows {
        let mut builder = ProviderBuilder::new(ccn, name)
            .location("", "", zip)
            .drg(drg, if drg == "470" { "MAJOR JOINT REPLACEMENT" } else { "HEART FAILURE" })
            .coordinate(lat, lon);
        if let Some(charge) = charge {
            builder = builder.covered_charges(charge);
        }
        db.insert_provider(&builder.build())?;
    }

    let mut file = NamedTempFile::new_in(dir.path())?;
    file.write_all(GEONAMES_ROWS.as_bytes())?;
    let postal_codes = PostalCodeDirectory::load(file.path())?;

    Ok(Fixture {
        _dir: dir,
        navigator: CostNavigator::new(db, QueryTranslator::new(None), Arc::new(postal_codes)),
    })
}

fn ccns(providers: &[costnav::Provider]) -> Vec<&str> {
    providers.iter().map(|p| p.provider_ccn.as_str()).collect()
}

#[test]
fn unfiltered_search_returns_everything_cheapest_first() -> Result<()> {
    let fixture = fixture()?;
    let providers = fixture.navigator.search_providers(&SearchFilter::new())?;

    assert_eq!(
        ccns(&providers),
        vec!["330004", "330005", "330003", "310002", "330001"]
    );
    Ok(())
}

#[test]
fn drg_description_text_matches_case_insensitively() -> Result<()> {
    let fixture = fixture()?;
    let filter = SearchFilter::new().with_drg("heart failure");
    let providers = fixture.navigator.search_providers(&filter)?;

    assert_eq!(ccns(&providers), vec!["330005"]);
    Ok(())
}

#[test]
fn radius_keeps_nearby_providers_across_state_lines() -> Result<()> {
    let fixture = fixture()?;
    let filter = SearchFilter::new()
        .with_drg("470")
        .with_postal_code("10001")
        .with_radius_km(50.0)?;
    let providers = fixture.navigator.search_providers(&filter)?;

    // Newark is ~15 km away, Albany ~210 km.
    assert_eq!(ccns(&providers), vec!["330004", "310002", "330001"]);
    Ok(())
}

#[test]
fn unknown_postal_code_skips_radius_filtering() -> Result<()> {
    let fixture = fixture()?;
    let filter = SearchFilter::new()
        .with_drg("470")
        .with_postal_code("99999")
        .with_radius_km(1.0)?;
    let providers = fixture.navigator.search_providers(&filter)?;

    assert_eq!(providers.len(), 4);
    Ok(())
}

#[test]
fn deleting_a_provider_removes_it_from_search() -> Result<()> {
    let fixture = fixture()?;
    let db = fixture.navigator.database();
    db.insert_rating(&ProviderCcn::new("330003"), 9)?;

    assert!(db.delete_provider(&ProviderCcn::new("330003"))?);
    assert!(db.ratings_for(&ProviderCcn::new("330003"))?.is_empty());

    let providers = fixture.navigator.search_providers(&SearchFilter::new().with_drg("470"))?;
    assert!(!ccns(&providers).contains(&"330003"));
    Ok(())
}
