//! Loading the five tables from CSV files on disk.

use std::fs;
use std::path::Path;

use market_core::config::{DataConfig, GeneratorConfig};
use market_core::{AdTone, MarketError, Table};
use market_dataset::{CsvDirectory, Dataset, DummyDataGenerator, RawTables};

fn data_config(dir: &Path) -> DataConfig {
    DataConfig {
        dir: dir.to_path_buf(),
        ..DataConfig::default()
    }
}

/// Tables as a dataframe export writes them: `True`/`False` booleans, no index column.
fn write_exported_tables(dir: &Path) {
    fs::write(
        dir.join("owner.csv"),
        "owner_id,age_bracket,has_kids,family_status\n\
         1,25-34,False,Single\n\
         2,35-44,True,Married\n",
    )
    .unwrap();
    fs::write(
        dir.join("house.csv"),
        "house_id,owner_id,neighborhood_demographics,house_age_bracket,house_size_sqft\n\
         1,1,Urban,0-10 years,1000\n\
         2,2,Rural,21+ years,3200\n",
    )
    .unwrap();
    fs::write(
        dir.join("service_visit.csv"),
        "visit_id,house_id\n1,1\n2,2\n",
    )
    .unwrap();
    fs::write(
        dir.join("ad_ratings.csv"),
        "ad_id,visit_id,rating\n1,1,5\n1,2,2\n",
    )
    .unwrap();
    fs::write(
        dir.join("advertisement.csv"),
        "ad_id,category,ad_offer_value_prop,ad_headline_tone\n1,Food,cost_savings,casual\n",
    )
    .unwrap();
}

#[test]
fn test_loads_exported_csv() {
    let dir = tempfile::tempdir().unwrap();
    write_exported_tables(dir.path());

    let dataset = Dataset::load(&CsvDirectory::new(data_config(dir.path()))).unwrap();
    assert_eq!(dataset.total_owners(), 2);
    assert_eq!(dataset.owners_where(|o| o.has_kids).len(), 1);
    assert!(dataset.source().starts_with("csv:"));

    let ad = dataset.advertisements().next().unwrap();
    assert_eq!(ad.ad_offer_tone, AdTone::Casual);
}

#[test]
fn test_missing_owner_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_exported_tables(dir.path());
    fs::remove_file(dir.path().join("owner.csv")).unwrap();

    let err = Dataset::load(&CsvDirectory::new(data_config(dir.path()))).unwrap_err();
    match err {
        MarketError::DataUnavailable { table, reason } => {
            assert_eq!(table, Table::Owners);
            assert!(reason.contains("owner.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn load_error(dir: &Path) -> MarketError {
    Dataset::load(&CsvDirectory::new(data_config(dir))).unwrap_err()
}

#[test]
fn test_empty_owner_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_exported_tables(dir.path());
    fs::write(dir.path().join("owner.csv"), "").unwrap();

    match load_error(dir.path()) {
        MarketError::DataUnavailable { table, reason } => {
            assert_eq!(table, Table::Owners);
            assert!(reason.contains("no header"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_header_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_exported_tables(dir.path());
    fs::write(dir.path().join("owner.csv"), "visit_id,house_id\n").unwrap();

    match load_error(dir.path()) {
        MarketError::DataUnavailable { table, reason } => {
            assert_eq!(table, Table::Owners);
            assert!(reason.contains("owner_id"));
            assert!(reason.contains("family_status"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_tone_column_names_advertisements() {
    let dir = tempfile::tempdir().unwrap();
    write_exported_tables(dir.path());
    fs::write(
        dir.path().join("advertisement.csv"),
        "ad_id,category,ad_offer_value_prop\n1,Food,cost_savings\n",
    )
    .unwrap();

    assert!(matches!(
        load_error(dir.path()),
        MarketError::DataUnavailable {
            table: Table::Advertisements,
            ..
        }
    ));
}

#[test]
fn test_empty_tables_keep_their_header() {
    let dir = tempfile::tempdir().unwrap();
    let data = data_config(dir.path());
    RawTables::default().write_csv(&data).unwrap();

    let header = fs::read_to_string(dir.path().join("advertisement.csv")).unwrap();
    assert_eq!(
        header.trim(),
        "ad_id,category,ad_offer_value_prop,ad_offer_tone"
    );

    let dataset = Dataset::load(&CsvDirectory::new(data)).unwrap();
    assert_eq!(dataset.total_owners(), 0);
}

#[test]
fn test_malformed_row_names_table() {
    let dir = tempfile::tempdir().unwrap();
    write_exported_tables(dir.path());
    fs::write(
        dir.path().join("house.csv"),
        "house_id,owner_id,neighborhood_demographics,house_age_bracket,house_size_sqft\n\
         1,1,Downtown,0-10 years,1000\n",
    )
    .unwrap();

    assert!(matches!(
        load_error(dir.path()),
        MarketError::DataUnavailable {
            table: Table::Houses,
            ..
        }
    ));
}

#[test]
fn test_generated_dataset_written_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let data = data_config(&dir.path().join("nested"));
    let generated = DummyDataGenerator::new(GeneratorConfig {
        seed: Some(11),
        ..GeneratorConfig::default()
    })
    .generate()
    .unwrap();
    generated.write_csv(&data).unwrap();

    let source = CsvDirectory::new(data);
    let mut dataset = Dataset::load(&source).unwrap();
    assert_eq!(dataset.total_owners(), 100);
    assert_eq!(dataset.ad_ratings().count(), 200);

    let first_load = dataset.loaded_at();
    dataset.reload(&source).unwrap();
    assert!(dataset.loaded_at() >= first_load);
    assert_eq!(dataset.total_owners(), 100);
}
