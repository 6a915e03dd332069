//! CSV-backed table source: one file per table in a data directory.

use std::fs::File;
use std::path::Path;

use market_core::config::DataConfig;
use market_core::{MarketError, MarketResult, Table};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::source::{RawTables, TableSource};

/// Reads `owner.csv`, `house.csv`, `service_visit.csv`, `ad_ratings.csv` and
/// `advertisement.csv` (names configurable) from one directory.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    data: DataConfig,
}

impl CsvDirectory {
    pub fn new(data: DataConfig) -> Self {
        Self { data }
    }
}

impl TableSource for CsvDirectory {
    fn describe(&self) -> String {
        format!("csv:{}", self.data.dir.display())
    }

    fn read_tables(&self) -> MarketResult<RawTables> {
        Ok(RawTables {
            owners: read_table(&self.data.path_for(Table::Owners), Table::Owners)?,
            houses: read_table(&self.data.path_for(Table::Houses), Table::Houses)?,
            service_visits: read_table(
                &self.data.path_for(Table::ServiceVisits),
                Table::ServiceVisits,
            )?,
            ad_ratings: read_table(&self.data.path_for(Table::AdRatings), Table::AdRatings)?,
            advertisements: read_table(
                &self.data.path_for(Table::Advertisements),
                Table::Advertisements,
            )?,
        })
    }
}

/// Columns each table must carry, in row-struct order. An entry lists every
/// accepted spelling; the first is the one written.
fn required_columns(table: Table) -> &'static [&'static [&'static str]] {
    match table {
        Table::Owners => &[
            &["owner_id"],
            &["age_bracket"],
            &["has_kids"],
            &["family_status"],
        ],
        Table::Houses => &[
            &["house_id"],
            &["owner_id"],
            &["neighborhood_demographics"],
            &["house_age_bracket"],
            &["house_size_sqft"],
        ],
        Table::ServiceVisits => &[&["visit_id"], &["house_id"]],
        Table::AdRatings => &[&["ad_id"], &["visit_id"], &["rating"]],
        Table::Advertisements => &[
            &["ad_id"],
            &["category"],
            &["ad_offer_value_prop"],
            &["ad_offer_tone", "ad_headline_tone"],
        ],
    }
}

/// Deserialize every row of one CSV file. Any failure is reported as the
/// table being unavailable: an unreadable file, a header without the
/// table's columns, or a malformed row (with its row number).
pub fn read_table<T: DeserializeOwned>(path: &Path, table: Table) -> MarketResult<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        MarketError::data_unavailable(
            table,
            format!("could not be opened ({}): {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            MarketError::data_unavailable(
                table,
                format!("has an unreadable header ({}): {e}", path.display()),
            )
        })?
        .clone();
    check_header(&headers, table, path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<T>().enumerate() {
        let row = record.map_err(|e| {
            MarketError::data_unavailable(
                table,
                format!("is malformed at row {} ({}): {e}", index + 1, path.display()),
            )
        })?;
        rows.push(row);
    }

    debug!(table = %table, rows = rows.len(), path = %path.display(), "Table read");
    Ok(rows)
}

fn check_header(headers: &csv::StringRecord, table: Table, path: &Path) -> MarketResult<()> {
    if headers.iter().all(str::is_empty) {
        return Err(MarketError::data_unavailable(
            table,
            format!("has no header row ({})", path.display()),
        ));
    }

    let missing: Vec<&str> = required_columns(table)
        .iter()
        .filter(|spellings| !spellings.iter().any(|name| headers.iter().any(|h| h == *name)))
        .map(|spellings| spellings[0])
        .collect();
    if !missing.is_empty() {
        return Err(MarketError::data_unavailable(
            table,
            format!(
                "is missing column(s) {} ({})",
                missing.join(", "),
                path.display()
            ),
        ));
    }
    Ok(())
}

fn write_table<T: Serialize>(path: &Path, table: Table, rows: &[T]) -> MarketResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(std::io::Error::from)?;
    if rows.is_empty() {
        // Serializing rows emits the header; an empty table still needs one.
        let header = required_columns(table).iter().map(|spellings| spellings[0]);
        writer.write_record(header).map_err(std::io::Error::from)?;
    }
    for row in rows {
        writer.serialize(row).map_err(std::io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

impl RawTables {
    /// Write all five tables into `data.dir`, creating it if needed.
    pub fn write_csv(&self, data: &DataConfig) -> MarketResult<()> {
        std::fs::create_dir_all(&data.dir)?;
        write_table(&data.path_for(Table::Owners), Table::Owners, &self.owners)?;
        write_table(&data.path_for(Table::Houses), Table::Houses, &self.houses)?;
        write_table(
            &data.path_for(Table::ServiceVisits),
            Table::ServiceVisits,
            &self.service_visits,
        )?;
        write_table(
            &data.path_for(Table::AdRatings),
            Table::AdRatings,
            &self.ad_ratings,
        )?;
        write_table(
            &data.path_for(Table::Advertisements),
            Table::Advertisements,
            &self.advertisements,
        )?;

        info!(dir = %data.dir.display(), "Dataset written as CSV");
        Ok(())
    }
}
