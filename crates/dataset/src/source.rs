//! Sources of raw table rows.

use market_core::MarketResult;
use serde::{Deserialize, Serialize};

use crate::rows::{AdRating, Advertisement, House, Owner, ServiceVisit};

/// The five tables exactly as a source yielded them, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTables {
    pub owners: Vec<Owner>,
    pub houses: Vec<House>,
    pub service_visits: Vec<ServiceVisit>,
    pub ad_ratings: Vec<AdRating>,
    pub advertisements: Vec<Advertisement>,
}

/// Anything that can yield rows with the named table fields. The format
/// (delimiter, encoding, transport) is the source's concern.
pub trait TableSource {
    /// Human-readable origin, recorded on the loaded dataset.
    fn describe(&self) -> String;

    /// Read all five tables. A missing or unreadable table must fail with
    /// `MarketError::DataUnavailable` naming it.
    fn read_tables(&self) -> MarketResult<RawTables>;
}

impl TableSource for RawTables {
    fn describe(&self) -> String {
        format!(
            "in-memory ({} owners, {} houses, {} visits, {} ratings, {} ads)",
            self.owners.len(),
            self.houses.len(),
            self.service_visits.len(),
            self.ad_ratings.len(),
            self.advertisements.len()
        )
    }

    fn read_tables(&self) -> MarketResult<RawTables> {
        Ok(self.clone())
    }
}
