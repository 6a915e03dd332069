//! The validated, read-only dataset and its lookup/join primitives.
//!
//! Foreign keys are not enforced. Joins drop rows whose reference does not
//! resolve instead of failing, so every primitive may return an empty set.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use chrono::{DateTime, Utc};
use market_core::types::{MAX_RATING, MIN_RATING};
use market_core::{AdId, HouseId, MarketError, MarketResult, OwnerId, Table, VisitId};
use serde::Serialize;
use tracing::{info, warn};

use crate::rows::{AdRating, Advertisement, House, Owner, ServiceVisit};
use crate::source::{RawTables, TableSource};

#[derive(Debug, Clone)]
pub struct Dataset {
    owners: BTreeMap<OwnerId, Owner>,
    houses: BTreeMap<HouseId, House>,
    service_visits: BTreeMap<VisitId, ServiceVisit>,
    ad_ratings: Vec<AdRating>,
    advertisements: BTreeMap<AdId, Advertisement>,
    source: String,
    loaded_at: DateTime<Utc>,
}

/// Counts of rows whose foreign key points at nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DanglingReferences {
    pub houses_without_owner: usize,
    pub visits_without_house: usize,
    pub ratings_without_visit: usize,
    pub ratings_without_ad: usize,
}

impl DanglingReferences {
    pub fn total(&self) -> usize {
        self.houses_without_owner
            + self.visits_without_house
            + self.ratings_without_visit
            + self.ratings_without_ad
    }
}

impl Dataset {
    /// Read every table from `source` and validate it.
    pub fn load(source: &dyn TableSource) -> MarketResult<Self> {
        let description = source.describe();
        let tables = source.read_tables()?;
        let dataset = Self::from_tables(tables, description)?;

        let dangling = dataset.dangling_references();
        info!(
            source = %dataset.source,
            owners = dataset.owners.len(),
            houses = dataset.houses.len(),
            visits = dataset.service_visits.len(),
            ratings = dataset.ad_ratings.len(),
            ads = dataset.advertisements.len(),
            dangling = dangling.total(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Re-read from `source`. On failure the current data is kept and the
    /// error is returned.
    pub fn reload(&mut self, source: &dyn TableSource) -> MarketResult<()> {
        match Self::load(source) {
            Ok(fresh) => {
                *self = fresh;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, source = %self.source, "Reload failed, keeping previous dataset");
                Err(e)
            }
        }
    }

    /// Validate raw rows: primary keys must be unique and ratings must lie on
    /// the 1–5 scale.
    pub fn from_tables(tables: RawTables, source: impl Into<String>) -> MarketResult<Self> {
        let owners = index_unique(Table::Owners, tables.owners, |o| o.owner_id)?;
        let houses = index_unique(Table::Houses, tables.houses, |h| h.house_id)?;
        let service_visits =
            index_unique(Table::ServiceVisits, tables.service_visits, |v| v.visit_id)?;
        let advertisements =
            index_unique(Table::Advertisements, tables.advertisements, |a| a.ad_id)?;

        if let Some(bad) = tables
            .ad_ratings
            .iter()
            .find(|r| !(MIN_RATING..=MAX_RATING).contains(&r.rating))
        {
            return Err(MarketError::data_unavailable(
                Table::AdRatings,
                format!(
                    "has rating {} for ad {} outside {MIN_RATING}..={MAX_RATING}",
                    bad.rating, bad.ad_id
                ),
            ));
        }

        Ok(Self {
            owners,
            houses,
            service_visits,
            ad_ratings: tables.ad_ratings,
            advertisements,
            source: source.into(),
            loaded_at: Utc::now(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn owners(&self) -> impl Iterator<Item = &Owner> {
        self.owners.values()
    }

    pub fn houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values()
    }

    pub fn service_visits(&self) -> impl Iterator<Item = &ServiceVisit> {
        self.service_visits.values()
    }

    pub fn ad_ratings(&self) -> impl Iterator<Item = &AdRating> {
        self.ad_ratings.iter()
    }

    pub fn advertisements(&self) -> impl Iterator<Item = &Advertisement> {
        self.advertisements.values()
    }

    pub fn owner_ids(&self) -> BTreeSet<OwnerId> {
        self.owners.keys().copied().collect()
    }

    pub fn total_owners(&self) -> usize {
        self.owners.len()
    }

    pub fn owners_where<F>(&self, predicate: F) -> BTreeSet<OwnerId>
    where
        F: Fn(&Owner) -> bool,
    {
        self.owners
            .values()
            .filter(|o| predicate(o))
            .map(|o| o.owner_id)
            .collect()
    }

    pub fn houses_where<F>(&self, predicate: F) -> BTreeSet<HouseId>
    where
        F: Fn(&House) -> bool,
    {
        self.houses
            .values()
            .filter(|h| predicate(h))
            .map(|h| h.house_id)
            .collect()
    }

    pub fn ads_where<F>(&self, predicate: F) -> BTreeSet<AdId>
    where
        F: Fn(&Advertisement) -> bool,
    {
        self.advertisements
            .values()
            .filter(|a| predicate(a))
            .map(|a| a.ad_id)
            .collect()
    }

    /// Owner a house row points at. The owner itself may not exist.
    pub fn house_owner(&self, house_id: HouseId) -> Option<OwnerId> {
        self.houses.get(&house_id).map(|h| h.owner_id)
    }

    pub fn visit_house(&self, visit_id: VisitId) -> Option<HouseId> {
        self.service_visits.get(&visit_id).map(|v| v.house_id)
    }

    /// Distinct owners referenced by `house_ids`; unknown houses are skipped.
    pub fn owners_of_houses(&self, house_ids: &BTreeSet<HouseId>) -> BTreeSet<OwnerId> {
        house_ids
            .iter()
            .filter_map(|id| self.house_owner(*id))
            .collect()
    }

    pub fn visits_for_houses(&self, house_ids: &BTreeSet<HouseId>) -> BTreeSet<VisitId> {
        self.service_visits
            .values()
            .filter(|v| house_ids.contains(&v.house_id))
            .map(|v| v.visit_id)
            .collect()
    }

    /// Visits carrying at least one rating `>= min_rating` for any of `ad_ids`.
    pub fn ratings_for_ads(&self, ad_ids: &BTreeSet<AdId>, min_rating: u8) -> BTreeSet<VisitId> {
        self.ad_ratings
            .iter()
            .filter(|r| r.rating >= min_rating && ad_ids.contains(&r.ad_id))
            .map(|r| r.visit_id)
            .collect()
    }

    /// Houses the given visits took place at; unknown visits are skipped.
    pub fn houses_of_visits(&self, visit_ids: &BTreeSet<VisitId>) -> BTreeSet<HouseId> {
        visit_ids
            .iter()
            .filter_map(|id| self.visit_house(*id))
            .collect()
    }

    pub fn dangling_references(&self) -> DanglingReferences {
        DanglingReferences {
            houses_without_owner: self
                .houses
                .values()
                .filter(|h| !self.owners.contains_key(&h.owner_id))
                .count(),
            visits_without_house: self
                .service_visits
                .values()
                .filter(|v| !self.houses.contains_key(&v.house_id))
                .count(),
            ratings_without_visit: self
                .ad_ratings
                .iter()
                .filter(|r| !self.service_visits.contains_key(&r.visit_id))
                .count(),
            ratings_without_ad: self
                .ad_ratings
                .iter()
                .filter(|r| !self.advertisements.contains_key(&r.ad_id))
                .count(),
        }
    }
}

fn index_unique<K, V, F>(table: Table, rows: Vec<V>, key: F) -> MarketResult<BTreeMap<K, V>>
where
    K: Ord + Copy + Display,
    F: Fn(&V) -> K,
{
    let mut index = BTreeMap::new();
    for row in rows {
        let id = key(&row);
        if index.insert(id, row).is_some() {
            return Err(MarketError::data_unavailable(
                table,
                format!("has duplicate key {id}"),
            ));
        }
    }
    Ok(index)
}
