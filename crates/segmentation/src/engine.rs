//! Segment filter engine. Turns a query into a distinct-owner count.
//!
//! Each stage narrows a running owner set by intersection. All stages are
//! conjunctive, so their order does not affect the result; they run in the
//! order demographic, property + ownership, ad affinity. The demographic
//! stage always runs and always records a funnel entry. The ownership and
//! ad-affinity stages are skipped when their criteria are all unconstrained,
//! and then leave no funnel entry.

use std::collections::BTreeSet;

use market_core::{OwnerId, POSITIVE_ENGAGEMENT_MIN_RATING};
use market_dataset::Dataset;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::predicates::SqftRange;
use crate::query::{Query, QueryAnomaly};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Demographic,
    Ownership,
    AdAffinity,
}

/// Owners still in the running set after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: Stage,
    pub owners: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    Ok,
    /// A legitimate zero count, not a failure.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketSizeResult {
    /// Distinct owners in the segment.
    pub count: usize,
    pub matched_owners: BTreeSet<OwnerId>,
    pub status: SegmentStatus,
    /// Criteria that were malformed and ignored.
    pub anomalies: Vec<QueryAnomaly>,
    pub funnel: Vec<StageCount>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentFilterEngine;

impl SegmentFilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `query` against `dataset`. Never fails: empty intermediate
    /// sets yield `NoMatch`, malformed criteria are ignored and reported.
    pub fn evaluate(&self, dataset: &Dataset, query: &Query) -> MarketSizeResult {
        let mut anomalies = Vec::new();
        let mut funnel = Vec::new();

        let sqft_range = effective_sqft_range(query.sqft_range(), &mut anomalies);

        // Stage 1: demographics.
        let mut running = dataset.owners_where(|o| {
            query.age_brackets().matches(&o.age_bracket)
                && query.has_kids().matches(o.has_kids)
                && query.family_statuses().matches(&o.family_status)
        });
        debug!(owners = running.len(), "Demographic filter applied");
        funnel.push(StageCount {
            stage: Stage::Demographic,
            owners: running.len(),
        });

        // Stages 2 and 3: owners of at least one qualifying house. With no
        // property criteria the stage passes every owner, housed or not.
        if has_property_criteria(query, sqft_range) {
            let houses = dataset.houses_where(|h| {
                sqft_range.contains(h.house_size_sqft)
                    && query.neighborhoods().matches(&h.neighborhood_demographics)
                    && query.house_age_brackets().matches(&h.house_age_bracket)
            });
            debug!(houses = houses.len(), "Property filter applied");

            let owning = dataset.owners_of_houses(&houses);
            running = intersect(&running, &owning);
            debug!(owners = running.len(), "Ownership join applied");
            funnel.push(StageCount {
                stage: Stage::Ownership,
                owners: running.len(),
            });
        }

        // Stage 4: positive engagement with the chosen category.
        if let Some(category) = query.category().category() {
            let ads = dataset.ads_where(|a| a.category == category);
            let visits = dataset.ratings_for_ads(&ads, POSITIVE_ENGAGEMENT_MIN_RATING);
            let engaged = dataset.owners_of_houses(&dataset.houses_of_visits(&visits));
            running = intersect(&running, &engaged);
            debug!(
                category = %category,
                ads = ads.len(),
                positive_visits = visits.len(),
                engaged_owners = engaged.len(),
                owners = running.len(),
                "Ad-affinity filter applied"
            );
            funnel.push(StageCount {
                stage: Stage::AdAffinity,
                owners: running.len(),
            });
        }

        // Stage 5: count.
        let count = running.len();
        let status = if count == 0 {
            SegmentStatus::NoMatch
        } else {
            SegmentStatus::Ok
        };

        MarketSizeResult {
            count,
            matched_owners: running,
            status,
            anomalies,
            funnel,
        }
    }
}

fn effective_sqft_range(range: SqftRange, anomalies: &mut Vec<QueryAnomaly>) -> SqftRange {
    if range.is_well_formed() {
        return range;
    }
    let anomaly = QueryAnomaly::MalformedSqftRange {
        min: range.min,
        max: range.max,
    };
    warn!(%anomaly, "Ignoring malformed house size range");
    anomalies.push(anomaly);
    SqftRange::unbounded()
}

fn has_property_criteria(query: &Query, sqft_range: SqftRange) -> bool {
    !sqft_range.is_unbounded()
        || !query.neighborhoods().is_unconstrained()
        || !query.house_age_brackets().is_unconstrained()
}

fn intersect(a: &BTreeSet<OwnerId>, b: &BTreeSet<OwnerId>) -> BTreeSet<OwnerId> {
    a.intersection(b).copied().collect()
}
