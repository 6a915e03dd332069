//! Universal properties of the segment filter over generated datasets.

use market_core::config::GeneratorConfig;
use market_core::{AdCategory, AgeBracket, FamilyStatus, HouseAgeBracket, Neighborhood};
use market_dataset::{Dataset, DummyDataGenerator};
use market_segmentation::{HasKidsFilter, Query, SegmentFilterEngine, Stage};
use proptest::prelude::*;

const FIELDS: usize = 7;

/// Criteria as indices into each enum's `ALL`, so a field can be relaxed
/// independently of the others.
#[derive(Debug, Clone)]
struct Criteria {
    category: Option<usize>,
    age_brackets: Vec<usize>,
    has_kids: usize,
    family_statuses: Vec<usize>,
    neighborhoods: Vec<usize>,
    house_age_brackets: Vec<usize>,
    sqft: Option<(u32, u32)>,
}

impl Criteria {
    fn build(&self) -> Query {
        let mut builder = Query::builder();
        if let Some(i) = self.category {
            builder = builder.category(AdCategory::ALL[i]);
        }
        for i in &self.age_brackets {
            builder = builder.age_bracket(AgeBracket::ALL[*i]);
        }
        builder = builder.has_kids(match self.has_kids {
            1 => HasKidsFilter::Yes,
            2 => HasKidsFilter::No,
            _ => HasKidsFilter::Any,
        });
        for i in &self.family_statuses {
            builder = builder.family_status(FamilyStatus::ALL[*i]);
        }
        for i in &self.neighborhoods {
            builder = builder.neighborhood(Neighborhood::ALL[*i]);
        }
        for i in &self.house_age_brackets {
            builder = builder.house_age_bracket(HouseAgeBracket::ALL[*i]);
        }
        if let Some((min, max)) = self.sqft {
            builder = builder.sqft_between(min, max);
        }
        builder.build()
    }

    /// The same criteria with field `field` unconstrained.
    fn relaxed(&self, field: usize) -> Criteria {
        let mut relaxed = self.clone();
        match field {
            0 => relaxed.category = None,
            1 => relaxed.age_brackets.clear(),
            2 => relaxed.has_kids = 0,
            3 => relaxed.family_statuses.clear(),
            4 => relaxed.neighborhoods.clear(),
            5 => relaxed.house_age_brackets.clear(),
            _ => relaxed.sqft = None,
        }
        relaxed
    }
}

fn criteria() -> impl Strategy<Value = Criteria> {
    (
        proptest::option::of(0..AdCategory::ALL.len()),
        proptest::collection::vec(0..AgeBracket::ALL.len(), 0..3),
        0..3usize,
        proptest::collection::vec(0..FamilyStatus::ALL.len(), 0..3),
        proptest::collection::vec(0..Neighborhood::ALL.len(), 0..3),
        proptest::collection::vec(0..HouseAgeBracket::ALL.len(), 0..3),
        proptest::option::of((0u32..6000, 0u32..6000)),
    )
        .prop_map(
            |(category, age_brackets, has_kids, family_statuses, neighborhoods, house_age_brackets, sqft)| {
                Criteria {
                    category,
                    age_brackets,
                    has_kids,
                    family_statuses,
                    neighborhoods,
                    house_age_brackets,
                    sqft: sqft.map(|(a, b)| (a.min(b), a.max(b))),
                }
            },
        )
}

fn dataset(seed: u64) -> Dataset {
    let tables = DummyDataGenerator::new(GeneratorConfig {
        owners: 40,
        houses: 40,
        service_visits: 40,
        ad_ratings: 80,
        advertisements: 8,
        seed: Some(seed),
        ..GeneratorConfig::default()
    })
    .generate()
    .unwrap();
    Dataset::from_tables(tables, format!("seed-{seed}")).unwrap()
}

proptest! {
    #[test]
    fn prop_count_never_exceeds_total(seed in 0u64..500, c in criteria()) {
        let dataset = dataset(seed);
        let result = SegmentFilterEngine::new().evaluate(&dataset, &c.build());
        prop_assert!(result.count <= dataset.total_owners());
        prop_assert_eq!(result.count, result.matched_owners.len());
    }

    #[test]
    fn prop_unconstrained_query_counts_every_owner(seed in 0u64..500) {
        let dataset = dataset(seed);
        let result = SegmentFilterEngine::new().evaluate(&dataset, &Query::any());
        prop_assert_eq!(result.count, dataset.total_owners());
        prop_assert_eq!(result.matched_owners, dataset.owner_ids());
    }

    #[test]
    fn prop_narrowing_never_increases_count(seed in 0u64..500, c in criteria(), field in 0..FIELDS) {
        let dataset = dataset(seed);
        let engine = SegmentFilterEngine::new();
        let strict = engine.evaluate(&dataset, &c.build());
        let relaxed = engine.evaluate(&dataset, &c.relaxed(field).build());
        prop_assert!(strict.count <= relaxed.count);
        prop_assert!(strict.matched_owners.is_subset(&relaxed.matched_owners));
    }

    #[test]
    fn prop_evaluation_is_idempotent(seed in 0u64..500, c in criteria()) {
        let dataset = dataset(seed);
        let query = c.build();
        let engine = SegmentFilterEngine::new();
        let first = engine.evaluate(&dataset, &query);
        let second = engine.evaluate(&dataset, &query);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_any_category_skips_affinity_stage(seed in 0u64..500, c in criteria()) {
        let dataset = dataset(seed);
        let query = Criteria { category: None, ..c }.build();
        let result = SegmentFilterEngine::new().evaluate(&dataset, &query);
        prop_assert!(result.funnel.iter().all(|s| s.stage != Stage::AdAffinity));
        prop_assert_eq!(result.funnel.last().map(|s| s.owners), Some(result.count));
    }
}
