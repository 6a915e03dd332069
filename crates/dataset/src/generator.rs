//! Dummy-data generator producing the sample homeowner network.
//!
//! Foreign keys are drawn independently and uniformly, so houses, visits and
//! ratings may reference rows that do not exist. Loaders must tolerate that.

use market_core::config::GeneratorConfig;
use market_core::{
    AdCategory, AdId, AdTone, AgeBracket, FamilyStatus, HouseAgeBracket, HouseId, MarketError,
    MarketResult, Neighborhood, OwnerId, ValueProp, VisitId,
};
use market_core::types::{MAX_RATING, MIN_RATING};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::rows::{AdRating, Advertisement, House, Owner, ServiceVisit};
use crate::source::RawTables;

pub struct DummyDataGenerator {
    config: GeneratorConfig,
}

impl DummyDataGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> MarketResult<RawTables> {
        let cfg = &self.config;
        if cfg.min_sqft >= cfg.max_sqft {
            return Err(MarketError::Config(format!(
                "generator.min_sqft ({}) must be below generator.max_sqft ({})",
                cfg.min_sqft, cfg.max_sqft
            )));
        }

        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let owners = (1..=cfg.owners)
            .map(|id| Owner {
                owner_id: OwnerId(id),
                age_bracket: pick(&mut rng, AgeBracket::ALL),
                has_kids: rng.gen_bool(0.5),
                family_status: pick(&mut rng, FamilyStatus::ALL),
            })
            .collect();

        let houses = (1..=cfg.houses)
            .map(|id| House {
                house_id: HouseId(id),
                owner_id: OwnerId(foreign_key(&mut rng, cfg.owners)),
                neighborhood_demographics: pick(&mut rng, Neighborhood::ALL),
                house_age_bracket: pick(&mut rng, HouseAgeBracket::ALL),
                house_size_sqft: rng.gen_range(cfg.min_sqft..cfg.max_sqft),
            })
            .collect();

        let ad_ratings = (0..cfg.ad_ratings)
            .map(|_| AdRating {
                ad_id: AdId(foreign_key(&mut rng, cfg.advertisements)),
                visit_id: VisitId(foreign_key(&mut rng, cfg.service_visits)),
                rating: rng.gen_range(MIN_RATING..=MAX_RATING),
            })
            .collect();

        let service_visits = (1..=cfg.service_visits)
            .map(|id| ServiceVisit {
                visit_id: VisitId(id),
                house_id: HouseId(foreign_key(&mut rng, cfg.houses)),
            })
            .collect();

        let advertisements = (1..=cfg.advertisements)
            .map(|id| Advertisement {
                ad_id: AdId(id),
                category: pick(&mut rng, AdCategory::ALL),
                ad_offer_value_prop: pick(&mut rng, ValueProp::ALL),
                ad_offer_tone: pick(&mut rng, AdTone::ALL),
            })
            .collect();

        let tables = RawTables {
            owners,
            houses,
            service_visits,
            ad_ratings,
            advertisements,
        };

        info!(
            owners = cfg.owners,
            houses = cfg.houses,
            visits = cfg.service_visits,
            ratings = cfg.ad_ratings,
            ads = cfg.advertisements,
            seed = ?cfg.seed,
            "Dummy dataset generated"
        );
        Ok(tables)
    }
}

fn pick<T: Copy>(rng: &mut StdRng, all: &[T]) -> T {
    all[rng.gen_range(0..all.len())]
}

/// Uniform id in `1..=upper`, independent of which rows actually exist.
fn foreign_key(rng: &mut StdRng, upper: u32) -> u32 {
    rng.gen_range(1..=upper.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn seeded(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_generates_sample_shape() {
        let tables = DummyDataGenerator::new(seeded(1)).generate().unwrap();
        assert_eq!(tables.owners.len(), 100);
        assert_eq!(tables.houses.len(), 100);
        assert_eq!(tables.service_visits.len(), 100);
        assert_eq!(tables.ad_ratings.len(), 200);
        assert_eq!(tables.advertisements.len(), 20);

        assert!(tables
            .houses
            .iter()
            .all(|h| (500..5000).contains(&h.house_size_sqft)));
        assert!(tables
            .houses
            .iter()
            .all(|h| (1..=100).contains(&h.owner_id.0)));
        assert!(tables.ad_ratings.iter().all(|r| (1..=20).contains(&r.ad_id.0)));
        assert!(tables.ad_ratings.iter().all(|r| (1..=5).contains(&r.rating)));
    }

    #[test]
    fn test_same_seed_same_tables() {
        let a = DummyDataGenerator::new(seeded(42)).generate().unwrap();
        let b = DummyDataGenerator::new(seeded(42)).generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_tables_always_load() {
        for seed in 0..10 {
            let tables = DummyDataGenerator::new(seeded(seed)).generate().unwrap();
            let dataset = Dataset::from_tables(tables, "generated").unwrap();
            assert_eq!(dataset.total_owners(), 100);
        }
    }

    #[test]
    fn test_empty_sqft_range_is_config_error() {
        let config = GeneratorConfig {
            min_sqft: 900,
            max_sqft: 900,
            ..seeded(3)
        };
        let err = DummyDataGenerator::new(config).generate().unwrap_err();
        assert!(matches!(err, MarketError::Config(_)));
    }

    #[test]
    fn test_zero_rows_still_generates() {
        let config = GeneratorConfig {
            owners: 0,
            advertisements: 0,
            ..seeded(5)
        };
        let tables = DummyDataGenerator::new(config).generate().unwrap();
        assert!(tables.owners.is_empty());
        assert!(tables.advertisements.is_empty());
        assert_eq!(tables.houses.len(), 100);
    }
}
