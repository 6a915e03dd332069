//! The values a criteria form can offer, discovered from the loaded data.

use std::collections::BTreeSet;

use market_core::{
    AdCategory, AdTone, AgeBracket, FamilyStatus, HouseAgeBracket, Neighborhood, ValueProp,
};
use serde::Serialize;

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<AdCategory>,
    pub value_props: Vec<ValueProp>,
    pub tones: Vec<AdTone>,
    pub age_brackets: Vec<AgeBracket>,
    pub family_statuses: Vec<FamilyStatus>,
    pub neighborhoods: Vec<Neighborhood>,
    pub house_age_brackets: Vec<HouseAgeBracket>,
    /// Smallest and largest house size present; `None` with no houses.
    pub sqft_bounds: Option<(u32, u32)>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let sqft_min = dataset.houses().map(|h| h.house_size_sqft).min();
        let sqft_max = dataset.houses().map(|h| h.house_size_sqft).max();

        Self {
            categories: distinct(dataset.advertisements().map(|a| a.category)),
            value_props: distinct(dataset.advertisements().map(|a| a.ad_offer_value_prop)),
            tones: distinct(dataset.advertisements().map(|a| a.ad_offer_tone)),
            age_brackets: distinct(dataset.owners().map(|o| o.age_bracket)),
            family_statuses: distinct(dataset.owners().map(|o| o.family_status)),
            neighborhoods: distinct(dataset.houses().map(|h| h.neighborhood_demographics)),
            house_age_brackets: distinct(dataset.houses().map(|h| h.house_age_bracket)),
            sqft_bounds: sqft_min.zip(sqft_max),
        }
    }
}

impl Dataset {
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_dataset(self)
    }
}

fn distinct<T: Ord>(values: impl Iterator<Item = T>) -> Vec<T> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}
