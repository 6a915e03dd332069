//! Query builder, a fluent API for assembling segment criteria.

use market_core::{
    AdCategory, AdTone, AgeBracket, FamilyStatus, HouseAgeBracket, Neighborhood, ValueProp,
};

use crate::predicates::{CategoryFilter, HasKidsFilter, SqftRange};
use crate::query::Query;

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    category: CategoryFilter,
    value_props: Vec<ValueProp>,
    tones: Vec<AdTone>,
    age_brackets: Vec<AgeBracket>,
    has_kids: HasKidsFilter,
    family_statuses: Vec<FamilyStatus>,
    neighborhoods: Vec<Neighborhood>,
    house_age_brackets: Vec<HouseAgeBracket>,
    sqft_range: SqftRange,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: AdCategory) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn any_category(mut self) -> Self {
        self.category = CategoryFilter::Any;
        self
    }

    pub fn value_prop(mut self, value_prop: ValueProp) -> Self {
        self.value_props.push(value_prop);
        self
    }

    pub fn tone(mut self, tone: AdTone) -> Self {
        self.tones.push(tone);
        self
    }

    pub fn age_bracket(mut self, bracket: AgeBracket) -> Self {
        self.age_brackets.push(bracket);
        self
    }

    pub fn has_kids(mut self, filter: HasKidsFilter) -> Self {
        self.has_kids = filter;
        self
    }

    pub fn family_status(mut self, status: FamilyStatus) -> Self {
        self.family_statuses.push(status);
        self
    }

    pub fn neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhoods.push(neighborhood);
        self
    }

    pub fn house_age_bracket(mut self, bracket: HouseAgeBracket) -> Self {
        self.house_age_brackets.push(bracket);
        self
    }

    /// Inclusive house-size bounds. Not validated here; the engine reports
    /// and ignores an empty range.
    pub fn sqft_between(mut self, min: u32, max: u32) -> Self {
        self.sqft_range = SqftRange::new(min, max);
        self
    }

    pub fn build(self) -> Query {
        Query {
            category: self.category,
            value_props: self.value_props.into_iter().collect(),
            tones: self.tones.into_iter().collect(),
            age_brackets: self.age_brackets.into_iter().collect(),
            has_kids: self.has_kids,
            family_statuses: self.family_statuses.into_iter().collect(),
            neighborhoods: self.neighborhoods.into_iter().collect(),
            house_age_brackets: self.house_age_brackets.into_iter().collect(),
            sqft_range: self.sqft_range,
        }
    }
}
