//! Criterion value types and their match logic.
//!
//! Every criterion passes everything when unconstrained, so an all-default
//! query selects the whole dataset.

use std::collections::BTreeSet;
use std::str::FromStr;

use market_core::AdCategory;
use serde::{Deserialize, Serialize};

/// Set-valued criterion: a value matches when it is any member of the set.
/// The empty set places no constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnyOf<T: Ord>(BTreeSet<T>);

impl<T: Ord> AnyOf<T> {
    pub fn any() -> Self {
        Self(BTreeSet::new())
    }

    pub fn matches(&self, value: &T) -> bool {
        self.0.is_empty() || self.0.contains(value)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Ord> Default for AnyOf<T> {
    fn default() -> Self {
        Self::any()
    }
}

impl<T: Ord> FromIterator<T> for AnyOf<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Tri-state filter on whether an owner has kids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasKidsFilter {
    #[default]
    Any,
    Yes,
    No,
}

impl HasKidsFilter {
    pub fn matches(&self, has_kids: bool) -> bool {
        match self {
            HasKidsFilter::Any => true,
            HasKidsFilter::Yes => has_kids,
            HasKidsFilter::No => !has_kids,
        }
    }
}

impl FromStr for HasKidsFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" => Ok(HasKidsFilter::Any),
            "yes" | "y" | "true" => Ok(HasKidsFilter::Yes),
            "no" | "n" | "false" => Ok(HasKidsFilter::No),
            other => Err(other.to_string()),
        }
    }
}

/// Business category whose positively rated ads define ad affinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    Any,
    Only(AdCategory),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<AdCategory> {
        match self {
            CategoryFilter::Any => None,
            CategoryFilter::Only(category) => Some(*category),
        }
    }
}

impl From<Option<AdCategory>> for CategoryFilter {
    fn from(category: Option<AdCategory>) -> Self {
        category.map_or(CategoryFilter::Any, CategoryFilter::Only)
    }
}

/// Closed house-size interval, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqftRange {
    pub min: u32,
    pub max: u32,
}

impl SqftRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self {
            min: 0,
            max: u32::MAX,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::unbounded()
    }

    pub fn contains(&self, sqft: u32) -> bool {
        (self.min..=self.max).contains(&sqft)
    }
}

impl Default for SqftRange {
    fn default() -> Self {
        Self::unbounded()
    }
}
