//! The immutable criteria a market-size estimate is computed for, and the
//! conversion from raw form input.

use std::fmt;
use std::str::FromStr;

use market_core::types::UnknownLabel;
use market_core::{
    AdCategory, AdTone, AgeBracket, FamilyStatus, HouseAgeBracket, MarketError, Neighborhood,
    ValueProp,
};
use serde::{Deserialize, Serialize};

use crate::builder::QueryBuilder;
use crate::predicates::{AnyOf, CategoryFilter, HasKidsFilter, SqftRange};

/// All user-selected criteria. Unconstrained fields pass every row.
///
/// `value_props` and `tones` are carried for interface compatibility but are
/// not consulted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub(crate) category: CategoryFilter,
    pub(crate) value_props: AnyOf<ValueProp>,
    pub(crate) tones: AnyOf<AdTone>,
    pub(crate) age_brackets: AnyOf<AgeBracket>,
    pub(crate) has_kids: HasKidsFilter,
    pub(crate) family_statuses: AnyOf<FamilyStatus>,
    pub(crate) neighborhoods: AnyOf<Neighborhood>,
    pub(crate) house_age_brackets: AnyOf<HouseAgeBracket>,
    pub(crate) sqft_range: SqftRange,
}

impl Query {
    /// A query with every criterion unconstrained.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn value_props(&self) -> &AnyOf<ValueProp> {
        &self.value_props
    }

    pub fn tones(&self) -> &AnyOf<AdTone> {
        &self.tones
    }

    pub fn age_brackets(&self) -> &AnyOf<AgeBracket> {
        &self.age_brackets
    }

    pub fn has_kids(&self) -> HasKidsFilter {
        self.has_kids
    }

    pub fn family_statuses(&self) -> &AnyOf<FamilyStatus> {
        &self.family_statuses
    }

    pub fn neighborhoods(&self) -> &AnyOf<Neighborhood> {
        &self.neighborhoods
    }

    pub fn house_age_brackets(&self) -> &AnyOf<HouseAgeBracket> {
        &self.house_age_brackets
    }

    pub fn sqft_range(&self) -> SqftRange {
        self.sqft_range
    }

    /// True when value-proposition or tone selections were made. Those are
    /// recorded but have no effect on the count.
    pub fn has_unapplied_criteria(&self) -> bool {
        !self.value_props.is_unconstrained() || !self.tones.is_unconstrained()
    }
}

/// A malformed criterion that was ignored so the rest of the query could
/// still be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryAnomaly {
    /// `min > max`; the size filter was dropped.
    MalformedSqftRange { min: u32, max: u32 },
    /// A label matched no known value; the whole field was dropped.
    UnrecognizedValue { field: String, value: String },
}

impl fmt::Display for QueryAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryAnomaly::MalformedSqftRange { min, max } => write!(
                f,
                "house size range {min}..={max} is empty (min > max); size filter ignored"
            ),
            QueryAnomaly::UnrecognizedValue { field, value } => {
                write!(f, "unrecognized {field} '{value}'; {field} filter ignored")
            }
        }
    }
}

impl From<&QueryAnomaly> for MarketError {
    fn from(anomaly: &QueryAnomaly) -> Self {
        MarketError::InvalidQuery(anomaly.to_string())
    }
}

impl From<UnknownLabel> for QueryAnomaly {
    fn from(err: UnknownLabel) -> Self {
        QueryAnomaly::UnrecognizedValue {
            field: err.kind.to_string(),
            value: err.value,
        }
    }
}

/// Criteria exactly as a form submits them: labels as strings, unset
/// fields empty or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCriteria {
    /// `None`, empty or `"Any"` means no category constraint.
    pub category: Option<String>,
    pub value_props: Vec<String>,
    pub tones: Vec<String>,
    pub age_brackets: Vec<String>,
    /// `Any`, `Yes` or `No`.
    pub has_kids: Option<String>,
    pub family_statuses: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub house_age_brackets: Vec<String>,
    pub min_sqft: Option<u32>,
    pub max_sqft: Option<u32>,
}

/// A query built from raw input, plus every criterion that had to be
/// ignored on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub query: Query,
    pub anomalies: Vec<QueryAnomaly>,
}

impl RawCriteria {
    /// Convert labels to typed criteria. An unrecognized label leaves its
    /// whole field unconstrained and is reported; parsing never fails.
    /// Range validity is checked by the engine.
    pub fn parse(&self) -> ParsedQuery {
        let mut anomalies = Vec::new();

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => CategoryFilter::Any,
            Some(label) if label.eq_ignore_ascii_case("any") => CategoryFilter::Any,
            Some(label) => match label.parse::<AdCategory>() {
                Ok(category) => CategoryFilter::Only(category),
                Err(e) => {
                    anomalies.push(e.into());
                    CategoryFilter::Any
                }
            },
        };

        let has_kids = match self.has_kids.as_deref() {
            None => HasKidsFilter::Any,
            Some(label) => label.parse().unwrap_or_else(|_| {
                anomalies.push(QueryAnomaly::UnrecognizedValue {
                    field: "has kids".to_string(),
                    value: label.to_string(),
                });
                HasKidsFilter::Any
            }),
        };

        let query = Query {
            category,
            value_props: parse_field(&self.value_props, &mut anomalies),
            tones: parse_field(&self.tones, &mut anomalies),
            age_brackets: parse_field(&self.age_brackets, &mut anomalies),
            has_kids,
            family_statuses: parse_field(&self.family_statuses, &mut anomalies),
            neighborhoods: parse_field(&self.neighborhoods, &mut anomalies),
            house_age_brackets: parse_field(&self.house_age_brackets, &mut anomalies),
            sqft_range: SqftRange::new(
                self.min_sqft.unwrap_or(0),
                self.max_sqft.unwrap_or(u32::MAX),
            ),
        };

        ParsedQuery { query, anomalies }
    }
}

fn parse_field<T>(labels: &[String], anomalies: &mut Vec<QueryAnomaly>) -> AnyOf<T>
where
    T: Ord + FromStr<Err = UnknownLabel>,
{
    let mut values = Vec::with_capacity(labels.len());
    let mut clean = true;
    for label in labels.iter().filter(|l| !l.trim().is_empty()) {
        match label.parse::<T>() {
            Ok(value) => values.push(value),
            Err(e) => {
                anomalies.push(e.into());
                clean = false;
            }
        }
    }

    if clean {
        values.into_iter().collect()
    } else {
        AnyOf::any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_criteria_is_unconstrained_query() {
        let parsed = RawCriteria::default().parse();
        assert_eq!(parsed.query, Query::any());
        assert!(parsed.anomalies.is_empty());
    }

    #[test]
    fn test_labels_become_typed_criteria() {
        let raw = RawCriteria {
            category: Some("Food".to_string()),
            age_brackets: labels(&["25-34", "35-44"]),
            has_kids: Some("No".to_string()),
            neighborhoods: labels(&["rural"]),
            min_sqft: Some(800),
            max_sqft: Some(2400),
            ..RawCriteria::default()
        };
        let parsed = raw.parse();
        assert!(parsed.anomalies.is_empty());

        let query = parsed.query;
        assert_eq!(query.category(), CategoryFilter::Only(AdCategory::Food));
        assert_eq!(query.age_brackets().len(), 2);
        assert_eq!(query.has_kids(), HasKidsFilter::No);
        assert!(query.neighborhoods().matches(&Neighborhood::Rural));
        assert!(!query.neighborhoods().matches(&Neighborhood::Urban));
        assert_eq!(query.sqft_range(), SqftRange::new(800, 2400));
    }

    #[test]
    fn test_any_category_label() {
        let raw = RawCriteria {
            category: Some("Any".to_string()),
            ..RawCriteria::default()
        };
        assert_eq!(raw.parse().query.category(), CategoryFilter::Any);
    }

    #[test]
    fn test_unrecognized_label_drops_whole_field() {
        let raw = RawCriteria {
            age_brackets: labels(&["25-34", "teenager"]),
            family_statuses: labels(&["Married"]),
            ..RawCriteria::default()
        };
        let parsed = raw.parse();
        assert!(parsed.query.age_brackets().is_unconstrained());
        assert!(!parsed.query.family_statuses().is_unconstrained());
        assert_eq!(
            parsed.anomalies,
            vec![QueryAnomaly::UnrecognizedValue {
                field: "age bracket".to_string(),
                value: "teenager".to_string(),
            }]
        );
    }

    #[test]
    fn test_unrecognized_category_and_has_kids_fall_back_to_any() {
        let raw = RawCriteria {
            category: Some("Furniture".to_string()),
            has_kids: Some("several".to_string()),
            ..RawCriteria::default()
        };
        let parsed = raw.parse();
        assert_eq!(parsed.query.category(), CategoryFilter::Any);
        assert_eq!(parsed.query.has_kids(), HasKidsFilter::Any);
        assert_eq!(parsed.anomalies.len(), 2);
    }

    #[test]
    fn test_value_props_and_tones_are_flagged_unapplied() {
        let raw = RawCriteria {
            value_props: labels(&["convenience"]),
            tones: labels(&["casual"]),
            ..RawCriteria::default()
        };
        let query = raw.parse().query;
        assert!(query.has_unapplied_criteria());
        assert!(!Query::any().has_unapplied_criteria());
    }

    #[test]
    fn test_anomaly_maps_to_invalid_query() {
        let anomaly = QueryAnomaly::MalformedSqftRange { min: 10, max: 5 };
        let err = MarketError::from(&anomaly);
        assert!(matches!(err, MarketError::InvalidQuery(_)));
        assert!(err.to_string().contains("10..=5"));
    }
}
