//! Row types for the five input tables. Field names match the column headers.

use market_core::{
    AdCategory, AdId, AdTone, AgeBracket, FamilyStatus, HouseAgeBracket, HouseId, Neighborhood,
    OwnerId, ValueProp, VisitId,
};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub owner_id: OwnerId,
    pub age_bracket: AgeBracket,
    #[serde(deserialize_with = "deserialize_flag")]
    pub has_kids: bool,
    pub family_status: FamilyStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub house_id: HouseId,
    /// May reference an owner that does not exist.
    pub owner_id: OwnerId,
    pub neighborhood_demographics: Neighborhood,
    pub house_age_bracket: HouseAgeBracket,
    pub house_size_sqft: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceVisit {
    pub visit_id: VisitId,
    pub house_id: HouseId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRating {
    pub ad_id: AdId,
    pub visit_id: VisitId,
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    pub ad_id: AdId,
    pub category: AdCategory,
    pub ad_offer_value_prop: ValueProp,
    #[serde(alias = "ad_headline_tone")]
    pub ad_offer_tone: AdTone,
}

/// Accepts the boolean spellings spreadsheet tools emit: `true`/`True`,
/// `1`, `yes`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean '{other}'"
        ))),
    }
}
