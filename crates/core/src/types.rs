use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ratings at or above this value count as positive engagement with an ad.
pub const POSITIVE_ENGAGEMENT_MIN_RATING: u8 = 4;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A categorical label that does not name any known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Primary key of the owners table.
    OwnerId
);
id_type!(HouseId);
id_type!(VisitId);
id_type!(AdId);

/// Closed enum whose variants serialize as their human-facing label.
/// Parsing trims and ignores ASCII case.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

labeled_enum!(
    /// The five input tables.
    Table, "table" {
        Owners => "owners",
        Houses => "houses",
        ServiceVisits => "service_visits",
        AdRatings => "ad_ratings",
        Advertisements => "advertisements",
    }
);

labeled_enum!(
    AgeBracket, "age bracket" {
        From18To24 => "18-24",
        From25To34 => "25-34",
        From35To44 => "35-44",
        From45To54 => "45-54",
        Over55 => "55+",
    }
);

labeled_enum!(
    FamilyStatus, "family status" {
        Single => "Single",
        Married => "Married",
        Divorced => "Divorced",
        Widowed => "Widowed",
    }
);

labeled_enum!(
    Neighborhood, "neighborhood" {
        Urban => "Urban",
        Suburban => "Suburban",
        Rural => "Rural",
    }
);

labeled_enum!(
    HouseAgeBracket, "house age bracket" {
        UpTo10Years => "0-10 years",
        From11To20Years => "11-20 years",
        Over21Years => "21+ years",
    }
);

labeled_enum!(
    /// Business category of an advertisement.
    AdCategory, "ad category" {
        Food => "Food",
        Electronics => "Electronics",
    }
);

labeled_enum!(
    ValueProp, "value proposition" {
        CostSavings => "cost_savings",
        Convenience => "convenience",
        PremiumQuality => "premium_quality",
    }
);

labeled_enum!(
    AdTone, "ad tone" {
        Casual => "casual",
        Formal => "formal",
        Humorous => "humorous",
    }
);
