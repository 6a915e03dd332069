pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{MarketError, MarketResult};
pub use types::{
    AdCategory, AdId, AdTone, AgeBracket, FamilyStatus, HouseAgeBracket, HouseId, Neighborhood,
    OwnerId, Table, ValueProp, VisitId, POSITIVE_ENGAGEMENT_MIN_RATING,
};
