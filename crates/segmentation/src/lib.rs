//! Market segmentation: criteria model, the segment filter engine that
//! sizes a target-customer segment, and the report built from its result.

pub mod builder;
pub mod engine;
pub mod predicates;
pub mod query;
pub mod report;

pub use builder::QueryBuilder;
pub use engine::{MarketSizeResult, SegmentFilterEngine, SegmentStatus, Stage, StageCount};
pub use predicates::{AnyOf, CategoryFilter, HasKidsFilter, SqftRange};
pub use query::{ParsedQuery, Query, QueryAnomaly, RawCriteria};
pub use report::{estimate, load_and_estimate, MarketSizeReport, MarketSizeStatus};
