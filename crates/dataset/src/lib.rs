//! In-memory homeowner dataset: the five input tables, their sources, and
//! the read-only lookup and join primitives the segment engine is built on.

pub mod csv_source;
pub mod dataset;
pub mod generator;
pub mod options;
pub mod rows;
pub mod source;

pub use csv_source::CsvDirectory;
pub use dataset::Dataset;
pub use generator::DummyDataGenerator;
pub use options::FilterOptions;
pub use rows::{AdRating, Advertisement, House, Owner, ServiceVisit};
pub use source::{RawTables, TableSource};
