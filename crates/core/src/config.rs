use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::Table;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `MARKET_SIZER__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the five input tables.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_owners_file")]
    pub owners_file: String,
    #[serde(default = "default_houses_file")]
    pub houses_file: String,
    #[serde(default = "default_service_visits_file")]
    pub service_visits_file: String,
    #[serde(default = "default_ad_ratings_file")]
    pub ad_ratings_file: String,
    #[serde(default = "default_advertisements_file")]
    pub advertisements_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_owner_rows")]
    pub owners: u32,
    #[serde(default = "default_house_rows")]
    pub houses: u32,
    #[serde(default = "default_visit_rows")]
    pub service_visits: u32,
    #[serde(default = "default_rating_rows")]
    pub ad_ratings: u32,
    #[serde(default = "default_ad_rows")]
    pub advertisements: u32,
    /// Inclusive lower bound of generated house sizes.
    #[serde(default = "default_min_sqft")]
    pub min_sqft: u32,
    /// Exclusive upper bound of generated house sizes.
    #[serde(default = "default_max_sqft")]
    pub max_sqft: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

// Default functions
fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_owners_file() -> String {
    "owner.csv".to_string()
}
fn default_houses_file() -> String {
    "house.csv".to_string()
}
fn default_service_visits_file() -> String {
    "service_visit.csv".to_string()
}
fn default_ad_ratings_file() -> String {
    "ad_ratings.csv".to_string()
}
fn default_advertisements_file() -> String {
    "advertisement.csv".to_string()
}
fn default_owner_rows() -> u32 {
    100
}
fn default_house_rows() -> u32 {
    100
}
fn default_visit_rows() -> u32 {
    100
}
fn default_rating_rows() -> u32 {
    200
}
fn default_ad_rows() -> u32 {
    20
}
fn default_min_sqft() -> u32 {
    500
}
fn default_max_sqft() -> u32 {
    5000
}
fn default_log_filter() -> String {
    "market_sizer=info,market_dataset=info,market_segmentation=info".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            owners_file: default_owners_file(),
            houses_file: default_houses_file(),
            service_visits_file: default_service_visits_file(),
            ad_ratings_file: default_ad_ratings_file(),
            advertisements_file: default_advertisements_file(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            owners: default_owner_rows(),
            houses: default_house_rows(),
            service_visits: default_visit_rows(),
            ad_ratings: default_rating_rows(),
            advertisements: default_ad_rows(),
            min_sqft: default_min_sqft(),
            max_sqft: default_max_sqft(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl DataConfig {
    pub fn file_name(&self, table: Table) -> &str {
        match table {
            Table::Owners => &self.owners_file,
            Table::Houses => &self.houses_file,
            Table::ServiceVisits => &self.service_visits_file,
            Table::AdRatings => &self.ad_ratings_file,
            Table::Advertisements => &self.advertisements_file,
        }
    }

    /// Full path of `table` under the data directory.
    pub fn path_for(&self, table: Table) -> PathBuf {
        self.dir.join(self.file_name(table))
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment
    /// variables. Environment variables win over the file.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("MARKET_SIZER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
