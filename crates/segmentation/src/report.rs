//! Market-size report, the one outward-facing shape of an estimate.
//!
//! `count` is `None` when data is unavailable so it can never be read as
//! "no customers matched".

use market_core::MarketError;
use market_dataset::{Dataset, TableSource};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::engine::{MarketSizeResult, SegmentFilterEngine, SegmentStatus, StageCount};
use crate::query::{Query, QueryAnomaly, RawCriteria};

pub const DISCLAIMER: &str =
    "Disclaimer: This is an estimation based on historical data and selected criteria.";
pub const NO_MATCH_MESSAGE: &str =
    "No customers matched your criteria. Try broadening your selection.";
const UNAPPLIED_WARNING: &str =
    "Value proposition and tone selections are recorded but not yet used to size the market.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSizeStatus {
    Ok,
    NoMatch,
    DataUnavailable,
}

impl From<SegmentStatus> for MarketSizeStatus {
    fn from(status: SegmentStatus) -> Self {
        match status {
            SegmentStatus::Ok => MarketSizeStatus::Ok,
            SegmentStatus::NoMatch => MarketSizeStatus::NoMatch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketSizeReport {
    pub status: MarketSizeStatus,
    pub count: Option<usize>,
    pub total_owners: Option<usize>,
    pub message: String,
    pub warnings: Vec<String>,
    pub funnel: Vec<StageCount>,
    pub disclaimer: String,
}

impl MarketSizeReport {
    /// Report for a completed evaluation. `parse_anomalies` are the criteria
    /// dropped while reading raw input, before the engine ran.
    pub fn from_result(
        result: &MarketSizeResult,
        query: &Query,
        total_owners: usize,
        parse_anomalies: &[QueryAnomaly],
    ) -> Self {
        let status = MarketSizeStatus::from(result.status);
        let message = match status {
            MarketSizeStatus::Ok => format!(
                "Potential customer base size: {} homeowners",
                result.count
            ),
            _ => NO_MATCH_MESSAGE.to_string(),
        };

        let mut warnings: Vec<String> = parse_anomalies
            .iter()
            .chain(result.anomalies.iter())
            .map(ToString::to_string)
            .collect();
        if query.has_unapplied_criteria() {
            warnings.push(UNAPPLIED_WARNING.to_string());
        }

        Self {
            status,
            count: Some(result.count),
            total_owners: Some(total_owners),
            message,
            warnings,
            funnel: result.funnel.clone(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    pub fn data_unavailable(err: &MarketError) -> Self {
        Self {
            status: MarketSizeStatus::DataUnavailable,
            count: None,
            total_owners: None,
            message: format!("Market size cannot be estimated: {err}"),
            warnings: Vec::new(),
            funnel: Vec::new(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        self.status == MarketSizeStatus::DataUnavailable
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(total) = self.total_owners {
            lines.push(format!(
                "Based on the analysis of {total} homeowners in our database."
            ));
        }
        for warning in &self.warnings {
            lines.push(format!("Warning: {warning}"));
        }
        lines.push(String::new());
        lines.push(self.disclaimer.clone());
        lines.join("\n")
    }
}

/// Parse raw criteria, evaluate them, and build the report.
pub fn estimate(dataset: &Dataset, criteria: &RawCriteria) -> MarketSizeReport {
    let parsed = criteria.parse();
    for anomaly in &parsed.anomalies {
        warn!(%anomaly, "Ignoring unrecognized criterion");
    }

    let result = SegmentFilterEngine::new().evaluate(dataset, &parsed.query);
    info!(
        count = result.count,
        total_owners = dataset.total_owners(),
        status = ?result.status,
        "Market size estimated"
    );
    MarketSizeReport::from_result(
        &result,
        &parsed.query,
        dataset.total_owners(),
        &parsed.anomalies,
    )
}

/// Load from `source`, then estimate. A load failure yields a
/// `DataUnavailable` report and the engine is not run.
pub fn load_and_estimate(source: &dyn TableSource, criteria: &RawCriteria) -> MarketSizeReport {
    match Dataset::load(source) {
        Ok(dataset) => estimate(&dataset, criteria),
        Err(e) => {
            error!(error = %e, source = %source.describe(), "Dataset unavailable");
            MarketSizeReport::data_unavailable(&e)
        }
    }
}
