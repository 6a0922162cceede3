//! Comparison report emitted after a diff run.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use visual_diff::{Region, VisualDiff};

/// Paths of the artifacts written for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutputs {
    pub diff: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mask: Option<String>,
}

/// Metadata describing one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub id: String,
    pub created_at: String,
    pub width: u32,
    pub height: u32,
    pub threshold: u8,
    pub diff_percentage: f64,
    pub changed_pixels: u64,
    pub total_pixels: u64,
    /// Regions as supplied by the caller, before sanitization.
    pub ignore_regions: Vec<Region>,
    pub outputs: ReportOutputs,
}

impl ComparisonReport {
    /// Build a report with a fresh id and the current UTC time.
    pub fn new(
        diff: &VisualDiff,
        threshold: u8,
        ignore_regions: Vec<Region>,
        outputs: ReportOutputs,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            width: diff.width,
            height: diff.height,
            threshold,
            diff_percentage: diff.diff_percentage,
            changed_pixels: diff.changed_pixels(),
            total_pixels: diff.total_pixels(),
            ignore_regions,
            outputs,
        }
    }

    /// Whether the change exceeds `limit` percent.
    pub fn exceeds(&self, limit: f64) -> bool {
        self.diff_percentage > limit
    }
}
