pub mod collation;
pub mod config;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod overview;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use crate::corpus::{extract_date, Corpus};
pub use crate::error::{LoadError, OverviewError};
pub use crate::overview::{build_overview, OverviewQuery};

pub const DEFAULT_DIRECTORY_LABEL: &str = "static://umafan-data";
pub const ACTIVITY_STATUS: &str = "Steady";
pub const ACTIVITY_NOTE: &str = "No anomalies detected for this period";
pub const MISSING_TEXT: &str = "-";

/// One player's row in a daily snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub fan: u64,
    #[serde(default)]
    pub circle_name: Option<String>,
    pub ts: String,
    pub viewer_id: u64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub rank_score: Option<f64>,
    pub circle_id: u64,
}

impl FanRecord {
    pub fn player_id(&self) -> String {
        self.viewer_id.to_string()
    }

    pub fn display_name(&self) -> Option<&str> {
        present(self.name.as_deref())
    }

    pub fn display_comment(&self) -> Option<&str> {
        present(self.comment.as_deref())
    }

    /// The circle name as recorded. Unlike player names an empty string is
    /// kept; only a missing field falls back to [`fallback_circle_name`].
    pub fn display_circle_name(&self) -> Option<&str> {
        self.circle_name.as_deref()
    }
}

/// Player-ID-string to record, as stored in one `YYYYMMDD.json` file.
pub type Snapshot = BTreeMap<String, FanRecord>;

/// Records of a snapshot with integer-like keys first, ascending by value,
/// then the remaining keys in lexicographic order.
pub fn records_in_key_order(snapshot: &Snapshot) -> Vec<&FanRecord> {
    let mut entries: Vec<(&String, &FanRecord)> = snapshot.iter().collect();
    entries.sort_by_key(|(key, _)| match index_key(key) {
        Some(index) => (0u8, index),
        None => (1u8, 0),
    });
    entries.into_iter().map(|(_, record)| record).collect()
}

/// Canonical array-index keys: decimal, no leading zeros, below `u32::MAX`.
fn index_key(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|index| *index < u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleOption {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmaOptions {
    pub directory: String,
    pub circles: Vec<CircleOption>,
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGrowth {
    pub player_id: String,
    pub name: String,
    pub start_fans: u64,
    pub end_fans: u64,
    pub increase: u64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMetrics {
    pub fans_total_growth: u64,
    pub today_new_fans: i64,
    /// Placeholder until anomaly detection exists; always [`ACTIVITY_STATUS`].
    pub activity_status: String,
    pub activity_note: String,
}

/// Daily series for the growth chart. All three vectors are index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub dates: Vec<String>,
    pub total_fans: Vec<u64>,
    pub daily_new_fans: Vec<i64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmaOverview {
    pub circle: CircleOption,
    pub range: OverviewRange,
    pub metrics: OverviewMetrics,
    pub chart: ChartSeries,
    pub table: Vec<PlayerGrowth>,
}

pub fn fallback_circle_name(circle_id: u64) -> String {
    format!("Circle {}", circle_id)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn format_number(value: u64) -> String {
    let mut chars: Vec<char> = value.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

pub fn format_signed(value: i64) -> String {
    let magnitude = format_number(value.unsigned_abs());
    if value < 0 {
        format!("-{}", magnitude)
    } else if value > 0 {
        format!("+{}", magnitude)
    } else {
        magnitude
    }
}
