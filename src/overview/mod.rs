pub mod projection;
pub mod range;
pub mod timeline;

pub use projection::{build_chart, build_metrics, build_table};
pub use range::{select_range, DateRange};
pub use timeline::{build_timelines, CircleTimelines, DayRecords, HistoryPoint, PlayerTimeline};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::Corpus;
use crate::{CircleOption, OverviewError, OverviewRange, UmaOverview};

/// A caller's overview request. Dates may be empty or unknown; they are
/// resolved by [`select_range`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewQuery {
    pub circle_id: u64,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl OverviewQuery {
    pub fn new(circle_id: u64, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            circle_id,
            start: start.into(),
            end: end.into(),
        }
    }
}

pub fn build_overview(corpus: &Corpus, query: &OverviewQuery) -> Result<UmaOverview, OverviewError> {
    let range = select_range(corpus, query)?;
    let timelines = build_timelines(corpus, query.circle_id, &range)?;

    let table = build_table(&timelines);
    let chart = build_chart(&timelines);
    let metrics = build_metrics(&table, &chart);

    let circle = corpus
        .circle_option(query.circle_id)
        .cloned()
        .unwrap_or_else(|| CircleOption {
            id: query.circle_id,
            name: timelines.circle_name.clone(),
        });

    debug!(
        circle_id = query.circle_id,
        start = %range.start,
        end = %range.end,
        days = chart.len(),
        players = timelines.player_count(),
        "overview computed"
    );

    Ok(UmaOverview {
        circle,
        range: OverviewRange {
            start: range.start,
            end: range.end,
        },
        metrics,
        chart,
        table,
    })
}
