use crate::overview::timeline::CircleTimelines;
use crate::{
    ChartSeries, OverviewMetrics, PlayerGrowth, ACTIVITY_NOTE, ACTIVITY_STATUS, MISSING_TEXT,
};

/// Growth rows ordered by increase, largest first. Ties keep first-seen order.
pub fn build_table(timelines: &CircleTimelines<'_>) -> Vec<PlayerGrowth> {
    let mut rows: Vec<PlayerGrowth> = timelines
        .players()
        .filter_map(|(player_id, timeline)| {
            let first = timeline.first()?;
            let last = timeline.last()?;
            Some(PlayerGrowth {
                player_id: player_id.to_string(),
                name: timeline
                    .name
                    .clone()
                    .unwrap_or_else(|| MISSING_TEXT.to_string()),
                start_fans: first.fans,
                end_fans: last.fans,
                increase: last.fans.saturating_sub(first.fans),
                comment: timeline
                    .comment
                    .clone()
                    .unwrap_or_else(|| MISSING_TEXT.to_string()),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.increase.cmp(&a.increase));
    rows
}

/// Circle total per day with every player carried forward to that day, and
/// the day-over-day change. The first day's change is zero.
pub fn build_chart(timelines: &CircleTimelines<'_>) -> ChartSeries {
    let mut chart = ChartSeries::default();

    for date in timelines.dates() {
        let total: u64 = timelines
            .players()
            .filter_map(|(_, timeline)| timeline.fans_at_or_before(date))
            .sum();
        let previous = chart.total_fans.last().copied().unwrap_or(total);

        chart.dates.push(date.to_string());
        chart.total_fans.push(total);
        chart.daily_new_fans.push(signed_delta(total, previous));
    }

    chart
}

pub fn build_metrics(table: &[PlayerGrowth], chart: &ChartSeries) -> OverviewMetrics {
    let fans_total_growth: u64 = table.iter().map(|row| row.increase).sum();
    let today_new_fans = match chart.total_fans.as_slice() {
        [] => 0,
        [_] => i64::try_from(fans_total_growth).unwrap_or(i64::MAX),
        [.., previous, last] => signed_delta(*last, *previous),
    };

    OverviewMetrics {
        fans_total_growth,
        today_new_fans,
        activity_status: ACTIVITY_STATUS.to_string(),
        activity_note: ACTIVITY_NOTE.to_string(),
    }
}

fn signed_delta(current: u64, previous: u64) -> i64 {
    if current >= previous {
        i64::try_from(current - previous).unwrap_or(i64::MAX)
    } else {
        i64::try_from(previous - current)
            .map(|delta| -delta)
            .unwrap_or(i64::MIN)
    }
}
