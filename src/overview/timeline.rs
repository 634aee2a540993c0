use std::collections::HashMap;

use crate::corpus::Corpus;
use crate::overview::range::DateRange;
use crate::{fallback_circle_name, records_in_key_order, FanRecord, OverviewError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPoint {
    pub date: String,
    pub fans: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerTimeline {
    pub name: Option<String>,
    pub comment: Option<String>,
    /// Ascending by date; points are only ever appended.
    pub history: Vec<HistoryPoint>,
}

impl PlayerTimeline {
    fn absorb(&mut self, date: &str, record: &FanRecord) {
        if let Some(name) = record.display_name() {
            self.name = Some(name.to_string());
        }
        if let Some(comment) = record.display_comment() {
            self.comment = Some(comment.to_string());
        }
        self.history.push(HistoryPoint {
            date: date.to_string(),
            fans: record.fan,
        });
    }

    pub fn first(&self) -> Option<&HistoryPoint> {
        self.history.first()
    }

    pub fn last(&self) -> Option<&HistoryPoint> {
        self.history.last()
    }

    /// Fan count carried forward to `date`: the latest point on or before it.
    pub fn fans_at_or_before(&self, date: &str) -> Option<u64> {
        let upto = self
            .history
            .partition_point(|point| point.date.as_str() <= date);
        upto.checked_sub(1).map(|index| self.history[index].fans)
    }
}

/// One date's records for the queried circle.
#[derive(Debug, Clone)]
pub struct DayRecords<'a> {
    pub date: &'a str,
    pub records: Vec<&'a FanRecord>,
}

#[derive(Debug, Clone)]
pub struct CircleTimelines<'a> {
    pub circle_id: u64,
    pub circle_name: String,
    /// Dates in range that had at least one record for the circle.
    pub days: Vec<DayRecords<'a>>,
    players: Vec<(String, PlayerTimeline)>,
}

impl<'a> CircleTimelines<'a> {
    /// Player timelines in first-seen order.
    pub fn players(&self) -> impl Iterator<Item = (&str, &PlayerTimeline)> {
        self.players
            .iter()
            .map(|(player_id, timeline)| (player_id.as_str(), timeline))
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerTimeline> {
        self.players
            .iter()
            .find(|(id, _)| id == player_id)
            .map(|(_, timeline)| timeline)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn dates(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.days.iter().map(|day| day.date)
    }
}

pub fn build_timelines<'a>(
    corpus: &'a Corpus,
    circle_id: u64,
    range: &DateRange,
) -> Result<CircleTimelines<'a>, OverviewError> {
    let mut days = Vec::new();
    let mut circle_name = corpus.circle_name(circle_id).map(str::to_string);

    for (date, snapshot) in corpus.snapshots_between(&range.start, &range.end) {
        // One record per player per day; a later duplicate replaces the
        // earlier one but keeps its position.
        let mut records: Vec<&FanRecord> = Vec::new();
        let mut slots: HashMap<u64, usize> = HashMap::new();
        let mut first: Option<&FanRecord> = None;
        for record in records_in_key_order(snapshot)
            .into_iter()
            .filter(|record| record.circle_id == circle_id)
        {
            first.get_or_insert(record);
            match slots.get(&record.viewer_id) {
                Some(&slot) => records[slot] = record,
                None => {
                    slots.insert(record.viewer_id, records.len());
                    records.push(record);
                }
            }
        }
        let Some(first) = first else {
            continue;
        };

        if circle_name.is_none() {
            circle_name = Some(
                first
                    .display_circle_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_circle_name(circle_id)),
            );
        }

        days.push(DayRecords { date, records });
    }

    if days.is_empty() {
        return Err(OverviewError::NoRecordsInRange {
            circle_id,
            start: range.start.clone(),
            end: range.end.clone(),
        });
    }

    let mut players: Vec<(String, PlayerTimeline)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for day in &days {
        for record in &day.records {
            let player_id = record.player_id();
            let slot = *index.entry(player_id.clone()).or_insert_with(|| {
                players.push((player_id, PlayerTimeline::default()));
                players.len() - 1
            });
            players[slot].1.absorb(day.date, record);
        }
    }

    Ok(CircleTimelines {
        circle_id,
        circle_name: circle_name.unwrap_or_else(|| fallback_circle_name(circle_id)),
        days,
        players,
    })
}
