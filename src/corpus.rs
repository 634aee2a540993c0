use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::collation::compare_zh;
use crate::overview::{build_overview, OverviewQuery};
use crate::{
    fallback_circle_name, records_in_key_order, CircleOption, OverviewError, Snapshot, UmaOptions,
    UmaOverview,
};

const DATE_PATTERN: &str = r"(\d{8})\.json$";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is a valid regex"))
}

/// Pulls the `YYYYMMDD` stamp out of a snapshot identifier such as
/// `data/20231012.json`. The digits are not checked against a calendar.
pub fn extract_date(identifier: &str) -> Option<&str> {
    date_pattern()
        .captures(identifier)
        .and_then(|captures| captures.get(1))
        .map(|date| date.as_str())
}

/// Every dated snapshot plus the circle catalog, built once and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    directory: String,
    by_date: BTreeMap<String, Snapshot>,
    dates: Vec<String>,
    circles: HashMap<u64, String>,
    circle_options: Vec<CircleOption>,
}

impl Corpus {
    pub fn build<I, S>(directory: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Snapshot)>,
        S: AsRef<str>,
    {
        let mut by_date = BTreeMap::new();
        let mut circles: HashMap<u64, String> = HashMap::new();
        let mut skipped = 0usize;

        for (identifier, snapshot) in entries {
            let identifier = identifier.as_ref();
            let Some(date) = extract_date(identifier) else {
                debug!(identifier, "skipping snapshot without a date stamp");
                skipped += 1;
                continue;
            };

            for record in records_in_key_order(&snapshot) {
                circles.entry(record.circle_id).or_insert_with(|| {
                    record
                        .display_circle_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| fallback_circle_name(record.circle_id))
                });
            }

            by_date.insert(date.to_string(), snapshot);
        }

        let dates: Vec<String> = by_date.keys().cloned().collect();
        let mut circle_options: Vec<CircleOption> = circles
            .iter()
            .map(|(id, name)| CircleOption {
                id: *id,
                name: name.clone(),
            })
            .collect();
        circle_options.sort_by(|a, b| compare_zh(&a.name, &b.name).then(a.id.cmp(&b.id)));

        info!(
            dates = dates.len(),
            circles = circle_options.len(),
            skipped,
            "snapshot corpus indexed"
        );

        Self {
            directory: directory.into(),
            by_date,
            dates,
            circles,
            circle_options,
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// All snapshot dates, ascending.
    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn has_date(&self, date: &str) -> bool {
        self.by_date.contains_key(date)
    }

    pub fn snapshot(&self, date: &str) -> Option<&Snapshot> {
        self.by_date.get(date)
    }

    /// Snapshots whose date falls in `[start, end]`, ascending by date.
    pub fn snapshots_between(
        &self,
        start: &str,
        end: &str,
    ) -> impl Iterator<Item = (&str, &Snapshot)> {
        let window = if start <= end {
            Some(
                self.by_date
                    .range::<str, _>((Bound::Included(start), Bound::Included(end))),
            )
        } else {
            None
        };
        window
            .into_iter()
            .flatten()
            .map(|(date, snapshot)| (date.as_str(), snapshot))
    }

    pub fn circle_name(&self, circle_id: u64) -> Option<&str> {
        self.circles.get(&circle_id).map(String::as_str)
    }

    pub fn circle_options(&self) -> &[CircleOption] {
        &self.circle_options
    }

    pub fn circle_option(&self, circle_id: u64) -> Option<&CircleOption> {
        self.circle_options
            .iter()
            .find(|option| option.id == circle_id)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.circle_options.is_empty()
    }

    pub fn options(&self) -> UmaOptions {
        UmaOptions {
            directory: self.directory.clone(),
            circles: self.circle_options.clone(),
            dates: self.dates.clone(),
        }
    }

    pub fn overview(
        &self,
        circle_id: u64,
        start: &str,
        end: &str,
    ) -> Result<UmaOverview, OverviewError> {
        build_overview(self, &OverviewQuery::new(circle_id, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FanRecord;

    fn record(viewer_id: u64, circle_id: u64, circle_name: Option<&str>) -> FanRecord {
        FanRecord {
            name: None,
            fan: 1,
            circle_name: circle_name.map(str::to_string),
            ts: "2023-01-01T00:00:00Z".to_string(),
            viewer_id,
            comment: None,
            rank_score: None,
            circle_id,
        }
    }

    fn snapshot(records: Vec<FanRecord>) -> Snapshot {
        records
            .into_iter()
            .map(|record| (record.player_id(), record))
            .collect()
    }

    #[test]
    fn extracts_date_before_extension() {
        assert_eq!(extract_date("./data/20231012.json"), Some("20231012"));
        assert_eq!(extract_date("fans-20240101.json"), Some("20240101"));
        assert_eq!(extract_date("20231012.json.bak"), None);
        assert_eq!(extract_date("notes.json"), None);
        assert_eq!(extract_date("2023101.json"), None);
    }

    #[test]
    fn skips_identifiers_without_dates() {
        let corpus = Corpus::build(
            "test",
            vec![
                ("readme.json", snapshot(vec![record(1, 9, Some("Ghost"))])),
                ("20230102.json", snapshot(vec![record(2, 5, Some("Alpha"))])),
            ],
        );

        assert_eq!(corpus.dates(), ["20230102".to_string()]);
        assert!(corpus.circle_name(9).is_none());
        assert_eq!(corpus.circle_name(5), Some("Alpha"));
    }

    #[test]
    fn first_seen_circle_name_wins() {
        let corpus = Corpus::build(
            "test",
            vec![
                ("20230101.json", snapshot(vec![record(1, 5, Some("Original"))])),
                ("20230102.json", snapshot(vec![record(1, 5, Some("Renamed"))])),
                ("20230103.json", snapshot(vec![record(2, 6, None)])),
            ],
        );

        assert_eq!(corpus.circle_name(5), Some("Original"));
        assert_eq!(corpus.circle_name(6), Some("Circle 6"));
    }

    #[test]
    fn circle_name_comes_from_lowest_numeric_key() {
        let corpus = Corpus::build(
            "test",
            vec![(
                "20230101.json",
                snapshot(vec![record(10, 5, Some("Ten")), record(9, 5, Some("Nine"))]),
            )],
        );

        assert_eq!(corpus.circle_name(5), Some("Nine"));
    }

    #[test]
    fn empty_circle_name_does_not_fall_back() {
        let corpus = Corpus::build(
            "test",
            vec![("20230101.json", snapshot(vec![record(1, 5, Some(""))]))],
        );

        assert_eq!(corpus.circle_name(5), Some(""));
    }

    #[test]
    fn dates_sort_ascending_regardless_of_input_order() {
        let corpus = Corpus::build(
            "test",
            vec![
                ("20230103.json", snapshot(vec![record(1, 5, None)])),
                ("20230101.json", snapshot(vec![record(1, 5, None)])),
                ("20230102.json", snapshot(vec![record(1, 5, None)])),
            ],
        );

        assert_eq!(corpus.dates(), ["20230101", "20230102", "20230103"]);
        assert_eq!(
            corpus
                .snapshots_between("20230102", "20230103")
                .map(|(date, _)| date)
                .collect::<Vec<_>>(),
            vec!["20230102", "20230103"]
        );
    }

    #[test]
    fn empty_input_yields_empty_options() {
        let corpus = Corpus::build("static://empty", Vec::<(String, Snapshot)>::new());
        let options = corpus.options();

        assert!(corpus.is_empty());
        assert_eq!(options.directory, "static://empty");
        assert!(options.circles.is_empty());
        assert!(options.dates.is_empty());
    }
}
