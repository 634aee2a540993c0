use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::overview::OverviewQuery;
use crate::OverviewError;

/// A query range resolved against the corpus: both ends are indexed dates
/// and `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

pub fn select_range(corpus: &Corpus, query: &OverviewQuery) -> Result<DateRange, OverviewError> {
    let dates = corpus.dates();
    let (Some(earliest), Some(latest)) = (dates.first(), dates.last()) else {
        return Err(OverviewError::EmptyCorpus);
    };
    if corpus.circle_options().is_empty() {
        return Err(OverviewError::EmptyCorpus);
    }

    let start = known_or(corpus, &query.start, earliest);
    let end = known_or(corpus, &query.end, latest);

    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    Ok(DateRange {
        start: start.to_string(),
        end: end.to_string(),
    })
}

fn known_or<'a>(corpus: &Corpus, requested: &'a str, fallback: &'a str) -> &'a str {
    if !requested.is_empty() && corpus.has_date(requested) {
        requested
    } else {
        fallback
    }
}
