use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use umafan::{OverviewError, OverviewQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ApiOverviewRequest {
    #[serde(alias = "circleId", alias = "circle_id")]
    pub circle: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ApiOverviewRequest {
    pub fn into_query(self) -> Result<OverviewQuery, String> {
        let circle = self.circle.unwrap_or_default();
        let circle = circle.trim();
        if circle.is_empty() {
            return Err("circle is required".to_string());
        }
        let circle_id = circle
            .parse::<u64>()
            .map_err(|_| format!("invalid circle id: {}", circle))?;

        Ok(OverviewQuery::new(
            circle_id,
            self.start.unwrap_or_default(),
            self.end.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: String) -> (StatusCode, Self) {
        (
            StatusCode::BAD_REQUEST,
            Self {
                error: "bad_request".to_string(),
                message,
            },
        )
    }

    pub fn from_overview(err: &OverviewError) -> (StatusCode, Self) {
        let (status, code) = match err {
            OverviewError::EmptyCorpus => (StatusCode::SERVICE_UNAVAILABLE, "empty_corpus"),
            OverviewError::NoRecordsInRange { .. } => (StatusCode::NOT_FOUND, "no_records_in_range"),
        };
        (
            status,
            Self {
                error: code.to_string(),
                message: err.to_string(),
            },
        )
    }
}
