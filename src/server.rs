use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, info};
use umafan::config::ServerConfig;
use umafan::{Corpus, UmaOptions, UmaOverview};

use crate::api::{ApiError, ApiOverviewRequest};

#[derive(Clone)]
struct AppState {
    corpus: Arc<Corpus>,
}

pub async fn serve(corpus: Corpus, settings: ServerConfig) -> Result<(), String> {
    let web_root = settings.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(&web_root).not_found_service(ServeFile::new(index_path));

    let app = api_router(Arc::new(corpus)).fallback_service(static_service);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    info!(%addr, web_root = %web_root, "dashboard server listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

fn api_router(corpus: Arc<Corpus>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/options", get(options_handler))
        .route("/api/overview", get(overview_handler))
        .with_state(AppState { corpus })
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn options_handler(State(state): State<AppState>) -> Json<UmaOptions> {
    Json(state.corpus.options())
}

async fn overview_handler(
    State(state): State<AppState>,
    Query(request): Query<ApiOverviewRequest>,
) -> Result<Json<UmaOverview>, (StatusCode, Json<ApiError>)> {
    let query = request.into_query().map_err(|err| {
        let (status, body) = ApiError::bad_request(err);
        (status, Json(body))
    })?;

    umafan::build_overview(&state.corpus, &query)
        .map(Json)
        .map_err(|err| {
            debug!(circle_id = query.circle_id, error = %err, "overview query failed");
            let (status, body) = ApiError::from_overview(&err);
            (status, Json(body))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use umafan::Snapshot;

    fn state() -> AppState {
        let day_one: Snapshot = serde_json::from_value(json!({
            "100": {"name": "Kita", "fan": 10, "circle_name": "North", "ts": "t1", "viewer_id": 100, "circle_id": 5}
        }))
        .unwrap();
        let day_two: Snapshot = serde_json::from_value(json!({
            "100": {"name": "Kita", "fan": 15, "circle_name": "North", "ts": "t2", "viewer_id": 100, "circle_id": 5}
        }))
        .unwrap();
        let corpus = Corpus::build(
            "static://test",
            vec![("20230101.json", day_one), ("20230102.json", day_two)],
        );
        AppState {
            corpus: Arc::new(corpus),
        }
    }

    fn request(circle: Option<&str>, start: Option<&str>, end: Option<&str>) -> ApiOverviewRequest {
        ApiOverviewRequest {
            circle: circle.map(str::to_string),
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn options_lists_catalog() {
        let Json(options) = options_handler(State(state())).await;
        assert_eq!(options.directory, "static://test");
        assert_eq!(options.dates, vec!["20230101", "20230102"]);
        assert_eq!(options.circles.len(), 1);
    }

    #[tokio::test]
    async fn overview_returns_growth() {
        let Json(overview) = overview_handler(State(state()), Query(request(Some("5"), None, None)))
            .await
            .unwrap();
        assert_eq!(overview.metrics.fans_total_growth, 5);
        assert_eq!(overview.chart.total_fans, vec![10, 15]);
    }

    #[tokio::test]
    async fn unknown_circle_is_not_found() {
        let Err((status, Json(body))) =
            overview_handler(State(state()), Query(request(Some("99"), None, None))).await
        else {
            panic!("expected an error response");
        };
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "no_records_in_range");
    }

    #[tokio::test]
    async fn malformed_circle_is_bad_request() {
        let Err((status, _)) =
            overview_handler(State(state()), Query(request(Some("five"), None, None))).await
        else {
            panic!("expected an error response");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_corpus_is_unavailable() {
        let state = AppState {
            corpus: Arc::new(Corpus::build("static://empty", Vec::<(String, Snapshot)>::new())),
        };
        let Err((status, _)) = overview_handler(State(state), Query(request(Some("5"), None, None))).await
        else {
            panic!("expected an error response");
        };
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
