use axum::{extract::State, Extension, Json};
use senti_core::SearchHit;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, AppState};

const DEFAULT_TOP_K: usize = 5;
const MAX_TOP_K: usize = 50;

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    pub results: Vec<SearchHit>,
}

pub(super) fn normalize_top_k(top_k: Option<usize>) -> usize {
    top_k.unwrap_or(DEFAULT_TOP_K).clamp(1, MAX_TOP_K)
}

/// `POST /search`: read-only similarity lookup over stored predictions.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query must not be empty",
        ));
    }

    let results = state
        .service
        .search(query, normalize_top_k(body.top_k))
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(SearchResponse { results }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use senti_core::IndexingPolicy;
    use wiremock::MockServer;

    use super::super::test_support::{app_with, mount_embedding, mount_prediction, post_json};
    use super::*;

    #[test]
    fn normalize_top_k_applies_default_and_bounds() {
        assert_eq!(normalize_top_k(None), 5);
        assert_eq!(normalize_top_k(Some(0)), 1);
        assert_eq!(normalize_top_k(Some(3)), 3);
        assert_eq!(normalize_top_k(Some(1_000)), 50);
    }

    #[tokio::test]
    async fn search_finds_previous_prediction() {
        let tei = MockServer::start().await;
        mount_prediction(&tei, "POSITIVE", 0.95).await;
        mount_embedding(&tei, "great pizza", [1.0, 0.0, 0.0]).await;
        mount_embedding(&tei, "pizza", [0.9, 0.1, 0.0]).await;
        let app = app_with(&tei, IndexingPolicy::Required);

        let (status, _) = post_json(
            app.clone(),
            "/predict",
            serde_json::json!({ "text": "great pizza" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = post_json(
            app,
            "/search",
            serde_json::json!({ "query": "pizza", "top_k": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results = json["results"].as_array().expect("results array");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["document"], "great pizza");
        assert_eq!(results[0]["sentiment"], "POSITIVE");
    }

    #[tokio::test]
    async fn empty_query_is_validation_error() {
        let tei = MockServer::start().await;

        let (status, json) = post_json(
            app_with(&tei, IndexingPolicy::Required),
            "/search",
            serde_json::json!({ "query": "  " }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }
}
