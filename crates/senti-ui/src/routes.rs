use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::frontend::{AnalysisView, FrontEnd};

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Serialize)]
struct SearchView {
    results: String,
}

#[derive(Debug, Serialize)]
struct ExamplesView {
    examples: &'static [&'static str],
}

pub fn build_router(frontend: Arc<FrontEnd>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ui/analyze", post(analyze))
        .route("/ui/clear", post(clear))
        .route("/ui/search", post(search))
        .route("/ui/examples", get(examples))
        .layer(TraceLayer::new_for_http())
        .with_state(frontend)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn analyze(
    State(frontend): State<Arc<FrontEnd>>,
    Json(body): Json<AnalyzeRequest>,
) -> Json<AnalysisView> {
    Json(frontend.analyze(&body.text).await)
}

async fn clear(State(frontend): State<Arc<FrontEnd>>) -> Json<AnalysisView> {
    Json(frontend.clear())
}

async fn search(
    State(frontend): State<Arc<FrontEnd>>,
    Json(body): Json<SearchRequest>,
) -> Json<SearchView> {
    Json(SearchView {
        results: frontend.search(&body.query).await,
    })
}

async fn examples(State(frontend): State<Arc<FrontEnd>>) -> Json<ExamplesView> {
    Json(ExamplesView {
        examples: frontend.examples(),
    })
}
