use axum::{extract::State, Extension, Json};
use senti_core::SentimentResult;
use senti_engine::IndexOutcome;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PredictRequest {
    pub text: String,
}

/// `POST /predict`: classify, index, and answer with the bare result.
pub(super) async fn predict(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<SentimentResult>, ApiError> {
    let prediction = state
        .service
        .predict(&body.text)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    if let IndexOutcome::Failed { reason } = &prediction.indexing {
        tracing::warn!(request_id = %req_id.0, %reason, "prediction returned without being indexed");
    }

    Ok(Json(prediction.result))
}
