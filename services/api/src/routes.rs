use crate::infra::{load_round, run_prediction, AppState, PredictionRequest};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Local;
use josaa_predictor::error::AppError;
use josaa_predictor::predictor::{
    report_file_name, AllotmentRecord, PredictorController, ReportError, ReportFormat, Round,
    RoundOptions, SearchCriteria, SortDirection,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize)]
pub(crate) struct RoundOptionsResponse {
    pub(crate) round: Round,
    #[serde(flatten)]
    pub(crate) options: RoundOptions,
    pub(crate) records: usize,
    pub(crate) skipped: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictionResponse {
    pub(crate) criteria: SearchCriteria,
    pub(crate) direction: SortDirection,
    pub(crate) program: Option<String>,
    pub(crate) program_options: Vec<String>,
    pub(crate) total_matches: usize,
    pub(crate) rows: Vec<AllotmentRecord>,
}

impl PredictionResponse {
    fn from_controller(controller: &PredictorController) -> Option<Self> {
        let criteria = controller.criteria()?.clone();
        let results = controller.results()?;
        Some(Self {
            criteria,
            direction: results.direction(),
            program: results.program_filter().map(str::to_string),
            program_options: results.program_options(),
            total_matches: results.len(),
            rows: results.displayed().into_iter().cloned().collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportRequest {
    #[serde(flatten)]
    pub(crate) prediction: PredictionRequest,
    #[serde(default)]
    pub(crate) format: ReportFormat,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/rounds", get(rounds_endpoint))
        .route("/api/v1/rounds/:round/options", get(round_options_endpoint))
        .route("/api/v1/predictions", post(predictions_endpoint))
        .route(
            "/api/v1/predictions/report",
            post(prediction_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn rounds_endpoint() -> Json<Vec<Round>> {
    Json(Round::all().collect())
}

pub(crate) async fn round_options_endpoint(
    Extension(state): Extension<AppState>,
    Path(round): Path<String>,
) -> Result<Json<RoundOptionsResponse>, AppError> {
    let round: Round = round.parse()?;
    let (controller, skipped) = load_round(state.provider.clone(), round.number()).await?;

    Ok(Json(RoundOptionsResponse {
        round,
        options: controller.options().clone(),
        records: controller.dataset().len(),
        skipped,
    }))
}

pub(crate) async fn predictions_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, AppError> {
    let controller = run_prediction(state.provider.clone(), request).await?;
    let response =
        PredictionResponse::from_controller(&controller).ok_or(ReportError::NoResults)?;
    Ok(Json(response))
}

pub(crate) async fn prediction_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Response, AppError> {
    let controller = run_prediction(state.provider.clone(), request.prediction).await?;
    let document = controller
        .report_document(Local::now().date_naive())
        .ok_or(ReportError::NoResults)?;

    let renderer = request.format.renderer();
    let bytes = renderer.render(&document)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_file_name(&document.applicant_name, renderer.extension())
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, renderer.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
