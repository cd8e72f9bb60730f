//! HTTP request handlers and response types

use crate::prompt::build_summary_prompt;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use salesboard_common::SalesBoardError;
use salesboard_data::{
    CleaningReport, DashboardData, KeyTotal, MonthlyDataPoint, SalesRecord, SummaryFacts,
    TableFormat,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// The dashboard page
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Rendering outcome for a single chart.
///
/// A chart that cannot be drawn is isolated the same way external-API
/// failures are; it never aborts the upload.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready { png: String },
    Unavailable { message: String },
}

/// The four dashboard charts as base64 PNG outcomes
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartSet {
    pub monthly_trend: ChartOutcome,
    pub top_products: ChartOutcome,
    pub top_regions: ChartOutcome,
    pub region_share: ChartOutcome,
}

/// Outcome of the summary generation step.
///
/// Generation failures never fail the upload; the dashboard ships with an
/// explicit unavailability marker instead of error text posing as content.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Ready { text: String },
    Unavailable { kind: String, message: String },
}

/// Everything the dashboard page needs from one upload
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// The cleaned table, shown to the user alongside the aggregates
    pub records: Vec<SalesRecord>,
    pub report: CleaningReport,
    pub monthly: Vec<MonthlyDataPoint>,
    pub product_totals: Vec<KeyTotal>,
    pub region_totals: Vec<KeyTotal>,
    pub facts: SummaryFacts,
    pub charts: ChartSet,
    pub summary: SummaryOutcome,
}

#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechResponse {
    /// Base64-encoded MP3 audio
    pub audio: String,
    pub content_type: &'static str,
}

/// Process an uploaded sales file into the full dashboard payload.
///
/// Ingestion and cleaning failures abort the request; no partial dashboard
/// is returned. A failed summary generation does not.
#[instrument(skip(state, multipart), fields(upload_id = %Uuid::new_v4()))]
pub async fn dashboard(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DashboardResponse>, ApiError> {
    let (filename, bytes) = read_upload(multipart).await?;
    let format = TableFormat::from_filename(&filename).ok_or_else(|| {
        SalesBoardError::validation_field(
            format!("Unsupported file type: '{}' (expected .csv or .xlsx)", filename),
            "file",
        )
    })?;
    info!("Received upload '{}' ({} bytes)", filename, bytes.len());

    // Parsing and rendering are CPU-bound; keep them off the async runtime.
    let pipeline = state.pipeline;
    let renderer = state.renderer.clone();
    let (data, charts) = tokio::task::spawn_blocking(move || {
        let data = pipeline.run(&bytes, format)?;
        let charts = render_charts(&renderer, &data);
        Ok::<_, SalesBoardError>((data, charts))
    })
    .await
    .map_err(|e| SalesBoardError::with_source("Dashboard task failed", e))??;

    let summary = summarize(&state, &data).await;

    Ok(Json(DashboardResponse {
        records: data.records,
        report: data.report,
        monthly: data.monthly,
        product_totals: data.product_totals,
        region_totals: data.region_totals,
        facts: data.facts,
        charts,
        summary,
    }))
}

/// Synthesize MP3 audio for a piece of summary text
#[instrument(skip(state, request), fields(text_len = request.text.len()))]
pub async fn speech(
    State(state): State<AppState>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(SalesBoardError::validation_field("No text available to speak", "text").into());
    }

    let audio = state.speech.synthesize(&request.text).await?;
    Ok(Json(SpeechResponse {
        audio: BASE64.encode(&audio),
        content_type: "audio/mpeg",
    }))
}

/// Pull the uploaded file out of the multipart body
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        SalesBoardError::validation_field(format!("Malformed multipart body: {}", e), "file")
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| SalesBoardError::validation_field("Upload has no filename", "file"))?;

        let bytes = field.bytes().await.map_err(|e| {
            SalesBoardError::validation_field(format!("Failed to read upload: {}", e), "file")
        })?;

        if bytes.is_empty() {
            return Err(SalesBoardError::validation_field("Uploaded file is empty", "file").into());
        }

        return Ok((filename, bytes.to_vec()));
    }

    Err(SalesBoardError::validation_field("Missing 'file' field in upload", "file").into())
}

/// Render all four charts, folding per-chart failures into outcomes.
///
/// A valid upload can still defeat individual charts (no positive region
/// totals leaves the pie with nothing to slice); the rest of the
/// dashboard is produced regardless.
fn render_charts(renderer: &salesboard_charts::ChartRenderer, data: &DashboardData) -> ChartSet {
    ChartSet {
        monthly_trend: chart_outcome("monthly trend", renderer.monthly_trend(&data.monthly)),
        top_products: chart_outcome("top products", renderer.top_products(&data.product_totals)),
        top_regions: chart_outcome("top regions", renderer.top_regions(&data.region_totals)),
        region_share: chart_outcome("region share", renderer.region_share(&data.region_totals)),
    }
}

fn chart_outcome(name: &str, result: Result<Vec<u8>, SalesBoardError>) -> ChartOutcome {
    match result {
        Ok(png) => ChartOutcome::Ready {
            png: BASE64.encode(png),
        },
        Err(e) => {
            warn!("Chart '{}' failed to render: {}", name, e);
            ChartOutcome::Unavailable {
                message: e.to_string(),
            }
        }
    }
}

/// Run the summary generation step, folding failures into the outcome
async fn summarize(state: &AppState, data: &DashboardData) -> SummaryOutcome {
    if !state.generation.is_configured() {
        warn!("Summary skipped: no generation API key configured");
        return SummaryOutcome::Unavailable {
            kind: "configuration".to_string(),
            message: "No API key configured for text generation".to_string(),
        };
    }

    let prompt = build_summary_prompt(&data.facts, &data.report);
    match state.generation.generate(&prompt).await {
        Ok(text) => SummaryOutcome::Ready { text },
        Err(e) => {
            error!("Summary generation failed: {}", e);
            SummaryOutcome::Unavailable {
                kind: "generation".to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// Error wrapper mapping pipeline errors onto HTTP status codes
#[derive(Debug)]
pub struct ApiError(pub SalesBoardError);

impl From<SalesBoardError> for ApiError {
    fn from(err: SalesBoardError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            SalesBoardError::Ingest { .. }
            | SalesBoardError::Cleaning { .. }
            | SalesBoardError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SalesBoardError::Network { .. }
            | SalesBoardError::Generation { .. }
            | SalesBoardError::Speech { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match &self.0 {
            SalesBoardError::Ingest { .. } => "ingest",
            SalesBoardError::Cleaning { .. } => "cleaning",
            SalesBoardError::Validation { .. } => "validation",
            SalesBoardError::Network { .. } => "network",
            SalesBoardError::Generation { .. } => "generation",
            SalesBoardError::Speech { .. } => "speech",
            SalesBoardError::Chart { .. } => "chart",
            _ => "internal",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind().to_string(),
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
