use crate::engine::{AnalysisTables, Analyzer, TABLE_NAMES};
use crate::error::AnalysisError;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ========== Request/Response Types ==========

fn default_source() -> String {
    "document.txt".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default = "default_source")]
    pub source: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default = "default_source")]
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub source: String,
    pub tables: AnalysisTables,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn not_found(message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: anyhow::anyhow!(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.error);
        if self.status.is_server_error() {
            tracing::error!("API error: {}", message);
        } else {
            tracing::warn!("Rejected request: {}", message);
        }

        (self.status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let status = if err.is_invalid_input() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            error: err.into(),
        }
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn analyze_document(
    State(analyzer): State<Arc<Analyzer>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = analyzer.analyze(&req.text, &req.source)?;

    Ok(Json(ApiResponse::success(AnalyzeResponse {
        tables: analysis.tables(),
        source: analysis.source,
    })))
}

async fn upload_document(
    State(analyzer): State<Arc<Analyzer>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let analysis = analyzer.analyze_bytes(&body, &params.source)?;

    Ok(Json(ApiResponse::success(AnalyzeResponse {
        tables: analysis.tables(),
        source: analysis.source,
    })))
}

async fn download_table(
    State(analyzer): State<Arc<Analyzer>>,
    Path(name): Path<String>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    if !TABLE_NAMES.contains(&name.as_str()) {
        return Err(AppError::not_found(format!("Unknown table '{}'", name)));
    }

    let analysis = analyzer.analyze(&req.text, &req.source)?;
    let tables = analysis.tables();
    let Some(table) = tables.get(&name) else {
        return Err(AppError::not_found(format!("Unknown table '{}'", name)));
    };

    let disposition = format!(
        "attachment; filename=\"{}_{}.csv\"",
        file_stem(&analysis.source),
        table.name
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        table.to_csv(),
    )
        .into_response())
}

/// Filename stem safe to embed in a header value
pub fn file_stem(source: &str) -> String {
    let stem = std::path::Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}

// ========== Router ==========

pub fn create_router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_document))
        .route("/analyze/:table", post(download_table))
        .route("/upload", post(upload_document))
        .with_state(analyzer)
}
