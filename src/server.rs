/*!
 * HTTP upload/download boundary.
 *
 * `POST /upload` takes one `.docx` in the multipart field `file` and answers
 * with the translated document. `GET /health` reports liveness. A client that
 * disconnects drops the request future, which cancels in-flight translations.
 */

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::translation::DocumentPipeline;

/// MIME type of WordprocessingML documents
pub const DOCX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Multipart field carrying the upload
pub const UPLOAD_FIELD: &str = "file";

/// Structured error body: `{ "status": 400, "detail": "..." }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub detail: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// An error answered to the client
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        Self {
            status: StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            detail: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DocumentPipeline>,
}

/// Build the router
pub fn build_router(pipeline: Arc<DocumentPipeline>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(AppState { pipeline })
}

/// Start the server and run until it fails
pub async fn serve(config: &Config) -> Result<()> {
    let pipeline = Arc::new(DocumentPipeline::from_config(config)?);
    let app = build_router(pipeline, config.server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        upload = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = upload else {
        warn!("Upload without a '{}' field", UPLOAD_FIELD);
        return Err(ApiError::bad_request(format!("Missing form field '{}'", UPLOAD_FIELD)));
    };
    info!("Received upload {:?} ({} bytes)", filename, bytes.len());

    let document = state.pipeline.process(filename.as_deref(), bytes).await?;

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE)),
        (header::CONTENT_DISPOSITION, content_disposition(&document.filename)),
    ];
    Ok((headers, document.bytes).into_response())
}

/// RFC 5987 `attr-char`: everything else is percent-encoded
const FILENAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment` disposition for `filename`
///
/// `filename` carries an ASCII fallback with unsafe characters replaced.
/// Names with anything else also get a UTF-8 `filename*` (RFC 6266).
pub fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();

    let value = if fallback == filename {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(filename, FILENAME_ENCODE_SET)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
