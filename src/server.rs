//! JSON/HTTP surface.
//!
//! | Method | Path                                             | Body            |
//! |--------|--------------------------------------------------|-----------------|
//! | POST   | `/services/rest/validation/validateSigPdfA`      | `DataToValidate`|
//! | POST   | `/services/rest/validation/validateSignature`    | `DataToValidate`|
//! | GET    | `/health`                                        |                 |

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;

use crate::{DataToValidate, Reports, ValidationError, ValidationOrchestrator};

/// Base path of the validation endpoints.
pub const BASE_PATH: &str = "/services/rest/validation";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<ValidationOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: ValidationOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            &format!("{BASE_PATH}/validateSigPdfA"),
            post(validate_sig_pdfa),
        )
        .route(
            &format!("{BASE_PATH}/validateSignature"),
            post(validate_signature),
        )
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn validate_sig_pdfa(
    State(state): State<AppState>,
    Json(request): Json<Option<DataToValidate>>,
) -> Result<Json<Reports>, ApiError> {
    run_blocking(state, request, |o, r| o.validate(r)).await
}

async fn validate_signature(
    State(state): State<AppState>,
    Json(request): Json<Option<DataToValidate>>,
) -> Result<Json<Reports>, ApiError> {
    run_blocking(state, request, |o, r| o.validate_signature(r)).await
}

/// Validation parses whole documents; keep it off the async workers.
async fn run_blocking<F>(
    state: AppState,
    request: Option<DataToValidate>,
    op: F,
) -> Result<Json<Reports>, ApiError>
where
    F: FnOnce(&ValidationOrchestrator, Option<&DataToValidate>) -> crate::Result<Reports>
        + Send
        + 'static,
{
    let orchestrator = Arc::clone(&state.orchestrator);
    let reports = tokio::task::spawn_blocking(move || op(&orchestrator, request.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("validation task failed: {e}")))??;
    Ok(Json(reports))
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_message: String,
}

impl ApiError {
    /// - Document or policy problems: 422 Unprocessable Entity
    /// - I/O and task failures: 500 Internal Server Error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(
                ValidationError::ParseError(_)
                | ValidationError::UnsupportedFormat(_)
                | ValidationError::InvalidDocument(_)
                | ValidationError::InvalidPolicy(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Validation(ValidationError::IoError(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal details stay in the log.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "validation request failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error = %self, "validation request rejected");
            self.to_string()
        };
        (
            status,
            Json(ErrorBody {
                error_message: message,
            }),
        )
            .into_response()
    }
}
