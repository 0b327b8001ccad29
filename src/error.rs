use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error type shared by services and handlers.
///
/// Every variant maps to one HTTP status in [`IntoResponse`]; storage and
/// render failures are logged before the response is produced.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required form or query field was absent or blank.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The referenced directory id does not exist.
    #[error("item {0} not found in pantry directory")]
    UnknownItem(i64),

    #[error("no plan found for week {0}")]
    WeekNotFound(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("storage unavailable: {0:#}")]
    StorageUnavailable(#[from] anyhow::Error),

    #[error("render failed: {0:#}")]
    Render(anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MissingParameter(_) => (StatusCode::BAD_REQUEST, "MISSING_PARAMETER"),
            AppError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            AppError::UnknownItem(_) => (StatusCode::NOT_FOUND, "UNKNOWN_ITEM"),
            AppError::WeekNotFound(_) => (StatusCode::NOT_FOUND, "WEEK_NOT_FOUND"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_FAILED"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            AppError::StorageUnavailable(e) => {
                tracing::error!(error = %format!("{e:#}"), "storage failure");
                "storage is unavailable, try again".to_string()
            }
            AppError::Render(e) => {
                tracing::error!(error = %format!("{e:#}"), "render failure");
                "document could not be rendered".to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// Form fields arrive as optional strings; blank counts as missing. The
/// value itself is returned as sent.
pub fn required(value: Option<String>, name: &'static str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingParameter(name)),
    }
}

pub fn required_i64(value: Option<String>, name: &'static str) -> AppResult<i64> {
    let raw = required(value, name)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid(name, format!("{raw:?} is not an integer")))
}
