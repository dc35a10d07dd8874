use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::import::ImportKind;

/// Error types for CSV import operations
///
/// Row-level problems are never errors; they are reported as skips in the
/// import summary. These variants abort the whole request.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("{0} file is required.")]
    MissingFile(&'static str),

    #[error("Unknown import type '{0}'")]
    UnknownKind(String),

    #[error("CSV header is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid CSV header: {0}")]
    InvalidHeader(String),

    /// Multipart body could not be read; `status` comes from the extractor
    /// so an oversized body stays a 413
    #[error("Invalid upload: {message}")]
    Upload { status: StatusCode, message: String },

    #[error("Failed to read CSV stream: {0}")]
    Stream(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("No metrics available for '{0}'")]
    MetricsNotFound(String),

    /// Server-side failure while importing a specific table
    #[error("{reason}")]
    Failed { kind: ImportKind, reason: String },
}

impl ImportError {
    /// Attach the import type to server-side failures so the response can
    /// name what failed. Client errors pass through unchanged.
    pub fn during(self, kind: ImportKind) -> Self {
        match self {
            ImportError::Stream(_) | ImportError::DatabaseError(_) => ImportError::Failed {
                kind,
                reason: self.to_string(),
            },
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportError::MissingFile(_)
            | ImportError::MissingColumns(_)
            | ImportError::InvalidHeader(_) => StatusCode::BAD_REQUEST,
            ImportError::Upload { status, .. } => *status,
            ImportError::UnknownKind(_) | ImportError::MetricsNotFound(_) => StatusCode::NOT_FOUND,
            ImportError::Stream(_)
            | ImportError::DatabaseError(_)
            | ImportError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ImportError::Failed { kind, reason } => {
                tracing::error!("Import of {} failed: {}", kind, reason);
                json!({
                    "message": kind.failure_message(),
                    "error": reason,
                })
            }
            ImportError::Stream(_) | ImportError::DatabaseError(_) => {
                tracing::error!("Import failed: {}", self);
                json!({
                    "message": "Failed to import data.",
                    "error": self.to_string(),
                })
            }
            _ => json!({
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
