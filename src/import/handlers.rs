// HTTP handlers for CSV import and import metrics

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::import::{ImportError, ImportKind, ImportMetrics, ImportSummary};

/// Name of the multipart field carrying the file, matched case-insensitively
pub const FILE_FIELD: &str = "file";

/// Response body of a successful import
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    #[schema(example = "Orders imported successfully.")]
    pub message: String,
    pub metrics: ImportSummary,
    pub duration_ms: u64,
}

fn upload_error(e: MultipartError) -> ImportError {
    ImportError::Upload {
        status: e.status(),
        message: e.body_text(),
    }
}

/// First non-empty file field of the form, if any
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Bytes>, ImportError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        let is_file = field
            .name()
            .map(|name| name.eq_ignore_ascii_case(FILE_FIELD))
            .unwrap_or(false);
        if !is_file {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(upload_error)?;
        if !bytes.is_empty() {
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

/// Handler for POST /api/import/:kind
/// Imports a CSV upload (optionally gzip compressed) into one table
#[utoipa::path(
    post,
    path = "/api/import/{kind}",
    params(
        ("kind" = String, Path, description = "orders, orderdetails, pizzatypes or pizzas")
    ),
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Form with a `File` field holding the CSV file, plain or gzip compressed"
    ),
    responses(
        (status = 200, description = "Import finished; skipped rows are listed in the metrics", body = ImportResponse),
        (status = 400, description = "Missing file or invalid CSV header", body = String, example = json!({"message": "Orders file is required."})),
        (status = 404, description = "Unknown import type", body = String, example = json!({"message": "Unknown import type 'customers'"})),
        (status = 413, description = "Upload larger than the configured limit", body = String),
        (status = 500, description = "Import failed", body = String, example = json!({"message": "Failed to import orders.", "error": "Database error"}))
    ),
    tag = "import"
)]
pub async fn import_csv(
    State(state): State<crate::AppState>,
    Path(kind): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportResponse>, ImportError> {
    let kind: ImportKind = kind.parse()?;

    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Import request without a multipart body: {}", e);
        ImportError::MissingFile(kind.label())
    })?;
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or(ImportError::MissingFile(kind.label()))?;

    let summary = state.imports.import(kind, upload).await?;

    Ok(Json(ImportResponse {
        message: kind.success_message(),
        duration_ms: summary.duration_ms,
        metrics: summary,
    }))
}

/// Handler for GET /api/import/metrics/:kind
/// Returns the outcome of the most recent import of that type
#[utoipa::path(
    get,
    path = "/api/import/metrics/{kind}",
    params(
        ("kind" = String, Path, description = "Import type, case-insensitive")
    ),
    responses(
        (status = 200, description = "Metrics of the last import", body = ImportMetrics),
        (status = 404, description = "No import of that type yet", body = String, example = json!({"message": "No metrics available for 'orders'"}))
    ),
    tag = "import"
)]
pub async fn get_import_metrics(
    State(state): State<crate::AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ImportMetrics>, ImportError> {
    Ok(Json(state.imports.metrics(&kind).await?))
}
