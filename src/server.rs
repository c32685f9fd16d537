//! HTTP surface for the export pipeline.
//!
//! Three `POST` endpoints, one per document format, all sharing the same
//! request body: `{ "data": [ {col: value, ...}, ... ], "title": "..." }`.
//! Validation failures come back as plain-text 400s; encoder failures are
//! logged server-side and surfaced as a generic plain-text 500.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::export::{self, content_disposition, ExportFormat, ExportRequest};

/// Router exposing one export endpoint per document format.
pub fn router() -> Router {
    Router::new()
        .route("/export/excel", post(export_excel))
        .route("/export/pdf", post(export_pdf))
        .route("/export/word", post(export_word))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn export_excel(Json(request): Json<ExportRequest>) -> Response {
    export_response(request, ExportFormat::Xlsx)
}

async fn export_pdf(Json(request): Json<ExportRequest>) -> Response {
    export_response(request, ExportFormat::Pdf)
}

async fn export_word(Json(request): Json<ExportRequest>) -> Response {
    export_response(request, ExportFormat::Docx)
}

/// Shared handler body: validate, encode, wrap as a file download.
fn export_response(request: ExportRequest, format: ExportFormat) -> Response {
    let table = match request.into_table(format) {
        Ok(table) => table,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    match export::encode(&table, format) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(table.filename_stem(), format),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            // Encoder detail stays in the server log, never in the body.
            tracing::error!(%err, format = format.label(), "document export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to export {} file.", format.label()),
            )
                .into_response()
        }
    }
}
