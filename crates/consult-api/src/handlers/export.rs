//! Export handler
//!
//! Renders a transcript record and streams the file back as a download.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use consult_common::AppError;
use consult_service::dto::ExportDocumentRequest;
use consult_service::ExportService;

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Render a consultation record and download it
///
/// POST /api/export/document
pub async fn export_document(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ExportDocumentRequest>,
) -> ApiResult<Response> {
    let service = ExportService::new(state.service_context());
    let document = service.export_document(request).await?;

    let bytes = tokio::fs::read(&document.file_path)
        .await
        .map_err(AppError::Storage)?;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
