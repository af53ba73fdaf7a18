//! Export service
//!
//! Renders transcript records into downloadable documents.

use consult_core::RenderedDocument;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::ExportDocumentRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Room label used when the export request names no room
const UNKNOWN_ROOM: &str = "unknown";

/// Export service
pub struct ExportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Render a transcript record to a file
    #[instrument(skip(self, request))]
    pub async fn export_document(&self, request: ExportDocumentRequest) -> ServiceResult<RenderedDocument> {
        request.validate()?;
        if request.transcript_data.is_null() {
            return Err(ServiceError::validation("Transcript data is required"));
        }

        let room_id = request
            .room_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(UNKNOWN_ROOM);

        let document = self
            .ctx
            .call_collaborator(
                "document rendering",
                self.ctx.documents().render(&request.transcript_data, room_id),
            )
            .await?;

        info!(room_id = %room_id, file = %document.file_name, "Document exported");
        Ok(document)
    }
}
