//! PDF Controller
//!
//! Offer documents are rendered by a backend task: start it, poll its status
//! at a fixed interval, then fetch the bytes.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::app::entities::AppEntities;
use crate::constants::{PDF_POLL_INTERVAL_MS, PDF_POLL_MAX_ATTEMPTS};
use crate::domain::pdf::{
    OfferType, PdfGenerationRequest, PdfGenerationResponse, PdfOptions, PdfStatusResponse,
    TaskState,
};
use crate::error::{Error, Result};
use crate::features::surface_error;
use crate::i18n::tr;
use crate::utils::format::format_bytes;

/// PDF output page controller
pub struct PdfController {
    entities: AppEntities,
    poll_interval: Duration,
    max_attempts: u32,
}

impl PdfController {
    /// Create a new controller
    pub fn new(entities: AppEntities) -> Self {
        Self {
            entities,
            poll_interval: Duration::from_millis(PDF_POLL_INTERVAL_MS),
            max_attempts: PDF_POLL_MAX_ATTEMPTS,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Start rendering an offer for the edited project
    ///
    /// The latest calculation results are included when present.
    pub async fn generate(
        &self,
        offer_type: OfferType,
        options: Option<PdfOptions>,
    ) -> Result<PdfGenerationResponse> {
        let request = PdfGenerationRequest {
            project_data: self.entities.project.read().current_project_data(),
            calculation_results: self.entities.calculation.read().results().cloned(),
            pdf_options: options,
            offer_type,
        };

        match self.entities.api.generate_pdf(&request).await {
            Ok(response) => {
                info!(task_id = %response.task_id, "PDF generation started");
                Ok(response)
            }
            Err(e) => Err(surface_error(&self.entities, "generate_pdf", e)),
        }
    }

    /// Poll the task until it succeeds, fails or the attempts run out
    pub async fn poll_until_done(&self, task_id: &str) -> Result<PdfStatusResponse> {
        for attempt in 1..=self.max_attempts {
            let status = match self.entities.api.get_pdf_status(task_id).await {
                Ok(status) => status,
                Err(e) => return Err(surface_error(&self.entities, "get_pdf_status", e)),
            };
            debug!(task_id, attempt, state = ?status.status, "PDF task status");

            match status.status {
                TaskState::Success => return Ok(status),
                TaskState::Failure => {
                    let message = status
                        .error
                        .clone()
                        .unwrap_or_else(|| tr("pdf.failed"));
                    let err = Error::Task {
                        task_id: task_id.to_string(),
                        message,
                    };
                    return Err(surface_error(&self.entities, "pdf_task", err));
                }
                _ if attempt < self.max_attempts => tokio::time::sleep(self.poll_interval).await,
                _ => {}
            }
        }

        let err = Error::Task {
            task_id: task_id.to_string(),
            message: tr("pdf.timeout"),
        };
        Err(surface_error(&self.entities, "pdf_task", err))
    }

    /// Fetch the rendered document and write it to `path`
    ///
    /// Returns the number of bytes written.
    pub async fn download_to(&self, task_id: &str, path: &Path) -> Result<u64> {
        let bytes = match self.entities.api.download_pdf(task_id).await {
            Ok(bytes) => bytes,
            Err(e) => return Err(surface_error(&self.entities, "download_pdf", e)),
        };

        if let Err(e) = tokio::fs::write(path, &bytes).await {
            return Err(surface_error(&self.entities, "write_pdf", e.into()));
        }

        let size = bytes.len() as u64;
        info!(task_id, path = ?path, size = %format_bytes(size), "PDF saved");
        self.entities.notify_success(tr("pdf.ready"));
        Ok(size)
    }

    /// Generate, wait and download in one go
    pub async fn create_offer(
        &self,
        offer_type: OfferType,
        options: Option<PdfOptions>,
        path: &Path,
    ) -> Result<u64> {
        self.entities.status.set_loading(true, tr("pdf.generating"));
        let result = async {
            let started = self.generate(offer_type, options).await?;
            self.poll_until_done(&started.task_id).await?;
            self.download_to(&started.task_id, path).await
        }
        .await;
        self.entities.status.set_loading(false, "");
        result
    }
}
