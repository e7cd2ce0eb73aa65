//! PDF - Offer document generation requests and task tracking

use serde::{Deserialize, Serialize};

use super::calculation::CalculationResults;
use super::project::ProjectData;

/// Offer flavour rendered by the PDF service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    #[default]
    Pv,
    Hp,
}

/// Rendering options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_main_template: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append_additional_pages: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_charts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_technical_details: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_economic_analysis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_style: Option<String>,
}

/// Body of `POST /generate_pdf`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfGenerationRequest {
    pub project_data: ProjectData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_results: Option<CalculationResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_options: Option<PdfOptions>,
    pub offer_type: OfferType,
}

/// Response of `POST /generate_pdf`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfGenerationResponse {
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<f64>,
}

/// Lifecycle of a background PDF task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Started,
    Progress,
    Success,
    Failure,
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// No further status changes are expected
    pub fn is_finished(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failure)
    }
}

/// Response of `GET /task_status/{task_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfStatusResponse {
    pub task_id: String,
    pub status: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `POST /generate_multi_pdf`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStarted {
    pub task_id: String,
    pub status: String,
}
