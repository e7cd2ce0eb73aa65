//! Domain - Pure Data Structures mirrored from the backend API
//!
//! These types carry no behavior beyond defaults and small derived checks.

pub mod admin;
pub mod analysis;
pub mod calculation;
pub mod crm;
pub mod pdf;
pub mod project;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Plain acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Acknowledgement carrying a backend-specific result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageWithResult {
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

/// Acknowledgement of a create call, carrying the backend-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    #[serde(
        alias = "product_id",
        alias = "customer_id",
        alias = "project_id",
        alias = "document_id"
    )]
    pub id: i64,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
