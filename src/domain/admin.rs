//! Admin - Company master data, product catalogue and settings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Company master data printed on offers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_id: Option<String>,
}

/// Catalogue entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub specifications: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasheet_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Backend-wide settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_matrix_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_in_tariffs: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_parameters: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_settings: Option<Map<String, Value>>,
}

/// Response of `POST /upload_logo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoUploaded {
    pub message: String,
    pub logo_path: String,
}

/// In-memory file for multipart upload endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, keeping its file name
    pub fn from_path(path: &std::path::Path) -> crate::error::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}
