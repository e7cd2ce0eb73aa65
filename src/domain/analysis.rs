//! Analysis - Extended analysis, chart and sensitivity payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::calculation::CalculationResults;
use super::project::ProjectData;

/// Analysis variant requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Standard,
    Extended,
    Co2,
    Charts,
    Sensitivity,
}

/// Body shared by every analysis endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub project_data: ProjectData,
    pub calculation_results: CalculationResults,
    pub analysis_type: AnalysisType,
}

/// Response of `POST /analysis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub analysis_data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<ChartData>>,
    pub status: String,
    #[serde(default)]
    pub analysis_type: String,
}

/// A single chart series set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

/// Response of `POST /charts`
///
/// The backend answers with a list of charts, or with an object keyed by
/// chart name when it falls back to empty series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsResponse {
    pub charts: Value,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartsResponse {
    /// Normalize the chart payload into a list
    pub fn into_chart_list(self) -> Vec<Value> {
        match self.charts {
            Value::Array(items) => items,
            Value::Object(map) => map
                .into_iter()
                .map(|(name, data)| json!({ "chart_type": name, "data": data }))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Response of `POST /co2_analysis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2AnalysisResponse {
    pub co2_analysis: Value,
    pub status: String,
}

/// Response of `POST /sensitivity_analysis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResponse {
    pub sensitivity_analysis: Value,
    pub status: String,
}
