//! Calculation - Server-computed KPIs and pricing previews

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::project::{ProjectData, ProjectType};

/// KPIs returned by the calculation service. Absent fields were not computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anlage_kwp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_pv_production_kwh: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_matrix_price_netto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_additional_costs_netto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal_netto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_investment_netto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mwst_summe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_investment_brutto: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payback_time_years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npv_20_years: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_consumption_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autarky_rate: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_savings_kg_per_year: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_in_tariff_ct_per_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_feed_in_revenue: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Map<String, Value>>,
}

/// Body of `POST /calculate` and `POST /scenarios`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub project_data: ProjectData,
    pub calculation_type: ProjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_extended_analysis: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_scenarios: Option<bool>,
}

impl CalculationRequest {
    /// Request a calculation matching the project's own type
    pub fn for_project(project_data: ProjectData) -> Self {
        let calculation_type = project_data.project_details.project_type;
        Self {
            project_data,
            calculation_type,
            include_extended_analysis: None,
            include_scenarios: None,
        }
    }

    pub fn with_extended_analysis(mut self, include: bool) -> Self {
        self.include_extended_analysis = Some(include);
        self
    }

    pub fn with_scenarios(mut self, include: bool) -> Self {
        self.include_scenarios = Some(include);
        self
    }
}

/// Response of `POST /calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub calculation_results: CalculationResults,
    pub status: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub calculation_type: String,
}

/// Response of `POST /calculate_quick`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickCalculation {
    pub quick_results: Value,
    pub status: String,
}

/// Running price preview kept by the client
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LivePricing {
    pub base_cost: f64,
    pub total_discounts: f64,
    pub total_surcharges: f64,
    pub final_price: f64,
}

/// Partial live-pricing update; present fields overwrite the preview.
///
/// Also the wire form returned by the backend, which may carry percentages
/// the client does not keep.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LivePricingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_discounts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_surcharges: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surcharge_percentage: Option<f64>,
}

impl LivePricing {
    /// Merge a partial update into this preview
    pub fn merge(&mut self, update: &LivePricingUpdate) {
        if let Some(v) = update.base_cost {
            self.base_cost = v;
        }
        if let Some(v) = update.total_discounts {
            self.total_discounts = v;
        }
        if let Some(v) = update.total_surcharges {
            self.total_surcharges = v;
        }
        if let Some(v) = update.final_price {
            self.final_price = v;
        }
    }
}

/// Response of `POST /live_pricing`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePricingResponse {
    pub live_pricing: LivePricingUpdate,
    #[serde(default)]
    pub timestamp: String,
}

/// Named scenario variants of the same project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenarios {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<CalculationResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimistic: Option<CalculationResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pessimistic: Option<CalculationResults>,
}

impl Scenarios {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.optimistic.is_none() && self.pessimistic.is_none()
    }
}

/// Response of `POST /scenarios`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenariosResponse {
    pub scenarios: Scenarios,
    pub status: String,
}

/// A KPI packaged for dashboard rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFigure {
    pub title: String,
    pub value: f64,
    pub unit: String,
    pub icon: &'static str,
    pub color: &'static str,
}
