//! Project - Customer, PV, heat-pump and project metadata records
//!
//! Mirrors the backend's project payload. Defaults are the values a fresh
//! input form starts with.

use serde::{Deserialize, Serialize};

/// Which offer blocks a project carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Photovoltaic only
    #[default]
    Pv,
    /// Heat pump only
    Hp,
    /// PV and heat pump
    Combined,
}

impl ProjectType {
    /// Whether the PV block is meaningful for this type
    pub fn includes_pv(self) -> bool {
        self != ProjectType::Hp
    }

    /// Whether the heat-pump block is meaningful for this type
    pub fn includes_hp(self) -> bool {
        self != ProjectType::Pv
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Pv => "pv",
            ProjectType::Hp => "hp",
            ProjectType::Combined => "combined",
        }
    }
}

/// Contact details of a prospect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Default for CustomerData {
    fn default() -> Self {
        Self {
            customer_id: None,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: Some(String::new()),
            address: Some(String::new()),
            city: Some(String::new()),
            postal_code: Some(String::new()),
        }
    }
}

impl CustomerData {
    /// First name, last name and email are all present
    pub fn is_complete(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty() && !self.email.is_empty()
    }
}

/// Photovoltaic system sizing inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvDetails {
    pub anlage_kwp: f64,
    pub annual_consumption_kwh: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_kwh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_tilt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverter_type: Option<String>,
}

impl Default for PvDetails {
    fn default() -> Self {
        Self {
            anlage_kwp: 10.0,
            annual_consumption_kwh: 4000.0,
            storage_kwh: Some(0.0),
            roof_orientation: Some("Süd".to_string()),
            roof_tilt: Some(30.0),
            location: Some("Deutschland".to_string()),
            location_lat: None,
            location_lon: None,
            module_type: None,
            inverter_type: None,
        }
    }
}

impl PvDetails {
    /// Both sizing inputs are positive
    pub fn is_sized(&self) -> bool {
        self.anlage_kwp > 0.0 && self.annual_consumption_kwh > 0.0
    }
}

/// Heat-pump sizing inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HpDetails {
    pub heat_demand_kwh: f64,
    pub hp_power_kw: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cop_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_heating: Option<String>,
}

impl Default for HpDetails {
    fn default() -> Self {
        Self {
            heat_demand_kwh: 15000.0,
            hp_power_kw: 8.0,
            cop_value: Some(4.0),
            hp_type: Some("Luft-Wasser".to_string()),
            installation_type: Some("Außenaufstellung".to_string()),
            existing_heating: None,
        }
    }
}

impl HpDetails {
    /// Both sizing inputs are positive
    pub fn is_sized(&self) -> bool {
        self.heat_demand_kwh > 0.0 && self.hp_power_kw > 0.0
    }
}

/// Project metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for ProjectDetails {
    fn default() -> Self {
        Self {
            project_id: None,
            project_name: String::new(),
            project_type: ProjectType::Pv,
            status: Some("active".to_string()),
            created_at: None,
            notes: Some(String::new()),
        }
    }
}

/// Aggregate persisted to and loaded from the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectData {
    pub customer_data: CustomerData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_details: Option<PvDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_details: Option<HpDetails>,
    pub project_details: ProjectDetails,
}

/// Response of `POST /project`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSaved {
    pub project_id: i64,
    pub message: String,
}
