//! Calculation Controller
//!
//! Runs full, quick, live-pricing and scenario calculations for the edited
//! project and writes the outcome into the calculation store.

use serde_json::Value;
use tracing::{info, warn};

use crate::app::entities::AppEntities;
use crate::domain::calculation::{CalculationRequest, LivePricing, LivePricingUpdate, Scenarios};
use crate::domain::project::ProjectData;
use crate::error::{Error, Result};
use crate::features::surface_error;
use crate::i18n::tr;
use crate::utils::format::{format_currency, format_datetime};

/// Analysis and dashboard controller for calculations
pub struct CalculationController {
    entities: AppEntities,
}

impl CalculationController {
    /// Create a new controller
    pub fn new(entities: AppEntities) -> Self {
        Self { entities }
    }

    /// Current project aggregate, rejected when incomplete
    fn valid_project_data(&self) -> Result<ProjectData> {
        let project = self.entities.project.read();
        if project.is_project_valid() {
            return Ok(project.current_project_data());
        }
        drop(project);
        self.entities.notify_error(tr("project.invalid"));
        Err(Error::Invalid {
            message: tr("project.invalid"),
        })
    }

    /// Full calculation of the edited project
    ///
    /// Returns whether the stored results are valid afterwards. Backend
    /// errors and warnings from the response land in the store.
    pub async fn calculate(&self, include_extended_analysis: bool) -> Result<bool> {
        let data = self.valid_project_data()?;
        let request = CalculationRequest::for_project(data)
            .with_extended_analysis(include_extended_analysis);

        self.entities.calculation.write().set_calculating(true);
        self.entities.status.set_loading(true, tr("calculation.running"));

        let outcome = self.entities.api.calculate_project(&request).await;

        let result = match outcome {
            Ok(response) => {
                let valid = {
                    let mut calc = self.entities.calculation.write();
                    calc.set_results(response.calculation_results);
                    calc.set_errors(response.errors);
                    calc.set_warnings(response.warnings);
                    if let Some(at) = calc.last_calculation_time() {
                        info!(
                            at = %format_datetime(&at),
                            investment = %format_currency(calc.total_investment()),
                            "Calculation finished"
                        );
                    }
                    calc.is_calculation_valid()
                };
                if valid {
                    self.entities.notify_success(tr("calculation.done"));
                } else {
                    warn!("Calculation returned without valid results");
                    self.entities.notify_error(tr("calculation.failed"));
                }
                Ok(valid)
            }
            Err(e) => {
                self.entities
                    .calculation
                    .write()
                    .set_errors(vec![e.to_string()]);
                Err(surface_error(&self.entities, "calculate_project", e))
            }
        };

        self.entities.calculation.write().set_calculating(false);
        self.entities.status.set_loading(false, "");
        result
    }

    /// Rough estimate without touching the stored results
    pub async fn quick(&self) -> Result<Value> {
        let data = self.entities.project.read().current_project_data();
        match self.entities.api.calculate_quick(&data).await {
            Ok(quick) => Ok(quick.quick_results),
            Err(e) => Err(surface_error(&self.entities, "calculate_quick", e)),
        }
    }

    /// Apply discount/surcharge changes to the price preview
    ///
    /// The adjusted preview is sent to the backend and its answer merged
    /// back into the store.
    pub async fn live_pricing(&self, update: LivePricingUpdate) -> Result<LivePricing> {
        let mut pricing = self.entities.calculation.read().live_pricing();
        pricing.merge(&update);

        let response = match self.entities.api.calculate_live_pricing(&pricing).await {
            Ok(response) => response,
            Err(e) => return Err(surface_error(&self.entities, "calculate_live_pricing", e)),
        };

        let mut calc = self.entities.calculation.write();
        calc.update_live_pricing(&response.live_pricing);
        Ok(calc.live_pricing())
    }

    /// Base, optimistic and pessimistic variants of the project
    pub async fn scenarios(&self) -> Result<Scenarios> {
        let data = self.valid_project_data()?;
        let request = CalculationRequest::for_project(data).with_scenarios(true);

        match self.entities.api.calculate_scenarios(&request).await {
            Ok(response) => {
                self.entities
                    .calculation
                    .write()
                    .set_scenarios(response.scenarios.clone());
                Ok(response.scenarios)
            }
            Err(e) => Err(surface_error(&self.entities, "calculate_scenarios", e)),
        }
    }
}
