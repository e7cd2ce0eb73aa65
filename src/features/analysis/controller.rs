//! Analysis Controller
//!
//! Follow-up analyses of the stored calculation results.

use serde_json::Value;

use crate::app::entities::AppEntities;
use crate::domain::analysis::{AnalysisRequest, AnalysisType};
use crate::error::{Error, Result};
use crate::features::surface_error;
use crate::i18n::tr;

/// Analysis page controller
pub struct AnalysisController {
    entities: AppEntities,
}

impl AnalysisController {
    /// Create a new controller
    pub fn new(entities: AppEntities) -> Self {
        Self { entities }
    }

    /// Request body for the current project and results
    fn request(&self, analysis_type: AnalysisType) -> Result<AnalysisRequest> {
        let results = self.entities.calculation.read().results().cloned();
        let Some(calculation_results) = results else {
            self.entities.notify_error(tr("analysis.no_results"));
            return Err(Error::Invalid {
                message: tr("analysis.no_results"),
            });
        };

        Ok(AnalysisRequest {
            project_data: self.entities.project.read().current_project_data(),
            calculation_results,
            analysis_type,
        })
    }

    /// Extended economic analysis, stored with any charts it carries
    pub async fn extended_analysis(&self) -> Result<Value> {
        let request = self.request(AnalysisType::Extended)?;
        let response = match self.entities.api.generate_analysis(&request).await {
            Ok(response) => response,
            Err(e) => return Err(surface_error(&self.entities, "generate_analysis", e)),
        };

        let analysis = Value::Object(response.analysis_data);
        let mut calc = self.entities.calculation.write();
        calc.set_extended_analysis(analysis.clone());
        if let Some(charts) = response.charts {
            calc.set_chart_data(
                charts
                    .iter()
                    .filter_map(|c| serde_json::to_value(c).ok())
                    .collect(),
            );
        }
        Ok(analysis)
    }

    /// Chart series for the analysis page, stored as a list
    pub async fn charts(&self) -> Result<usize> {
        let request = self.request(AnalysisType::Charts)?;
        let response = match self.entities.api.generate_charts(&request).await {
            Ok(response) => response,
            Err(e) => return Err(surface_error(&self.entities, "generate_charts", e)),
        };

        let charts = response.into_chart_list();
        let count = charts.len();
        self.entities.calculation.write().set_chart_data(charts);
        Ok(count)
    }

    /// CO2 balance of the project; not stored
    pub async fn co2(&self) -> Result<Value> {
        let request = self.request(AnalysisType::Co2)?;
        match self.entities.api.calculate_co2_analysis(&request).await {
            Ok(response) => Ok(response.co2_analysis),
            Err(e) => Err(surface_error(&self.entities, "calculate_co2_analysis", e)),
        }
    }

    /// Sensitivity of the key figures to input changes; not stored
    pub async fn sensitivity(&self) -> Result<Value> {
        let request = self.request(AnalysisType::Sensitivity)?;
        match self.entities.api.calculate_sensitivity(&request).await {
            Ok(response) => Ok(response.sensitivity_analysis),
            Err(e) => Err(surface_error(&self.entities, "calculate_sensitivity", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::entities::test_support::entities_for;
    use crate::domain::calculation::CalculationResults;
    use crate::services::test_server::{Canned, TestServer};

    fn with_results(entities: &AppEntities) {
        entities.calculation.write().set_results(CalculationResults {
            total_investment_brutto: Some(20000.0),
            ..CalculationResults::default()
        });
    }

    #[tokio::test]
    async fn requires_results() {
        let entities = entities_for("http://127.0.0.1:9");
        let err = AnalysisController::new(entities.clone())
            .charts()
            .await
            .expect_err("no results");
        assert!(matches!(err, Error::Invalid { .. }));
        assert_eq!(entities.status.snackbar().message, tr("analysis.no_results"));
    }

    #[tokio::test]
    async fn extended_analysis_is_stored() {
        let server = TestServer::sequence(vec![Canned::json(
            200,
            r#"{"analysis_data": {"npv_20_years": 8450.0},
                "charts": [{"chart_type": "line", "title": "Amortisation", "data": [1, 2]}],
                "status": "success", "analysis_type": "extended"}"#,
        )])
        .await;
        let entities = entities_for(&server.base_url());
        with_results(&entities);

        let analysis = AnalysisController::new(entities.clone())
            .extended_analysis()
            .await
            .expect("analysis");
        assert_eq!(analysis["npv_20_years"], 8450.0);

        let request = server.request().await;
        assert_eq!(request.line(), "POST /api/analysis");
        assert!(request.body_text().contains("\"analysis_type\":\"extended\""));

        let calc = entities.calculation.read();
        assert_eq!(calc.extended_analysis(), Some(&analysis));
        assert_eq!(calc.chart_data().len(), 1);
        assert_eq!(calc.chart_data()[0]["title"], "Amortisation");
    }

    #[tokio::test]
    async fn fallback_charts_are_normalized() {
        let server = TestServer::sequence(vec![Canned::json(
            200,
            r#"{"charts": {"monthly_production": [], "cashflow": []},
                "status": "fallback", "error": "Matplotlib fehlt"}"#,
        )])
        .await;
        let entities = entities_for(&server.base_url());
        with_results(&entities);

        let count = AnalysisController::new(entities.clone())
            .charts()
            .await
            .expect("charts");
        assert_eq!(count, 2);
        assert!(
            entities
                .calculation
                .read()
                .chart_data()
                .iter()
                .all(|c| c.get("chart_type").is_some())
        );
    }

    #[tokio::test]
    async fn co2_and_sensitivity_pass_through() {
        let server = TestServer::sequence(vec![
            Canned::json(200, r#"{"co2_analysis": {"trees": 120}, "status": "success"}"#),
            Canned::json(
                200,
                r#"{"sensitivity_analysis": {"strompreis": [1, 2]}, "status": "success"}"#,
            ),
        ])
        .await;
        let entities = entities_for(&server.base_url());
        with_results(&entities);
        let controller = AnalysisController::new(entities);

        assert_eq!(controller.co2().await.expect("co2")["trees"], 120);
        assert_eq!(server.request().await.line(), "POST /api/co2_analysis");
        let sensitivity = controller.sensitivity().await.expect("sensitivity");
        assert!(sensitivity.get("strompreis").is_some());
        assert_eq!(
            server.request().await.line(),
            "POST /api/sensitivity_analysis"
        );
    }
}
