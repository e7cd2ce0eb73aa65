//! CalculationState - Latest Results, Live Pricing and Scenarios

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::domain::calculation::{
    CalculationResults, KeyFigure, LivePricing, LivePricingUpdate, Scenarios,
};
use crate::eventing::{AppEvent, EventSink};
use crate::i18n::{Locale, current_locale, tr_in};

/// Calculation results store
#[derive(Debug, Clone, Default)]
pub struct CalculationState {
    results: Option<CalculationResults>,
    is_calculating: bool,
    last_calculation_time: Option<DateTime<Local>>,
    errors: Vec<String>,
    warnings: Vec<String>,
    live_pricing: LivePricing,
    scenarios: Scenarios,
    extended_analysis: Option<Value>,
    chart_data: Vec<Value>,
    events: EventSink,
}

impl CalculationState {
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn results(&self) -> Option<&CalculationResults> {
        self.results.as_ref()
    }

    pub fn is_calculating(&self) -> bool {
        self.is_calculating
    }

    pub fn last_calculation_time(&self) -> Option<DateTime<Local>> {
        self.last_calculation_time
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn live_pricing(&self) -> LivePricing {
        self.live_pricing
    }

    pub fn scenarios(&self) -> &Scenarios {
        &self.scenarios
    }

    pub fn extended_analysis(&self) -> Option<&Value> {
        self.extended_analysis.as_ref()
    }

    pub fn chart_data(&self) -> &[Value] {
        &self.chart_data
    }

    // Derived KPIs, zero when not computed

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }

    fn kpi(&self, pick: impl Fn(&CalculationResults) -> Option<f64>) -> f64 {
        self.results.as_ref().and_then(pick).unwrap_or(0.0)
    }

    pub fn total_investment(&self) -> f64 {
        self.kpi(|r| r.total_investment_brutto)
    }

    pub fn annual_savings(&self) -> f64 {
        self.kpi(|r| r.annual_savings)
    }

    pub fn payback_time(&self) -> f64 {
        self.kpi(|r| r.payback_time_years)
    }

    pub fn system_size(&self) -> f64 {
        self.kpi(|r| r.anlage_kwp)
    }

    pub fn annual_production(&self) -> f64 {
        self.kpi(|r| r.annual_pv_production_kwh)
    }

    pub fn self_consumption_rate(&self) -> f64 {
        self.kpi(|r| r.self_consumption_rate)
    }

    pub fn autarky_rate(&self) -> f64 {
        self.kpi(|r| r.autarky_rate)
    }

    pub fn co2_savings(&self) -> f64 {
        self.kpi(|r| r.co2_savings_kg_per_year)
    }

    /// Results present, positive investment, no errors
    pub fn is_calculation_valid(&self) -> bool {
        self.has_results() && self.total_investment() > 0.0 && self.errors.is_empty()
    }

    /// Dashboard KPIs in the current locale
    pub fn key_figures(&self) -> Vec<KeyFigure> {
        self.key_figures_in(current_locale())
    }

    /// Dashboard KPIs in fixed order; empty without results
    pub fn key_figures_in(&self, locale: Locale) -> Vec<KeyFigure> {
        if !self.has_results() {
            return Vec::new();
        }

        let figure = |key: &str,
                      value: f64,
                      unit: String,
                      icon: &'static str,
                      color: &'static str| KeyFigure {
            title: tr_in(locale, &format!("key_figures.{key}")),
            value,
            unit,
            icon,
            color,
        };

        vec![
            figure("system_size", self.system_size(), "kWp".into(), "mdi-solar-panel", "solar"),
            figure(
                "annual_production",
                self.annual_production(),
                "kWh".into(),
                "mdi-lightning-bolt",
                "warning",
            ),
            figure("investment", self.total_investment(), "€".into(), "mdi-currency-eur", "primary"),
            figure("annual_savings", self.annual_savings(), "€".into(), "mdi-piggy-bank", "success"),
            figure(
                "payback",
                self.payback_time(),
                tr_in(locale, "units.years"),
                "mdi-calendar-clock",
                "info",
            ),
            figure(
                "self_consumption",
                self.self_consumption_rate(),
                "%".into(),
                "mdi-home-lightning-bolt",
                "orange",
            ),
            figure("autarky", self.autarky_rate(), "%".into(), "mdi-battery-charging", "green"),
            figure(
                "co2_savings",
                self.co2_savings(),
                tr_in(locale, "units.kg_per_year"),
                "mdi-leaf",
                "success",
            ),
        ]
    }

    /// Store new results and seed the price preview from the gross investment
    pub fn set_results(&mut self, results: CalculationResults) {
        if let Some(brutto) = results.total_investment_brutto.filter(|v| *v != 0.0) {
            self.live_pricing.base_cost = brutto;
            self.live_pricing.final_price = brutto;
        }
        self.results = Some(results);
        self.last_calculation_time = Some(Local::now());
        self.events.emit(AppEvent::ResultsUpdated);
    }

    /// Entering the calculating state clears previous errors and warnings
    pub fn set_calculating(&mut self, calculating: bool) {
        self.is_calculating = calculating;
        if calculating {
            self.errors.clear();
            self.warnings.clear();
        }
    }

    pub fn set_errors(&mut self, errors: Vec<String>) {
        self.errors = errors;
    }

    pub fn set_warnings(&mut self, warnings: Vec<String>) {
        self.warnings = warnings;
    }

    pub fn update_live_pricing(&mut self, update: &LivePricingUpdate) {
        self.live_pricing.merge(update);
        self.events.emit(AppEvent::ResultsUpdated);
    }

    pub fn set_scenarios(&mut self, scenarios: Scenarios) {
        self.scenarios = scenarios;
        self.events.emit(AppEvent::ResultsUpdated);
    }

    pub fn set_extended_analysis(&mut self, analysis: Value) {
        self.extended_analysis = Some(analysis);
        self.events.emit(AppEvent::ResultsUpdated);
    }

    pub fn set_chart_data(&mut self, charts: Vec<Value>) {
        self.chart_data = charts;
        self.events.emit(AppEvent::ResultsUpdated);
    }

    /// Forget everything, including the price preview
    pub fn clear_results(&mut self) {
        self.results = None;
        self.last_calculation_time = None;
        self.errors.clear();
        self.warnings.clear();
        self.scenarios = Scenarios::default();
        self.extended_analysis = None;
        self.chart_data.clear();
        self.live_pricing = LivePricing::default();
        self.events.emit(AppEvent::ResultsUpdated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CalculationResults {
        CalculationResults {
            anlage_kwp: Some(9.8),
            annual_pv_production_kwh: Some(9310.0),
            total_investment_brutto: Some(18_500.0),
            annual_savings: Some(1_450.0),
            payback_time_years: Some(12.8),
            self_consumption_rate: Some(32.5),
            autarky_rate: Some(61.0),
            co2_savings_kg_per_year: Some(3_720.0),
            ..CalculationResults::default()
        }
    }

    #[test]
    fn set_calculating_clears_messages() {
        let mut state = CalculationState::default();
        state.set_errors(vec!["Dach zu klein".into()]);
        state.set_warnings(vec!["Verschattung".into()]);

        state.set_calculating(true);
        assert!(state.is_calculating());
        assert!(state.errors().is_empty());
        assert!(state.warnings().is_empty());

        state.set_errors(vec!["x".into()]);
        state.set_calculating(false);
        assert_eq!(state.errors(), ["x".to_string()]);
    }

    #[test]
    fn set_results_seeds_live_pricing() {
        let mut state = CalculationState::default();
        state.update_live_pricing(&LivePricingUpdate {
            total_discounts: Some(200.0),
            ..LivePricingUpdate::default()
        });
        state.set_results(CalculationResults {
            total_investment_brutto: Some(12345.0),
            ..CalculationResults::default()
        });

        let pricing = state.live_pricing();
        assert_eq!(pricing.base_cost, 12345.0);
        assert_eq!(pricing.final_price, 12345.0);
        assert_eq!(pricing.total_discounts, 200.0);
        assert!(state.last_calculation_time().is_some());
    }

    #[test]
    fn zero_investment_leaves_pricing_alone() {
        let mut state = CalculationState::default();
        state.update_live_pricing(&LivePricingUpdate {
            base_cost: Some(500.0),
            final_price: Some(450.0),
            ..LivePricingUpdate::default()
        });
        state.set_results(CalculationResults {
            total_investment_brutto: Some(0.0),
            ..CalculationResults::default()
        });
        assert_eq!(state.live_pricing().base_cost, 500.0);
        assert_eq!(state.live_pricing().final_price, 450.0);
    }

    #[test]
    fn derived_values_default_to_zero() {
        let state = CalculationState::default();
        assert!(!state.has_results());
        assert_eq!(state.total_investment(), 0.0);
        assert_eq!(state.co2_savings(), 0.0);
        assert!(state.key_figures_in(Locale::De).is_empty());
    }

    #[test]
    fn validity_requires_investment_and_no_errors() {
        let mut state = CalculationState::default();
        assert!(!state.is_calculation_valid());

        state.set_results(sample());
        assert!(state.is_calculation_valid());

        state.set_errors(vec!["Fehler".into()]);
        assert!(!state.is_calculation_valid());

        state.set_errors(Vec::new());
        state.set_results(CalculationResults::default());
        assert!(!state.is_calculation_valid());
    }

    #[test]
    fn key_figures_follow_fixed_order() {
        let mut state = CalculationState::default();
        state.set_results(sample());

        let figures = state.key_figures_in(Locale::De);
        let titles: Vec<&str> = figures.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Anlagengröße",
                "Jahresproduktion",
                "Investition",
                "Jährl. Einsparung",
                "Amortisation",
                "Eigenverbrauch",
                "Autarkiegrad",
                "CO₂-Einsparung",
            ]
        );
        let units: Vec<&str> = figures.iter().map(|f| f.unit.as_str()).collect();
        assert_eq!(units, ["kWp", "kWh", "€", "€", "Jahre", "%", "%", "kg/Jahr"]);
        assert_eq!(figures[0].icon, "mdi-solar-panel");
        assert_eq!(figures[0].value, 9.8);
        assert_eq!(figures[2].value, 18_500.0);
        assert_eq!(figures[7].color, "success");
    }

    #[test]
    fn clear_results_resets_everything() {
        let (events, rx) = EventSink::channel();
        let mut state = CalculationState::default().with_events(events);
        state.set_results(sample());
        state.set_extended_analysis(json!({"npv": 1}));
        state.set_chart_data(vec![json!({"chart_type": "bar"})]);
        state.set_scenarios(Scenarios {
            base: Some(sample()),
            ..Scenarios::default()
        });

        state.clear_results();
        assert!(!state.has_results());
        assert!(state.last_calculation_time().is_none());
        assert!(state.extended_analysis().is_none());
        assert!(state.chart_data().is_empty());
        assert!(state.scenarios().is_empty());
        assert_eq!(state.live_pricing(), LivePricing::default());
        assert!(rx.try_iter().all(|e| e == AppEvent::ResultsUpdated));
    }
}
