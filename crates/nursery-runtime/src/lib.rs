#![deny(warnings)]

//! Projection engine: validates a scenario and runs the cost, yield and
//! financial stages, then applies the scenario's risk event.
//!
//! The engine holds no state between evaluations and can be shared freely
//! across threads.

pub mod timeline;

use chrono::NaiveDate;
use nursery_core::{validate_scenario, ConfigurationError, RiskScenario, ScenarioInput};
use nursery_econ::{apply_risk, compute_costs, compute_yield, AdjustedResult, Baseline};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use timeline::{
    payback_date, ProfitTimeline, TimelinePoint, DEFAULT_HORIZON_YEARS, MAX_HORIZON_YEARS,
};

/// Presentation-independent knobs of an evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Years covered by the profit timelines, from 1 to [`MAX_HORIZON_YEARS`].
    pub horizon_years: u32,
    /// First day of operation, used to date the payback.
    pub start_date: Option<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_years: DEFAULT_HORIZON_YEARS,
            start_date: None,
        }
    }
}

/// Everything a presentation layer needs to render one scenario.
///
/// Amounts serialize as decimal strings (`"527800.00"`), the default
/// `rust_decimal` representation, so no precision is lost in JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scenario: ScenarioInput,
    pub baseline: Baseline,
    /// Base projection with `scenario.risk` applied.
    pub adjusted: AdjustedResult,
    pub timeline: ProfitTimeline,
    pub adjusted_timeline: ProfitTimeline,
    /// Set when a start date is configured and the base ROI is defined.
    pub payback_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default)]
pub struct ProjectionEngine {
    config: EngineConfig,
}

impl ProjectionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn horizon(&self) -> Result<u32, ConfigurationError> {
        let years = self.config.horizon_years;
        if years == 0 || years > MAX_HORIZON_YEARS {
            return Err(ConfigurationError::HorizonOutOfRange {
                years,
                max: MAX_HORIZON_YEARS,
            });
        }
        Ok(years)
    }

    /// Validate `input` and compute its unadjusted projection.
    pub fn baseline(&self, input: &ScenarioInput) -> Result<Baseline, ConfigurationError> {
        validate_scenario(input)?;
        let costs = compute_costs(input)?;
        let yields = compute_yield(input)?;
        Baseline::new(costs, yields, input.price_per_seedling_usd)
    }

    /// Full evaluation of one scenario.
    pub fn evaluate(&self, input: &ScenarioInput) -> Result<Evaluation, ConfigurationError> {
        let years = self.horizon()?;
        let baseline = self.baseline(input)?;
        let adjusted = apply_risk(&baseline, input.risk);
        let setup = baseline.financials.setup_cost_usd;
        let timeline = ProfitTimeline::project(baseline.financials.annual.profit_usd, setup, years);
        let adjusted_timeline = ProfitTimeline::project(adjusted.annual.profit_usd, setup, years);
        let payback = self
            .config
            .start_date
            .and_then(|start| payback_date(start, baseline.financials.roi_years));

        info!(
            risk = ?input.risk,
            profit = %baseline.financials.annual.profit_usd,
            adjusted_profit = %adjusted.annual.profit_usd,
            roi = %baseline.financials.roi_label(),
            "evaluated scenario"
        );
        Ok(Evaluation {
            scenario: input.clone(),
            baseline,
            adjusted,
            timeline,
            adjusted_timeline,
            payback_date: payback,
        })
    }

    /// Adjusted results for every risk scenario, each derived from the same base.
    pub fn stress_test(
        &self,
        input: &ScenarioInput,
    ) -> Result<Vec<AdjustedResult>, ConfigurationError> {
        let baseline = self.baseline(input)?;
        let results: Vec<AdjustedResult> = RiskScenario::ALL
            .into_iter()
            .map(|scenario| apply_risk(&baseline, scenario))
            .collect();
        debug!(scenarios = results.len(), "stress test complete");
        Ok(results)
    }
}
