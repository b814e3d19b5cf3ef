#![deny(warnings)]

//! Economic models for the nursery projection engine.
//!
//! The pipeline is split into three pure stages:
//! - [`cost`]: one-time setup cost and recurring operating cost
//! - [`yields`]: planted and sellable seedlings per category
//! - [`financial`]: revenue, profit and ROI, with [`risk`] adjustments applied
//!   to a base result

pub mod cost;
pub mod financial;
pub mod risk;
pub mod yields;

pub use cost::{compute_costs, CostFigures};
pub use financial::{
    compute_financials, percent_change, roi_years, Baseline, FinancialResult, PeriodFigures,
};
pub use risk::{apply_risk, AdjustedResult};
pub use yields::{compute_yield, planted_required, YieldFigures};

#[cfg(test)]
pub(crate) mod fixtures {
    use nursery_core::*;
    use rust_decimal::Decimal;

    /// Tray-sized nursery with a shared three-month cycle.
    pub fn tray_scenario() -> ScenarioInput {
        ScenarioInput {
            setup: SetupCosts {
                greenhouse_usd: Decimal::new(3000, 0),
                irrigation_usd: Decimal::new(2500, 0),
                tools_usd: Decimal::new(2000, 0),
            },
            labor_cost_per_month_usd: Decimal::new(750, 0),
            timing: CycleTiming::Uniform {
                months_per_cycle: 3,
                inputs: CycleInputCosts {
                    seed_usd: Decimal::new(1000, 0),
                    medium_usd: Decimal::new(800, 0),
                },
            },
            sizing: YieldSizing::Tray {
                num_trays: 10_000,
                cells_per_tray: 200,
                veg_fraction: Decimal::new(70, 2),
            },
            success_rate: Decimal::new(85, 2),
            price_per_seedling_usd: ByCategory::new(Decimal::new(5, 2), Decimal::new(15, 2)),
            risk: RiskScenario::None,
        }
    }

    /// Directly sized nursery: 4 vegetable cycles and 1 tree cycle per year.
    pub fn direct_scenario() -> ScenarioInput {
        ScenarioInput {
            setup: SetupCosts {
                greenhouse_usd: Decimal::new(300, 0),
                irrigation_usd: Decimal::new(200, 0),
                tools_usd: Decimal::new(200, 0),
            },
            labor_cost_per_month_usd: Decimal::new(150, 0),
            timing: CycleTiming::PerCategory {
                vegetable: CategoryCycle {
                    cycles_per_year: 4,
                    inputs: CycleInputCosts {
                        seed_usd: Decimal::new(100, 0),
                        medium_usd: Decimal::new(100, 0),
                    },
                },
                tree: CategoryCycle {
                    cycles_per_year: 1,
                    inputs: CycleInputCosts {
                        seed_usd: Decimal::new(150, 0),
                        medium_usd: Decimal::new(150, 0),
                    },
                },
            },
            sizing: YieldSizing::Direct {
                veg_seedlings_per_cycle: Decimal::new(10_000, 0),
                tree_target_per_year: Decimal::new(2950, 0),
            },
            success_rate: Decimal::new(85, 2),
            price_per_seedling_usd: ByCategory::new(Decimal::new(15, 2), Decimal::new(450, 2)),
            risk: RiskScenario::None,
        }
    }
}
