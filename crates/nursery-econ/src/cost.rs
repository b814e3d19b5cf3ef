//! Setup and operating cost model.

use nursery_core::{
    validate_costs, ByCategory, ConfigurationError, CycleTiming, ScenarioInput, MONTHS_PER_YEAR,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cost side of a projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostFigures {
    /// One-time capital cost in USD.
    pub setup_cost_usd: Decimal,
    /// Production cycles per year by category.
    pub cycles_per_year: ByCategory<u32>,
    /// Operating cost of one shared cycle. Only defined for uniform timing,
    /// where every category runs on the same cycle.
    pub opex_per_cycle_usd: Option<Decimal>,
    /// Labour over the full year.
    pub labor_per_year_usd: Decimal,
    /// Seed and growing medium over the full year.
    pub inputs_per_year_usd: Decimal,
    /// Total operating cost over the full year.
    pub opex_per_year_usd: Decimal,
}

/// Derive setup and operating costs from the raw cost inputs.
///
/// Uniform timing charges labour per cycle:
/// `opex_per_cycle = labour * months_per_cycle + seed + medium`, and the year
/// holds `12 / months_per_cycle` cycles exactly.
///
/// Per-category timing charges each category's consumables per cycle and
/// adds a full year of labour on top.
pub fn compute_costs(input: &ScenarioInput) -> Result<CostFigures, ConfigurationError> {
    validate_costs(input)?;

    let setup_cost_usd = input.setup.total();
    let labor = input.labor_cost_per_month_usd;
    let cycles_per_year = input.timing.cycles_per_year();

    let figures = match &input.timing {
        CycleTiming::Uniform {
            months_per_cycle,
            inputs,
        } => {
            let cycles = Decimal::from(cycles_per_year.vegetable);
            let labor_per_cycle = labor * Decimal::from(*months_per_cycle);
            let per_cycle = labor_per_cycle + inputs.total();
            CostFigures {
                setup_cost_usd,
                cycles_per_year,
                opex_per_cycle_usd: Some(per_cycle),
                labor_per_year_usd: labor_per_cycle * cycles,
                inputs_per_year_usd: inputs.total() * cycles,
                opex_per_year_usd: per_cycle * cycles,
            }
        }
        CycleTiming::PerCategory { vegetable, tree } => {
            let inputs_per_year_usd = vegetable.inputs.total()
                * Decimal::from(vegetable.cycles_per_year)
                + tree.inputs.total() * Decimal::from(tree.cycles_per_year);
            let labor_per_year_usd = labor * Decimal::from(MONTHS_PER_YEAR);
            CostFigures {
                setup_cost_usd,
                cycles_per_year,
                opex_per_cycle_usd: None,
                labor_per_year_usd,
                inputs_per_year_usd,
                opex_per_year_usd: inputs_per_year_usd + labor_per_year_usd,
            }
        }
    };

    debug!(
        setup = %figures.setup_cost_usd,
        opex_per_cycle = ?figures.opex_per_cycle_usd,
        opex_per_year = %figures.opex_per_year_usd,
        "computed costs"
    );
    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{direct_scenario, tray_scenario};
    use nursery_core::{CycleInputCosts, RiskScenario};
    use proptest::prelude::*;

    #[test]
    fn uniform_cycle_costs() {
        let c = compute_costs(&tray_scenario()).unwrap();
        assert_eq!(c.setup_cost_usd, Decimal::new(7500, 0));
        assert_eq!(c.opex_per_cycle_usd, Some(Decimal::new(4050, 0)));
        assert_eq!(c.cycles_per_year, ByCategory::new(4, 4));
        assert_eq!(c.opex_per_year_usd, Decimal::new(16_200, 0));
        assert_eq!(c.labor_per_year_usd, Decimal::new(9000, 0));
        assert_eq!(c.inputs_per_year_usd, Decimal::new(7200, 0));
    }

    #[test]
    fn per_category_costs_add_full_year_of_labour() {
        let c = compute_costs(&direct_scenario()).unwrap();
        assert_eq!(c.setup_cost_usd, Decimal::new(700, 0));
        assert_eq!(c.opex_per_cycle_usd, None);
        // 200 * 4 vegetable cycles + 300 * 1 tree cycle
        assert_eq!(c.inputs_per_year_usd, Decimal::new(1100, 0));
        assert_eq!(c.labor_per_year_usd, Decimal::new(1800, 0));
        assert_eq!(c.opex_per_year_usd, Decimal::new(2900, 0));
    }

    #[test]
    fn negative_labour_is_a_configuration_error() {
        let mut s = tray_scenario();
        s.labor_cost_per_month_usd = Decimal::new(-10, 0);
        assert!(matches!(
            compute_costs(&s),
            Err(ConfigurationError::NegativeMoney {
                field: "labor_cost_per_month_usd",
                ..
            })
        ));
    }

    #[test]
    fn invalid_cycle_length_is_rejected() {
        let mut s = tray_scenario();
        s.timing = CycleTiming::Uniform {
            months_per_cycle: 5,
            inputs: CycleInputCosts::default(),
        };
        assert_eq!(
            compute_costs(&s),
            Err(ConfigurationError::InvalidCycleLength(5))
        );
    }

    fn cycle_lengths() -> impl Strategy<Value = u32> {
        prop::sample::select(vec![1u32, 2, 3, 4, 6, 12])
    }

    fn uniform(months: u32) -> CycleTiming {
        CycleTiming::Uniform {
            months_per_cycle: months,
            inputs: CycleInputCosts::default(),
        }
    }

    proptest! {
        #[test]
        fn setup_cost_ignores_rate_risk_and_timing(rate in 1i64..=100, months in cycle_lengths()) {
            let base = compute_costs(&tray_scenario()).unwrap().setup_cost_usd;
            let mut s = tray_scenario();
            s.success_rate = Decimal::new(rate, 2);
            s.risk = RiskScenario::Drought;
            s.timing = uniform(months);
            let c = compute_costs(&s).unwrap();
            prop_assert_eq!(c.setup_cost_usd, base);
            prop_assert!(c.setup_cost_usd >= Decimal::ZERO);
        }

        #[test]
        fn annual_labour_is_independent_of_cycle_length(months in cycle_lengths()) {
            let mut s = tray_scenario();
            s.timing = uniform(months);
            let c = compute_costs(&s).unwrap();
            prop_assert_eq!(c.labor_per_year_usd, Decimal::new(9000, 0));
        }
    }
}
