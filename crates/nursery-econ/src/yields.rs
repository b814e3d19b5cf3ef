//! Yield model: planted and sellable seedlings per category.

use nursery_core::{
    validate_fraction, validate_sizing, validate_timing, ByCategory, ConfigurationError,
    ScenarioInput, YieldSizing,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Production side of a projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldFigures {
    /// Production cycles per year by category.
    pub cycles_per_year: ByCategory<u32>,
    /// Seedlings planted in one cycle.
    pub planted_per_cycle: ByCategory<Decimal>,
    /// Seedlings surviving to sale in one cycle.
    pub sellable_per_cycle: ByCategory<Decimal>,
    /// Seedlings surviving to sale over the year.
    pub sellable_per_year: ByCategory<Decimal>,
    /// Planted capacity across categories in one cycle.
    pub total_potential_per_cycle: Decimal,
    /// Sellable output across categories in one cycle.
    pub total_sellable_per_cycle: Decimal,
    /// Tree seedlings to plant per year to meet a sellable target. Only set
    /// for direct sizing.
    pub tree_planted_required_per_year: Option<Decimal>,
    /// Set when the success rate is zero and back-computed planting targets
    /// fell back to zero.
    pub degenerate: bool,
}

impl YieldFigures {
    pub fn total_sellable_per_year(&self) -> Decimal {
        self.sellable_per_year.total()
    }
}

/// Planted count needed to end up with `target` sellable seedlings.
///
/// Returns `None` when `success_rate` is zero or the result does not fit a
/// `Decimal`.
pub fn planted_required(target: Decimal, success_rate: Decimal) -> Option<Decimal> {
    if success_rate.is_zero() {
        return None;
    }
    target.checked_div(success_rate)
}

fn per_cycle(per_year: Decimal, cycles: u32) -> Decimal {
    per_year
        .checked_div(Decimal::from(cycles))
        .unwrap_or(Decimal::ZERO)
}

/// Derive planted and sellable counts from the production inputs.
///
/// The success rate is accepted anywhere in `[0, 1]` here: a zero rate gives
/// a degenerate but well-defined result rather than a division failure.
/// Full scenario validation is stricter and rejects it up front.
pub fn compute_yield(input: &ScenarioInput) -> Result<YieldFigures, ConfigurationError> {
    validate_sizing(&input.sizing)?;
    validate_timing(&input.timing)?;
    validate_fraction("success_rate", input.success_rate)?;

    let rate = input.success_rate;
    let cycles = input.timing.cycles_per_year();

    let (planted_per_cycle, sellable_per_cycle, sellable_per_year, required) = match &input.sizing
    {
        YieldSizing::Direct {
            veg_seedlings_per_cycle,
            tree_target_per_year,
        } => {
            let veg_sellable = *veg_seedlings_per_cycle * rate;
            let tree_planted_year = match planted_required(*tree_target_per_year, rate) {
                Some(planted) => planted,
                None if rate.is_zero() => Decimal::ZERO,
                None => {
                    return Err(ConfigurationError::Overflow(
                        "tree_planted_required_per_year",
                    ))
                }
            };
            (
                ByCategory::new(
                    *veg_seedlings_per_cycle,
                    per_cycle(tree_planted_year, cycles.tree),
                ),
                ByCategory::new(
                    veg_sellable,
                    per_cycle(*tree_target_per_year, cycles.tree),
                ),
                ByCategory::new(
                    veg_sellable * Decimal::from(cycles.vegetable),
                    *tree_target_per_year,
                ),
                Some(tree_planted_year),
            )
        }
        YieldSizing::Tray {
            num_trays,
            cells_per_tray,
            veg_fraction,
        } => {
            let potential = Decimal::from(*num_trays) * Decimal::from(*cells_per_tray);
            let sellable = potential * rate;
            let tree_fraction = Decimal::ONE - *veg_fraction;
            let sellable_per_cycle =
                ByCategory::new(sellable * *veg_fraction, sellable * tree_fraction);
            (
                ByCategory::new(potential * *veg_fraction, potential * tree_fraction),
                sellable_per_cycle,
                sellable_per_cycle.map(|c, q| *q * Decimal::from(*cycles.get(c))),
                None,
            )
        }
    };

    let degenerate = rate.is_zero();
    if degenerate {
        warn!("success rate is zero; no seedlings become sellable");
    }

    let figures = YieldFigures {
        cycles_per_year: cycles,
        total_potential_per_cycle: planted_per_cycle.total(),
        total_sellable_per_cycle: sellable_per_cycle.total(),
        planted_per_cycle,
        sellable_per_cycle,
        sellable_per_year,
        tree_planted_required_per_year: required,
        degenerate,
    };
    debug!(
        potential = %figures.total_potential_per_cycle,
        sellable = %figures.total_sellable_per_cycle,
        sellable_year = %figures.total_sellable_per_year(),
        "computed yield"
    );
    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{direct_scenario, tray_scenario};
    use proptest::prelude::*;

    #[test]
    fn tray_mode_splits_sellable_output() {
        let y = compute_yield(&tray_scenario()).unwrap();
        assert_eq!(y.total_potential_per_cycle, Decimal::new(2_000_000, 0));
        assert_eq!(y.total_sellable_per_cycle, Decimal::new(1_700_000, 0));
        assert_eq!(y.sellable_per_cycle.vegetable, Decimal::new(1_190_000, 0));
        assert_eq!(y.sellable_per_cycle.tree, Decimal::new(510_000, 0));
        assert_eq!(y.sellable_per_year.total(), Decimal::new(6_800_000, 0));
        assert_eq!(y.tree_planted_required_per_year, None);
        assert!(!y.degenerate);
    }

    #[test]
    fn direct_mode_back_computes_tree_planting() {
        let y = compute_yield(&direct_scenario()).unwrap();
        assert_eq!(y.sellable_per_cycle.vegetable, Decimal::new(8500, 0));
        assert_eq!(y.sellable_per_year.vegetable, Decimal::new(34_000, 0));
        assert_eq!(y.sellable_per_year.tree, Decimal::new(2950, 0));
        let required = y.tree_planted_required_per_year.unwrap();
        assert_eq!(required.round_dp(2), Decimal::new(347_059, 2));
    }

    #[test]
    fn zero_success_rate_is_degenerate_not_a_failure() {
        let mut s = direct_scenario();
        s.success_rate = Decimal::ZERO;
        let y = compute_yield(&s).unwrap();
        assert!(y.degenerate);
        assert_eq!(y.tree_planted_required_per_year, Some(Decimal::ZERO));
        assert_eq!(y.sellable_per_cycle.vegetable, Decimal::ZERO);

        let mut s = tray_scenario();
        s.success_rate = Decimal::ZERO;
        let y = compute_yield(&s).unwrap();
        assert!(y.degenerate);
        assert_eq!(y.total_sellable_per_cycle, Decimal::ZERO);
    }

    #[test]
    fn planted_required_guards_zero_rate() {
        assert_eq!(planted_required(Decimal::new(100, 0), Decimal::ZERO), None);
        assert_eq!(
            planted_required(Decimal::new(100, 0), Decimal::new(5, 1)),
            Some(Decimal::new(200, 0))
        );
    }

    #[test]
    fn unrepresentable_tree_planting_is_an_error() {
        let mut s = direct_scenario();
        s.sizing = YieldSizing::Direct {
            veg_seedlings_per_cycle: Decimal::new(10_000, 0),
            tree_target_per_year: Decimal::new(1_000_000_000_000, 0),
        };
        s.success_rate = Decimal::new(1, 28);
        assert_eq!(
            compute_yield(&s),
            Err(ConfigurationError::Overflow("tree_planted_required_per_year"))
        );
    }

    #[test]
    fn largest_tray_layout_fits() {
        let mut s = tray_scenario();
        s.sizing = YieldSizing::Tray {
            num_trays: nursery_core::MAX_TRAYS,
            cells_per_tray: nursery_core::MAX_CELLS_PER_TRAY,
            veg_fraction: Decimal::new(5, 1),
        };
        s.success_rate = Decimal::ONE;
        let y = compute_yield(&s).unwrap();
        assert_eq!(y.total_potential_per_cycle, Decimal::new(1_000_000_000_000, 0));
    }

    #[test]
    fn veg_fraction_outside_unit_interval_is_rejected() {
        let mut s = tray_scenario();
        s.sizing = YieldSizing::Tray {
            num_trays: 10,
            cells_per_tray: 10,
            veg_fraction: Decimal::new(-1, 1),
        };
        assert!(compute_yield(&s).is_err());
    }

    proptest! {
        #[test]
        fn tray_split_conserves_output(
            trays in 1u32..50_000,
            cells in 1u32..400,
            frac in 0i64..=100,
            rate in 0i64..=100,
        ) {
            let mut s = tray_scenario();
            s.sizing = YieldSizing::Tray {
                num_trays: trays,
                cells_per_tray: cells,
                veg_fraction: Decimal::new(frac, 2),
            };
            s.success_rate = Decimal::new(rate, 2);
            let y = compute_yield(&s).unwrap();
            let potential = Decimal::from(trays) * Decimal::from(cells);
            prop_assert_eq!(y.total_potential_per_cycle, potential);
            prop_assert_eq!(y.total_sellable_per_cycle, potential * s.success_rate);
            prop_assert!(y.total_sellable_per_cycle <= y.total_potential_per_cycle);
        }
    }
}
