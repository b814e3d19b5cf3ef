#![deny(warnings)]

//! Core domain models and invariants for the nursery projection engine.
//!
//! This crate defines the immutable scenario record evaluated by the engine,
//! together with validation helpers that reject out-of-domain parameters with
//! a typed [`ConfigurationError`] instead of clamping them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of the modelled year in months.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Upper bound for any single cost, labour or price field, in whole USD.
pub const MAX_AMOUNT_USD: i64 = 1_000_000_000;
/// Upper bound for a seedling count or target in direct sizing.
pub const MAX_SEEDLINGS: i64 = 1_000_000_000_000;
/// Upper bound for the number of trays.
pub const MAX_TRAYS: u32 = 100_000_000;
/// Upper bound for cells per tray.
pub const MAX_CELLS_PER_TRAY: u32 = 10_000;
/// Upper bound for a category's cycles per year (one cycle a day).
pub const MAX_CYCLES_PER_YEAR: u32 = 365;

/// Seedling categories produced by the nursery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Short-cycle vegetable seedlings.
    Vegetable,
    /// Tree seedlings for afforestation and orchards.
    Tree,
}

impl Category {
    /// All categories in reporting order.
    pub const ALL: [Category; 2] = [Category::Vegetable, Category::Tree];

    pub fn label(self) -> &'static str {
        match self {
            Category::Vegetable => "Vegetable",
            Category::Tree => "Tree",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per seedling category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByCategory<T> {
    pub vegetable: T,
    pub tree: T,
}

impl<T> ByCategory<T> {
    pub fn new(vegetable: T, tree: T) -> Self {
        Self { vegetable, tree }
    }

    /// Value for a single category.
    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Vegetable => &self.vegetable,
            Category::Tree => &self.tree,
        }
    }

    /// Build a new per-category value from each entry.
    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> ByCategory<U> {
        ByCategory {
            vegetable: f(Category::Vegetable, &self.vegetable),
            tree: f(Category::Tree, &self.tree),
        }
    }

    /// Iterate entries in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl ByCategory<Decimal> {
    /// Sum across categories.
    pub fn total(&self) -> Decimal {
        self.vegetable + self.tree
    }
}

/// One-time capital costs shared by the whole nursery.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetupCosts {
    /// Greenhouse or shed construction in USD.
    pub greenhouse_usd: Decimal,
    /// Irrigation system in USD.
    pub irrigation_usd: Decimal,
    /// Tools and other agricultural inputs in USD.
    pub tools_usd: Decimal,
}

impl SetupCosts {
    pub fn total(&self) -> Decimal {
        self.greenhouse_usd + self.irrigation_usd + self.tools_usd
    }
}

/// Consumables bought for every production cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleInputCosts {
    /// Seed cost per cycle in USD.
    pub seed_usd: Decimal,
    /// Growing medium cost per cycle in USD.
    pub medium_usd: Decimal,
}

impl CycleInputCosts {
    pub fn total(&self) -> Decimal {
        self.seed_usd + self.medium_usd
    }
}

/// Production rhythm for a category with a fixed number of cycles per year.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryCycle {
    /// Cycles run per year (> 0).
    pub cycles_per_year: u32,
    /// Consumables per cycle of this category.
    pub inputs: CycleInputCosts,
}

/// How production cycles are laid out across the year.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CycleTiming {
    /// Both categories share one cycle of `months_per_cycle` months. Labour is
    /// charged per cycle.
    Uniform {
        months_per_cycle: u32,
        inputs: CycleInputCosts,
    },
    /// Each category runs its own number of cycles per year. Labour is charged
    /// for the full year on top of category inputs.
    PerCategory {
        vegetable: CategoryCycle,
        tree: CategoryCycle,
    },
}

impl CycleTiming {
    /// Cycles per year for each category. A zero-month cycle yields zero cycles;
    /// validation rejects it before any evaluation.
    pub fn cycles_per_year(&self) -> ByCategory<u32> {
        match self {
            CycleTiming::Uniform {
                months_per_cycle, ..
            } => {
                let n = MONTHS_PER_YEAR.checked_div(*months_per_cycle).unwrap_or(0);
                ByCategory::new(n, n)
            }
            CycleTiming::PerCategory { vegetable, tree } => {
                ByCategory::new(vegetable.cycles_per_year, tree.cycles_per_year)
            }
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, CycleTiming::Uniform { .. })
    }
}

/// How planted and sellable seedling counts are sized.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum YieldSizing {
    /// Vegetables sized by planted count per cycle; trees sized backwards from
    /// a sellable target per year.
    Direct {
        veg_seedlings_per_cycle: Decimal,
        tree_target_per_year: Decimal,
    },
    /// Total tray capacity split between categories by `veg_fraction`.
    Tray {
        num_trays: u32,
        cells_per_tray: u32,
        veg_fraction: Decimal,
    },
}

/// Deterministic risk events applied to a base projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskScenario {
    #[default]
    None,
    /// Demand-side shock: sales fall by 20%, yield is untouched.
    Drought,
    /// Supply-side shock: sellable yield of every category falls by 15%.
    PestOutbreak,
}

impl RiskScenario {
    pub const ALL: [RiskScenario; 3] = [
        RiskScenario::None,
        RiskScenario::Drought,
        RiskScenario::PestOutbreak,
    ];

    /// Multiplier applied to revenue.
    pub fn revenue_factor(self) -> Decimal {
        match self {
            RiskScenario::Drought => Decimal::new(80, 2),
            RiskScenario::None | RiskScenario::PestOutbreak => Decimal::ONE,
        }
    }

    /// Multiplier applied to sellable yield.
    pub fn yield_factor(self) -> Decimal {
        match self {
            RiskScenario::PestOutbreak => Decimal::new(85, 2),
            RiskScenario::None | RiskScenario::Drought => Decimal::ONE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskScenario::None => "No major risk applied.",
            RiskScenario::Drought => "Drought: -20% sales (revenue reduction).",
            RiskScenario::PestOutbreak => "Pest outbreak: -15% yield (fewer sellable seedlings).",
        }
    }

    pub fn mitigation(self) -> &'static str {
        match self {
            RiskScenario::None => "Keep monitoring production and market conditions.",
            RiskScenario::Drought => {
                "Promote drought-tolerant varieties and water-conserving irrigation."
            }
            RiskScenario::PestOutbreak => "Adopt Integrated Pest Management (IPM).",
        }
    }
}

impl FromStr for RiskScenario {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no-risk" | "no_risk" => Ok(RiskScenario::None),
            "drought" => Ok(RiskScenario::Drought),
            "pest" | "pest-outbreak" | "pest_outbreak" => Ok(RiskScenario::PestOutbreak),
            other => Err(ConfigurationError::UnknownRiskScenario(other.to_string())),
        }
    }
}

/// Complete parameter set for one evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// One-time capital costs.
    pub setup: SetupCosts,
    /// Labour for the whole nursery, per month, in USD.
    pub labor_cost_per_month_usd: Decimal,
    /// Cycle layout and per-cycle consumables.
    pub timing: CycleTiming,
    /// Yield sizing mode.
    pub sizing: YieldSizing,
    /// Fraction of planted seedlings that become sellable, in (0, 1].
    pub success_rate: Decimal,
    /// Average selling price per seedling in USD.
    pub price_per_seedling_usd: ByCategory<Decimal>,
    /// Risk event applied on top of the base projection.
    #[serde(default)]
    pub risk: RiskScenario,
}

/// Input outside its documented domain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Costs and prices must be non-negative.
    #[error("{field} must be a non-negative amount, got {value}")]
    NegativeMoney { field: &'static str, value: Decimal },
    /// Seedling counts and targets must be non-negative.
    #[error("{field} must be a non-negative quantity, got {value}")]
    NegativeQuantity { field: &'static str, value: Decimal },
    #[error("success rate must be within (0, 1], got {0}")]
    SuccessRateOutOfRange(Decimal),
    #[error("{field} must be within [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: Decimal },
    #[error("{field} must be a positive count")]
    NonPositiveCount { field: &'static str },
    /// Cycle length must divide the year evenly.
    #[error("months per cycle must evenly divide the 12-month year, got {0}")]
    InvalidCycleLength(u32),
    #[error("{0} production needs at least one cycle per year")]
    NoCycles(Category),
    #[error("unknown risk scenario: {0}")]
    UnknownRiskScenario(String),
    /// Value above its documented upper bound.
    #[error("{field} must not exceed {max}, got {value}")]
    ExceedsLimit {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
    /// A derived figure does not fit the decimal range.
    #[error("{0} is too large to represent")]
    Overflow(&'static str),
    #[error("horizon must be between 1 and {max} years, got {years}")]
    HorizonOutOfRange { years: u32, max: u32 },
}

fn at_most(field: &'static str, value: Decimal, max: Decimal) -> Result<(), ConfigurationError> {
    if value > max {
        return Err(ConfigurationError::ExceedsLimit { field, value, max });
    }
    Ok(())
}

fn money(field: &'static str, value: Decimal) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeMoney { field, value });
    }
    at_most(field, value, Decimal::from(MAX_AMOUNT_USD))
}

fn quantity(field: &'static str, value: Decimal) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO {
        return Err(ConfigurationError::NegativeQuantity { field, value });
    }
    at_most(field, value, Decimal::from(MAX_SEEDLINGS))
}

fn count(field: &'static str, value: u32, max: u32) -> Result<(), ConfigurationError> {
    if value == 0 {
        return Err(ConfigurationError::NonPositiveCount { field });
    }
    at_most(field, Decimal::from(value), Decimal::from(max))
}

/// Validate a fraction in the closed unit interval.
pub fn validate_fraction(field: &'static str, value: Decimal) -> Result<(), ConfigurationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigurationError::FractionOutOfRange { field, value });
    }
    Ok(())
}

/// Validate one-time setup costs. Every field lies in `[0, MAX_AMOUNT_USD]`.
pub fn validate_setup_costs(s: &SetupCosts) -> Result<(), ConfigurationError> {
    money("greenhouse_usd", s.greenhouse_usd)?;
    money("irrigation_usd", s.irrigation_usd)?;
    money("tools_usd", s.tools_usd)?;
    Ok(())
}

fn validate_cycle_inputs(i: &CycleInputCosts) -> Result<(), ConfigurationError> {
    money("seed_usd", i.seed_usd)?;
    money("medium_usd", i.medium_usd)
}

/// Validate cycle layout and per-cycle consumables.
pub fn validate_timing(t: &CycleTiming) -> Result<(), ConfigurationError> {
    match t {
        CycleTiming::Uniform {
            months_per_cycle,
            inputs,
        } => {
            if *months_per_cycle == 0 || MONTHS_PER_YEAR % months_per_cycle != 0 {
                return Err(ConfigurationError::InvalidCycleLength(*months_per_cycle));
            }
            validate_cycle_inputs(inputs)
        }
        CycleTiming::PerCategory { vegetable, tree } => {
            for (category, cycle) in [(Category::Vegetable, vegetable), (Category::Tree, tree)] {
                if cycle.cycles_per_year == 0 {
                    return Err(ConfigurationError::NoCycles(category));
                }
                count("cycles_per_year", cycle.cycles_per_year, MAX_CYCLES_PER_YEAR)?;
                validate_cycle_inputs(&cycle.inputs)?;
            }
            Ok(())
        }
    }
}

/// Validate every cost field of a scenario: setup, labour and cycle inputs.
pub fn validate_costs(input: &ScenarioInput) -> Result<(), ConfigurationError> {
    validate_setup_costs(&input.setup)?;
    money("labor_cost_per_month_usd", input.labor_cost_per_month_usd)?;
    validate_timing(&input.timing)
}

/// Validate the yield sizing parameters.
///
/// The bounds keep every derived figure, up to a century of annual revenue,
/// well inside the `Decimal` range.
pub fn validate_sizing(s: &YieldSizing) -> Result<(), ConfigurationError> {
    match s {
        YieldSizing::Direct {
            veg_seedlings_per_cycle,
            tree_target_per_year,
        } => {
            quantity("veg_seedlings_per_cycle", *veg_seedlings_per_cycle)?;
            quantity("tree_target_per_year", *tree_target_per_year)
        }
        YieldSizing::Tray {
            num_trays,
            cells_per_tray,
            veg_fraction,
        } => {
            count("num_trays", *num_trays, MAX_TRAYS)?;
            count("cells_per_tray", *cells_per_tray, MAX_CELLS_PER_TRAY)?;
            validate_fraction("veg_fraction", *veg_fraction)
        }
    }
}

/// Success rate must lie in (0, 1].
pub fn validate_success_rate(rate: Decimal) -> Result<(), ConfigurationError> {
    if rate <= Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigurationError::SuccessRateOutOfRange(rate));
    }
    Ok(())
}

/// Validate selling prices.
pub fn validate_pricing(p: &ByCategory<Decimal>) -> Result<(), ConfigurationError> {
    money("price_vegetable_usd", p.vegetable)?;
    money("price_tree_usd", p.tree)
}

/// Validate a whole scenario before evaluation.
pub fn validate_scenario(input: &ScenarioInput) -> Result<(), ConfigurationError> {
    validate_costs(input)?;
    validate_sizing(&input.sizing)?;
    validate_success_rate(input.success_rate)?;
    validate_pricing(&input.price_per_seedling_usd)?;
    if let YieldSizing::Direct {
        tree_target_per_year,
        ..
    } = &input.sizing
    {
        // planted = target / rate must stay representable for tiny rates
        if tree_target_per_year.checked_div(input.success_rate).is_none() {
            return Err(ConfigurationError::Overflow("tree_planted_required_per_year"));
        }
    }
    Ok(())
}
