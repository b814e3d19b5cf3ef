//! Revenue, profit and return on investment.

use crate::cost::CostFigures;
use crate::yields::YieldFigures;
use nursery_core::{validate_pricing, ByCategory, Category, ConfigurationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Revenue, operating cost and profit over a single period.
///
/// Profit is always derived from revenue and opex of the same value, so a
/// per-cycle figure can never be paired with an annual one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFigures {
    pub revenue_by_category: ByCategory<Decimal>,
    pub revenue_usd: Decimal,
    pub opex_usd: Decimal,
    pub profit_usd: Decimal,
}

impl PeriodFigures {
    pub fn from_revenue(revenue_by_category: ByCategory<Decimal>, opex_usd: Decimal) -> Self {
        let revenue_usd = revenue_by_category.total();
        Self {
            revenue_by_category,
            revenue_usd,
            opex_usd,
            profit_usd: revenue_usd - opex_usd,
        }
    }

    /// Revenue from sold seedlings at the given prices.
    pub fn from_sales(
        sellable: &ByCategory<Decimal>,
        prices: &ByCategory<Decimal>,
        opex_usd: Decimal,
    ) -> Self {
        Self::from_revenue(sellable.map(|c, q| *q * *prices.get(c)), opex_usd)
    }

    /// Same period with every category's revenue multiplied by `factor`.
    /// Opex is carried over unchanged.
    pub fn scale_revenue(&self, factor: Decimal) -> Self {
        Self::from_revenue(
            self.revenue_by_category.map(|_, r| *r * factor),
            self.opex_usd,
        )
    }

    /// Share of revenue earned by `category`, or `None` without revenue.
    pub fn revenue_share(&self, category: Category) -> Option<Decimal> {
        if self.revenue_usd.is_zero() {
            return None;
        }
        self.revenue_by_category
            .get(category)
            .checked_div(self.revenue_usd)
    }
}

/// Base financial outcome of a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialResult {
    pub setup_cost_usd: Decimal,
    /// Figures for one shared cycle; absent when categories run on their own
    /// cycle counts.
    pub per_cycle: Option<PeriodFigures>,
    pub annual: PeriodFigures,
    /// Years of annual profit needed to recover setup cost. Absent when the
    /// nursery does not make a profit.
    pub roi_years: Option<Decimal>,
}

impl FinancialResult {
    /// ROI for display, with a textual fallback when it is undefined.
    pub fn roi_label(&self) -> String {
        match self.roi_years {
            Some(years) => format!("{} years", years.round_dp(1)),
            None => "No positive profit".to_string(),
        }
    }
}

/// `setup_cost / annual_profit`, defined only for positive profit.
pub fn roi_years(setup_cost: Decimal, annual_profit: Decimal) -> Option<Decimal> {
    if annual_profit <= Decimal::ZERO {
        return None;
    }
    setup_cost.checked_div(annual_profit)
}

/// Relative profit change in percent against `|base|`, 0 for a zero base.
///
/// Saturates at `Decimal::MAX`/`Decimal::MIN` when a tiny base makes the
/// ratio unrepresentable.
pub fn percent_change(base: Decimal, adjusted: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    let delta = adjusted - base;
    let saturated = if delta.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    delta
        .checked_div(base.abs())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(saturated)
}

/// Combine cost and yield into revenue, profit and ROI.
pub fn compute_financials(
    costs: &CostFigures,
    yields: &YieldFigures,
    prices: &ByCategory<Decimal>,
) -> FinancialResult {
    let annual =
        PeriodFigures::from_sales(&yields.sellable_per_year, prices, costs.opex_per_year_usd);
    let per_cycle = costs
        .opex_per_cycle_usd
        .map(|opex| PeriodFigures::from_sales(&yields.sellable_per_cycle, prices, opex));
    let roi = roi_years(costs.setup_cost_usd, annual.profit_usd);
    if roi.is_none() {
        warn!(profit = %annual.profit_usd, "annual profit is not positive; ROI undefined");
    }
    debug!(
        revenue = %annual.revenue_usd,
        profit = %annual.profit_usd,
        roi = ?roi,
        "computed annual financials"
    );
    FinancialResult {
        setup_cost_usd: costs.setup_cost_usd,
        per_cycle,
        annual,
        roi_years: roi,
    }
}

/// Unadjusted projection: the only input accepted by [`crate::apply_risk`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    pub costs: CostFigures,
    pub yields: YieldFigures,
    pub prices: ByCategory<Decimal>,
    pub financials: FinancialResult,
}

impl Baseline {
    /// Combine validated cost and yield figures with selling prices. Prices
    /// are checked here since they have not passed through either model.
    pub fn new(
        costs: CostFigures,
        yields: YieldFigures,
        prices: ByCategory<Decimal>,
    ) -> Result<Self, ConfigurationError> {
        validate_pricing(&prices)?;
        let financials = compute_financials(&costs, &yields, &prices);
        Ok(Self {
            costs,
            yields,
            prices,
            financials,
        })
    }
}
