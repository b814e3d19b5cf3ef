//! Deterministic risk scenarios applied to a base projection.

use crate::financial::{percent_change, Baseline, PeriodFigures};
use nursery_core::{ByCategory, RiskScenario};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Projection after a risk event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedResult {
    pub scenario: RiskScenario,
    /// Sellable seedlings per year after the event.
    pub sellable_per_year: ByCategory<Decimal>,
    pub per_cycle: Option<PeriodFigures>,
    pub annual: PeriodFigures,
    /// Annual profit of the base projection this result was derived from.
    pub base_annual_profit_usd: Decimal,
    /// Change of annual profit against the base, in percent.
    pub percent_change: Decimal,
}

/// Apply a risk scenario to a base projection.
///
/// Adjustments are always derived from the unadjusted [`Baseline`]; an
/// [`AdjustedResult`] cannot be fed back in, so scenarios never compound.
///
/// Drought scales revenue and leaves yield alone. A pest outbreak scales
/// sellable yield and recomputes revenue from it at category prices. Opex is
/// the same in every scenario.
pub fn apply_risk(base: &Baseline, scenario: RiskScenario) -> AdjustedResult {
    let fin = &base.financials;
    let (sellable_per_year, per_cycle, annual) = match scenario {
        RiskScenario::None => (
            base.yields.sellable_per_year,
            fin.per_cycle.clone(),
            fin.annual.clone(),
        ),
        RiskScenario::Drought => {
            let factor = scenario.revenue_factor();
            (
                base.yields.sellable_per_year,
                fin.per_cycle.as_ref().map(|p| p.scale_revenue(factor)),
                fin.annual.scale_revenue(factor),
            )
        }
        RiskScenario::PestOutbreak => {
            let factor = scenario.yield_factor();
            let year = base.yields.sellable_per_year.map(|_, q| *q * factor);
            let cycle = base.yields.sellable_per_cycle.map(|_, q| *q * factor);
            (
                year,
                fin.per_cycle
                    .as_ref()
                    .map(|p| PeriodFigures::from_sales(&cycle, &base.prices, p.opex_usd)),
                PeriodFigures::from_sales(&year, &base.prices, fin.annual.opex_usd),
            )
        }
    };

    let base_profit = fin.annual.profit_usd;
    let adjusted = AdjustedResult {
        scenario,
        sellable_per_year,
        per_cycle,
        percent_change: percent_change(base_profit, annual.profit_usd),
        annual,
        base_annual_profit_usd: base_profit,
    };
    debug!(
        ?scenario,
        revenue = %adjusted.annual.revenue_usd,
        profit = %adjusted.annual.profit_usd,
        change_pct = %adjusted.percent_change,
        "applied risk scenario"
    );
    adjusted
}
