//! Multi-year profit outlook and payback dates.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default outlook horizon in years.
pub const DEFAULT_HORIZON_YEARS: u32 = 5;
/// Longest accepted outlook horizon in years.
pub const MAX_HORIZON_YEARS: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Year of operation, starting at 1.
    pub year: u32,
    pub cumulative_profit_usd: Decimal,
    /// Whether cumulative profit covers the setup cost by the end of the year.
    pub setup_recovered: bool,
}

/// Cumulative profit per year of operation against the one-time setup cost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitTimeline {
    pub setup_cost_usd: Decimal,
    pub points: Vec<TimelinePoint>,
    /// First year in the horizon whose cumulative profit covers setup cost.
    pub breakeven_year: Option<u32>,
}

impl ProfitTimeline {
    /// Project `years` years of constant annual profit.
    ///
    /// Setup cost is only ever recovered by a positive profit. Callers bound
    /// `years`; the engine rejects anything above [`MAX_HORIZON_YEARS`].
    pub fn project(annual_profit: Decimal, setup_cost: Decimal, years: u32) -> Self {
        let points: Vec<TimelinePoint> = (1..=years)
            .map(|year| {
                let cumulative = annual_profit * Decimal::from(year);
                TimelinePoint {
                    year,
                    cumulative_profit_usd: cumulative,
                    setup_recovered: annual_profit > Decimal::ZERO && cumulative >= setup_cost,
                }
            })
            .collect();
        let breakeven_year = points.iter().find(|p| p.setup_recovered).map(|p| p.year);
        Self {
            setup_cost_usd: setup_cost,
            points,
            breakeven_year,
        }
    }

    /// Cumulative profit at the end of the horizon.
    pub fn final_cumulative_profit(&self) -> Decimal {
        self.points
            .last()
            .map(|p| p.cumulative_profit_usd)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Calendar date on which setup cost is recovered when operation starts on
/// `start`. ROI is rounded up to whole months.
pub fn payback_date(start: NaiveDate, roi_years: Option<Decimal>) -> Option<NaiveDate> {
    let months = roi_years?.checked_mul(Decimal::from(12u32))?.ceil().to_u32()?;
    start.checked_add_months(Months::new(months))
}
