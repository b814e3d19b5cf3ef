//! Plain-text rendering of evaluations.

use nursery_core::{Category, RiskScenario};
use nursery_econ::{AdjustedResult, PeriodFigures};
use nursery_runtime::{Evaluation, ProfitTimeline};
use rust_decimal::Decimal;
use scenario_kit::ScenarioFile;
use std::fmt::Write;

/// Digits of `value.abs()` rounded to `dp` places, grouped by thousands.
fn grouped(value: Decimal, dp: u32) -> String {
    let text = format!("{:.*}", dp as usize, value.abs().round_dp(dp));
    let (int, frac) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let mut out = String::with_capacity(text.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

fn is_negative(value: Decimal, dp: u32) -> bool {
    value < Decimal::ZERO && !value.round_dp(dp).is_zero()
}

pub fn usd(value: Decimal, dp: u32) -> String {
    let sign = if is_negative(value, dp) { "-" } else { "" };
    format!("{sign}${}", grouped(value, dp))
}

pub fn count(value: Decimal) -> String {
    let sign = if is_negative(value, 0) { "-" } else { "" };
    format!("{sign}{}", grouped(value, 0))
}

pub fn percent(value: Decimal) -> String {
    let sign = if is_negative(value, 1) { "-" } else { "+" };
    format!("{sign}{}%", grouped(value, 1))
}

fn row(out: &mut String, label: &str, value: String) {
    let _ = writeln!(out, "  {label:<42} {value:>18}");
}

fn period_rows(out: &mut String, p: &PeriodFigures) {
    for (category, revenue) in p.revenue_by_category.iter() {
        row(out, &format!("{category} revenue"), usd(*revenue, 2));
    }
    row(out, "Total revenue", usd(p.revenue_usd, 2));
    row(out, "OPEX", usd(p.opex_usd, 2));
    row(out, "Profit", usd(p.profit_usd, 2));
}

fn timeline_rows(out: &mut String, t: &ProfitTimeline) {
    for p in &t.points {
        let mark = if p.setup_recovered { "  (setup recovered)" } else { "" };
        let _ = writeln!(
            out,
            "  Year {:<3} {:>18}{mark}",
            p.year,
            usd(p.cumulative_profit_usd, 0)
        );
    }
    match t.breakeven_year {
        Some(y) => {
            let _ = writeln!(
                out,
                "  Setup cost of {} recovered in year {y}",
                usd(t.setup_cost_usd, 0)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "  Setup cost of {} not recovered within {} years",
                usd(t.setup_cost_usd, 0),
                t.points.len()
            );
        }
    }
}

/// Full report for one evaluation.
pub fn render(file: &ScenarioFile, e: &Evaluation) -> String {
    let mut out = String::new();
    let base = &e.baseline;
    let fin = &base.financials;
    let _ = writeln!(out, "{} [{}]", file.name, file.id);
    if let Some(d) = &file.description {
        let _ = writeln!(out, "{d}");
    }

    let _ = writeln!(out, "\nCombined annual dashboard");
    row(&mut out, "Initial setup cost", usd(fin.setup_cost_usd, 0));
    row(&mut out, "Total annual OPEX", usd(fin.annual.opex_usd, 0));
    row(&mut out, "Projected annual revenue", usd(fin.annual.revenue_usd, 0));
    row(&mut out, "Projected annual profit", usd(fin.annual.profit_usd, 0));
    row(&mut out, "Return on investment", fin.roi_label());
    if let Some(date) = e.payback_date {
        row(&mut out, "Setup cost recovered by", date.to_string());
    }

    let _ = writeln!(out, "\nProduction");
    let y = &base.yields;
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "  {category} seedlings ({} cycles per year)",
            y.cycles_per_year.get(category)
        );
        row(&mut out, "  Planted per cycle", count(*y.planted_per_cycle.get(category)));
        let rate_pct = (e.scenario.success_rate * Decimal::ONE_HUNDRED).round_dp(0);
        row(
            &mut out,
            &format!("  Sellable per cycle (at {rate_pct}%)"),
            count(*y.sellable_per_cycle.get(category)),
        );
        row(&mut out, "  Sellable per year", count(*y.sellable_per_year.get(category)));
        if category == Category::Tree {
            if let Some(required) = y.tree_planted_required_per_year {
                row(&mut out, "  Planted per year to meet target", count(required));
            }
        }
        if let Some(share) = fin.annual.revenue_share(category) {
            row(&mut out, "  Share of revenue", percent_share(share));
        }
    }

    if let Some(cycle) = &fin.per_cycle {
        let _ = writeln!(out, "\nPer cycle");
        period_rows(&mut out, cycle);
    }
    let _ = writeln!(out, "\nPer year");
    period_rows(&mut out, &fin.annual);
    row(&mut out, "  of which labour", usd(base.costs.labor_per_year_usd, 2));
    row(&mut out, "  of which seed and medium", usd(base.costs.inputs_per_year_usd, 2));

    let a = &e.adjusted;
    let _ = writeln!(out, "\nRisk scenario: {}", a.scenario.label());
    row(&mut out, "Adjusted annual revenue", usd(a.annual.revenue_usd, 0));
    row(&mut out, "Adjusted annual profit", usd(a.annual.profit_usd, 0));
    row(&mut out, "Change vs. base", percent(a.percent_change));
    let _ = writeln!(out, "  Mitigation: {}", a.scenario.mitigation());

    let _ = writeln!(out, "\n{}-year cumulative profit", e.timeline.points.len());
    timeline_rows(&mut out, &e.timeline);
    if a.annual.profit_usd != fin.annual.profit_usd {
        let years = e.adjusted_timeline.points.len();
        let _ = writeln!(out, "\n{years}-year cumulative profit under risk");
        timeline_rows(&mut out, &e.adjusted_timeline);
    }
    out
}

fn percent_share(share: Decimal) -> String {
    format!("{}%", grouped(share * Decimal::ONE_HUNDRED, 1))
}

/// Side-by-side comparison of every risk scenario.
pub fn render_stress(file: &ScenarioFile, results: &[AdjustedResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]: risk comparison", file.name, file.id);
    let _ = writeln!(
        out,
        "  {:<14} {:>16} {:>16} {:>10}",
        "Scenario", "Revenue", "Profit", "Change"
    );
    for r in results {
        let name = match r.scenario {
            RiskScenario::None => "none",
            RiskScenario::Drought => "drought",
            RiskScenario::PestOutbreak => "pest outbreak",
        };
        let _ = writeln!(
            out,
            "  {:<14} {:>16} {:>16} {:>10}",
            name,
            usd(r.annual.revenue_usd, 0),
            usd(r.annual.profit_usd, 0),
            percent(r.percent_change)
        );
    }
    out
}
