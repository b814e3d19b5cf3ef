use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nursery_core::*;
use nursery_runtime::{EngineConfig, ProjectionEngine};
use rust_decimal::Decimal;

fn tray_scenario(risk: RiskScenario) -> ScenarioInput {
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
        risk,
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let engine = ProjectionEngine::new(EngineConfig::default());
    let input = tray_scenario(RiskScenario::PestOutbreak);
    c.bench_function("evaluate tray scenario", |b| {
        b.iter(|| {
            let _ = black_box(engine.evaluate(black_box(&input)));
        })
    });
    c.bench_function("stress test tray scenario", |b| {
        b.iter(|| {
            let _ = black_box(engine.stress_test(black_box(&input)));
        })
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
