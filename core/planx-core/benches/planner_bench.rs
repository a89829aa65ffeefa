use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use planx_core::{Attribute, Catalog, Estimator, LogicalPlan, Predicate, QueryOptimizer};

// ════════════════════════════════════════════
// Chain queries: R0.y0 = R1.x1, R1.y1 = R2.x2, ...
// ════════════════════════════════════════════

fn chain(n: usize) -> (Catalog, LogicalPlan) {
    let mut catalog = Catalog::new();
    for i in 0..n {
        let table = format!("R{}", i);
        let rows = 100 + (i as u64 * 37) % 1_000;
        catalog.create_relation(&table, rows).unwrap();
        catalog.create_attribute(&table, &format!("x{}", i), rows).unwrap();
        catalog.create_attribute(&table, &format!("y{}", i), 1 + rows / 10).unwrap();
    }

    let mut plan = LogicalPlan::scan(&catalog, "R0").unwrap();
    for i in 1..n {
        plan = LogicalPlan::product(plan, LogicalPlan::scan(&catalog, &format!("R{}", i)).unwrap());
    }
    for i in 1..n {
        plan = LogicalPlan::select(
            plan,
            Predicate::join(
                Attribute::named(format!("y{}", i - 1)),
                Attribute::named(format!("x{}", i)),
            ),
        );
    }
    plan = LogicalPlan::select(plan, Predicate::value(Attribute::named("x0"), "42"));
    let plan = LogicalPlan::project(plan, vec![Attribute::named(format!("y{}", n - 1))]);
    (catalog, plan)
}

fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    let estimator = Estimator::new();

    for n in [2, 4, 8, 16] {
        let (_, plan) = chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &plan, |b, plan| {
            b.iter(|| {
                let mut plan = plan.clone();
                estimator.estimate(black_box(&mut plan)).unwrap();
                plan
            });
        });
    }

    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    let optimizer = QueryOptimizer::new();

    for n in [2, 4, 8, 16] {
        let (catalog, plan) = chain(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &plan, |b, plan| {
            b.iter(|| optimizer.optimize(black_box(plan), &catalog).unwrap());
        });
    }

    group.finish();
}

fn bench_optimize_then_estimate(c: &mut Criterion) {
    let (catalog, plan) = chain(8);
    let optimizer = QueryOptimizer::new();
    let estimator = Estimator::new();

    c.bench_function("optimize_then_estimate_8", |b| {
        b.iter(|| {
            let mut optimized = optimizer.optimize(black_box(&plan), &catalog).unwrap();
            estimator.estimate(&mut optimized).unwrap();
            optimized
        });
    });
}

criterion_group!(
    benches,
    bench_estimate,
    bench_optimize,
    bench_optimize_then_estimate
);
criterion_main!(benches);
