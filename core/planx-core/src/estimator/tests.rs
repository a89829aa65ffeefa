use super::*;
use crate::error::PlanxError;

fn relation_a() -> Relation {
    Relation::new(100)
        .with_attribute(Attribute::new("a1", 100))
        .with_attribute(Attribute::new("a2", 15))
}

fn relation_b() -> Relation {
    Relation::new(150)
        .with_attribute(Attribute::new("b1", 150))
        .with_attribute(Attribute::new("b2", 100))
        .with_attribute(Attribute::new("b3", 5))
}

fn scan_a() -> LogicalPlan {
    LogicalPlan::scan_relation("A", relation_a())
}

fn scan_b() -> LogicalPlan {
    LogicalPlan::scan_relation("B", relation_b())
}

fn eq(a: &str, b: &str) -> Predicate {
    Predicate::join(Attribute::named(a), Attribute::named(b))
}

fn estimated(mut plan: LogicalPlan) -> LogicalPlan {
    Estimator::new().estimate(&mut plan).unwrap();
    plan
}

fn output(plan: &LogicalPlan) -> &Relation {
    plan.output().expect("node should be annotated")
}

fn distinct(relation: &Relation, name: &str) -> u64 {
    relation.attribute(name).unwrap().distinct_values()
}

fn attr_names(relation: &Relation) -> Vec<&str> {
    relation.attributes().iter().map(Attribute::name).collect()
}

// ── Scan / Project ──

#[test]
fn test_scan_passthrough() {
    let plan = estimated(scan_b());
    let out = output(&plan);
    assert_eq!(out.row_count(), 150);
    assert_eq!(attr_names(out), vec!["b1", "b2", "b3"]);
    assert_eq!(distinct(out, "b3"), 5);
}

#[test]
fn test_project_keeps_rows_and_resolves_estimates() {
    let plan = estimated(LogicalPlan::project(
        scan_b(),
        vec![Attribute::named("b3"), Attribute::named("b1")],
    ));
    let out = output(&plan);
    assert_eq!(out.row_count(), 150);
    assert_eq!(attr_names(out), vec!["b3", "b1"]);
    assert_eq!(distinct(out, "b3"), 5);
    assert_eq!(distinct(out, "b1"), 150);
}

#[test]
fn test_project_unknown_attribute() {
    let mut plan = LogicalPlan::project(scan_a(), vec![Attribute::named("zz")]);
    let err = Estimator::new().estimate(&mut plan).unwrap_err();
    match err {
        PlanxError::AttributeNotFound { attribute, context } => {
            assert_eq!(attribute, "zz");
            assert_eq!(context, "PROJECT [zz]");
        }
        other => panic!("Expected AttributeNotFound, got: {:?}", other),
    }
}

// ── Select ──

#[test]
fn test_select_literal() {
    let plan = estimated(LogicalPlan::select(
        scan_a(),
        Predicate::value(Attribute::named("a2"), "x"),
    ));
    let out = output(&plan);
    assert_eq!(out.row_count(), 100 / 15);
    assert_eq!(attr_names(out), vec!["a1", "a2"]);
    assert_eq!(distinct(out, "a2"), 1);
    assert_eq!(distinct(out, "a1"), 100);
}

#[test]
fn test_select_attribute_comparison() {
    let plan = estimated(LogicalPlan::select(
        LogicalPlan::product(scan_a(), scan_b()),
        eq("a2", "b3"),
    ));
    let out = output(&plan);
    assert_eq!(out.row_count(), 1000);
    assert_eq!(distinct(out, "a2"), 5);
    assert_eq!(distinct(out, "b3"), 5);
    assert_eq!(distinct(out, "b1"), 150);
}

#[test]
fn test_select_can_reach_zero() {
    let tiny = LogicalPlan::scan_relation(
        "T",
        Relation::new(3).with_attribute(Attribute::new("t", 7)),
    );
    let plan = estimated(LogicalPlan::select(
        tiny,
        Predicate::value(Attribute::named("t"), "1"),
    ));
    assert_eq!(output(&plan).row_count(), 0);
}

#[test]
fn test_select_unknown_attribute() {
    let mut plan = LogicalPlan::select(scan_a(), eq("a1", "b1"));
    let err = Estimator::new().estimate(&mut plan).unwrap_err();
    match err {
        PlanxError::AttributeNotFound { attribute, context } => {
            assert_eq!(attribute, "b1");
            assert_eq!(context, "SELECT [a1=b1]");
        }
        other => panic!("Expected AttributeNotFound, got: {:?}", other),
    }
}

// ── Product / Join ──

#[test]
fn test_product_cardinality_and_order() {
    let plan = estimated(LogicalPlan::product(scan_a(), scan_b()));
    let out = output(&plan);
    assert_eq!(out.row_count(), 15000);
    assert_eq!(attr_names(out), vec!["a1", "a2", "b1", "b2", "b3"]);
}

#[test]
fn test_join_matches_select_over_product() {
    let join = estimated(LogicalPlan::join(scan_a(), scan_b(), eq("a2", "b3")));
    let select = estimated(LogicalPlan::select(
        LogicalPlan::product(scan_a(), scan_b()),
        eq("a2", "b3"),
    ));
    assert_eq!(output(&join), output(&select));
    let out = output(&join);
    assert_eq!(out.row_count(), 1000);
    for name in ["a1", "a2", "b1", "b2", "b3"] {
        assert_eq!(distinct(out, name), distinct(output(&select), name));
    }
}

#[test]
fn test_join_predicate_orientation_is_irrelevant() {
    let forward = estimated(LogicalPlan::join(scan_a(), scan_b(), eq("a1", "b2")));
    let reverse = estimated(LogicalPlan::join(scan_a(), scan_b(), eq("b2", "a1")));
    let (f, r) = (output(&forward), output(&reverse));
    assert_eq!(f.row_count(), 150);
    assert_eq!(f.row_count(), r.row_count());
    assert_eq!(distinct(f, "a1"), 100);
    assert_eq!(distinct(r, "b2"), 100);
}

#[test]
fn test_join_unknown_attribute() {
    let mut plan = LogicalPlan::join(scan_a(), scan_b(), eq("a2", "c1"));
    assert!(matches!(
        Estimator::new().estimate(&mut plan),
        Err(PlanxError::AttributeNotFound { attribute, .. }) if attribute == "c1"
    ));
}

#[test]
fn test_huge_product_saturates() {
    let big = || {
        LogicalPlan::scan_relation(
            "X",
            Relation::new(u64::MAX).with_attribute(Attribute::new("x", 1)),
        )
    };
    let plan = estimated(LogicalPlan::product(big(), big()));
    assert_eq!(output(&plan).row_count(), u64::MAX);
}

// ── Traversal ──

#[test]
fn test_every_node_annotated() {
    let plan = estimated(LogicalPlan::project(
        LogicalPlan::select(LogicalPlan::product(scan_a(), scan_b()), eq("a2", "b3")),
        vec![Attribute::named("a2"), Attribute::named("b1")],
    ));

    fn check(plan: &LogicalPlan) {
        assert!(plan.output().is_some(), "{} not annotated", plan.label());
        plan.inputs().into_iter().for_each(check);
    }
    check(&plan);

    let out = output(&plan);
    assert_eq!(out.row_count(), 1000);
    assert_eq!(attr_names(out), vec!["a2", "b1"]);
    assert_eq!(distinct(out, "a2"), 5);
    assert_eq!(distinct(out, "b1"), 150);
}

#[test]
fn test_reestimate_is_idempotent() {
    let mut plan = LogicalPlan::select(
        LogicalPlan::product(scan_a(), scan_b()),
        Predicate::value(Attribute::named("b1"), "3"),
    );
    let estimator = Estimator::new();
    estimator.estimate(&mut plan).unwrap();
    let first = plan.clone();
    estimator.estimate(&mut plan).unwrap();
    assert_eq!(plan, first);
    assert_eq!(output(&plan).row_count(), 100);
}
