//! planx driver
//!
//! Usage: `planx [workload.json]`
//!
//! Estimates the query as written, optimizes it, re-estimates the rewritten
//! plan and prints both. Without an argument the built-in demo workload runs.

use std::process::ExitCode;

use planx_core::{Estimator, PlanxResult, QueryOptimizer, Workload, explain, logging};

fn run() -> PlanxResult<()> {
    let workload = match std::env::args().nth(1) {
        Some(path) => Workload::load(path)?,
        None => Workload::demo()?,
    };
    let estimator = Estimator::new();

    let mut plan = workload.build_plan()?;
    estimator.estimate(&mut plan)?;
    println!("== input: {}", plan);
    print!("{}", explain(&plan));

    let optimizer = QueryOptimizer::with_config(workload.optimizer);
    let mut optimized = optimizer.optimize(&plan, &workload.catalog)?;
    estimator.estimate(&mut optimized)?;
    println!("\n== optimized: {}", optimized);
    print!("{}", explain(&optimized));
    Ok(())
}

fn main() -> ExitCode {
    logging::init_with_level("warn");
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("planx: {}", e);
            ExitCode::FAILURE
        }
    }
}
