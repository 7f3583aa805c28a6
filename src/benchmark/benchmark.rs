use std::time::Instant;

use crate::error::SimError;
use crate::simulation::engine::run;
use crate::simulation::params::Parameters;
use crate::simulation::scenario::Scenario;

/// Time a full run of the same `bodies`-sized population at every worker
/// count in `worker_counts`
/// Counts that do not divide `bodies` evenly are skipped.
/// Paste output directly into excel to graph
pub fn bench_workers(bodies: usize, worker_counts: &[usize], parameters: Parameters) -> Result<(), SimError> {
    println!("workers,partition,total_ms,per_step_ms");

    for &workers in worker_counts {
        if workers == 0 || bodies % workers != 0 {
            continue;
        }
        let scenario = Scenario::deterministic(parameters, workers, bodies)?;

        let t0 = Instant::now();
        let report = run(&scenario)?;
        let total_ms = t0.elapsed().as_secs_f64() * 1000.0;

        // leader's own view of the steps, excludes thread startup
        let steps = report.step_times.len().max(1);
        let per_step_ms = report.total.as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{},{:.3},{:.3}", workers, bodies / workers, total_ms, per_step_ms);
    }

    Ok(())
}

/// Worker counts that split `bodies` evenly, up to `max_workers`
pub fn even_worker_counts(bodies: usize, max_workers: usize) -> Vec<usize> {
    (1..=max_workers).filter(|w| bodies % w == 0).collect()
}
