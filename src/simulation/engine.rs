//! Epoch driver: runs every worker over its partition for a fixed number of
//! steps
//!
//! Workers are plain OS threads spawned once per run, one per partition.
//! Per worker the run is
//!
//! ```text
//! Init -> barrier -> { compute + integrate -> publish -> barrier } x steps -> Done
//! ```
//!
//! The barrier at the end of each step is the only synchronization point.
//! Compute and publish touch nothing but the worker's own partition, so they
//! need none. A worker that never reaches the barrier stalls the whole run.

use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::SimError;
use crate::simulation::forces::{partition_forces, NewtonianGravity};
use crate::simulation::integrator::advance_partition;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::store::{BodyStore, Generation, WorkerView};

/// Worker that reports timings
pub const LEADER: usize = 0;

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub bodies: Vec<Body>, // final current generation, global index order
    pub step_times: Vec<Duration>, // wall clock per step, measured by the leader
    pub total: Duration, // wall clock for all steps
}

/// Run `scenario` to completion
pub fn run(scenario: &Scenario) -> Result<RunReport, SimError> {
    let map = *scenario.map();
    let parameters = *scenario.parameters();
    let mut store = BodyStore::new(map);
    let barrier = Barrier::new(map.workers());
    let gravity = NewtonianGravity { G: parameters.G };

    info!(
        "beginning N-body simulation of {} bodies with {} workers",
        map.bodies(),
        map.workers()
    );

    let views = store.split();
    let leader_times = thread::scope(|s| -> Result<Timings, SimError> {
        let handles: Vec<_> = views
            .into_iter()
            .map(|view| {
                let barrier = &barrier;
                let gravity = &gravity;
                s.spawn(move || worker_loop(scenario, gravity, view, barrier))
            })
            .collect();

        let mut leader_times = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            let timings = handle
                .join()
                .map_err(|_| SimError::WorkerPanicked { worker })?;
            if worker == LEADER {
                leader_times = Some(timings);
            }
        }
        Ok(leader_times.unwrap_or_default())
    })?;

    let total = leader_times.total;
    info!("simulation complete: {:9.3} ms", total.as_secs_f64() * 1000.0);

    Ok(RunReport {
        bodies: store.gather(parameters.steps),
        step_times: leader_times.steps,
        total,
    })
}

/// Timings collected by one worker; only the leader fills them in
#[derive(Debug, Default)]
struct Timings {
    steps: Vec<Duration>,
    total: Duration,
}

fn worker_loop(
    scenario: &Scenario,
    gravity: &NewtonianGravity,
    mut view: WorkerView<'_>,
    barrier: &Barrier,
) -> Timings {
    let worker = view.worker();
    let range = view.map().range(worker);
    let size = range.len();
    let leader = worker == LEADER;
    let parameters = scenario.parameters();
    debug!(worker, first = range.start, end = range.end, "worker bound to partition");

    // Init: each worker fills only its own partition
    {
        let mut local = view.local_slice(Generation::Current);
        for (slot, i) in local.iter_mut().zip(range) {
            *slot = scenario.initial().body(i);
        }
    }
    barrier.wait();

    let mut timings = Timings::default();
    let start = Instant::now();

    let mut forces = vec![NVec3::zeros(); size];
    let mut scratch = Vec::with_capacity(size);

    for step in 0..parameters.steps {
        let step_start = Instant::now();

        // own bodies are read through a snapshot like everyone else's
        let own = view.fetch_partition(Generation::Current, worker);
        partition_forces(gravity, &view, &own, &mut forces, &mut scratch);
        {
            let mut next = view.local_slice(Generation::Next);
            advance_partition(&own, &forces, &mut next, parameters.dt);
        }
        view.publish_local();

        barrier.wait();

        if leader {
            let elapsed = step_start.elapsed();
            info!("timestep {} complete: {:7.3} ms", step, elapsed.as_secs_f64() * 1000.0);
            timings.steps.push(elapsed);
        }
    }

    if leader {
        timings.total = start.elapsed();
    }
    timings
}
